use tracing::debug;
use crate::{instance::ROOT, model::{LinearExpression, VarId, Variable}};
use super::{skeleton::TreeSkeleton, AuxiliaryVariables, ConnectivityEncoder};





/// Single-commodity flow: the root emits K units and every reached node keeps one.
///
/// A selected arc that cannot be reached from the root carries no flow, so the node it
/// enters cannot consume its unit and conservation fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleCommodityFlow {
    pub strengthened: bool,
}

// SingleCommodityFlow::SingleCommodityFlow
impl SingleCommodityFlow {
    // Flow on an arc counts the nodes below it. Below the root's only child there are K
    // nodes, below any other arc at most K - 1.
    fn capacity(&self, skeleton: &TreeSkeleton, tail: usize) -> f64 {
        if self.strengthened && tail != ROOT {
            skeleton.arc_target.saturating_sub(1) as f64
        } else {
            skeleton.arc_target as f64
        }
    }
}

// SingleCommodityFlow::ConnectivityEncoder
impl ConnectivityEncoder for SingleCommodityFlow {
    fn encode(&self, skeleton: &mut TreeSkeleton) -> AuxiliaryVariables {
        let arc_target: f64 = skeleton.arc_target as f64;
        // * 0 <= f(i,j) <= c(i,j) for every arc
        let mut flow: Vec<VarId> = Vec::with_capacity(skeleton.arcs.len());
        for arc_i in 0..skeleton.arcs.len() {
            let arc = skeleton.orientation.arc(arc_i);
            let capacity: f64 = self.capacity(skeleton, arc.tail);
            flow.push(skeleton.model.add_variable(Variable::continuous(0.0, capacity, format!("f({},{})", arc.tail, arc.head))));
        }
        // * f(i,j) <= c(i,j) x(i,j)
        for arc_i in 0..skeleton.arcs.len() {
            let arc = skeleton.orientation.arc(arc_i);
            let constraint = LinearExpression::new()
                .plus(flow[arc_i], 1.0)
                .plus(skeleton.arc_var(arc_i), -self.capacity(skeleton, arc.tail))
                .leq(0.0, format!("flow_link({},{})", arc.tail, arc.head));
            skeleton.model.add_constraint(constraint);
        }
        // * sum of f(0,j) == K
        let constraint = LinearExpression::new()
            .sum(skeleton.orientation.outgoing(ROOT).iter().map(|&x| &flow[x]))
            .eq(arc_target, "flow_source");
        skeleton.model.add_constraint(constraint);
        // * sum of f(i,v) - sum of f(v,j) == sum of x(i,v) for every v != 0
        for node in 1..skeleton.n_nodes() {
            let constraint = skeleton
                .incoming_arc_sum(node)
                .weighted_sum(skeleton.orientation.incoming(node).iter().map(|&x| &flow[x]), -1.0)
                .weighted_sum(skeleton.orientation.outgoing(node).iter().map(|&x| &flow[x]), 1.0)
                .eq(0.0, format!("flow_conservation({})", node));
            skeleton.model.add_constraint(constraint);
        }
        debug!("Single-commodity flow added {} flow variables", flow.len());
        AuxiliaryVariables::Flow(flow)
    }
}
