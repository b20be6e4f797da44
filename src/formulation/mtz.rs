use tracing::debug;
use crate::{instance::ROOT, model::{LinearExpression, VarId, Variable}};
use super::{skeleton::TreeSkeleton, AuxiliaryVariables, ConnectivityEncoder};





/// Miller-Tucker-Zemlin potentials: u strictly increases along every selected arc and
/// unreached nodes sit at the ceiling U, so they cannot start a branch of their own.
#[derive(Clone, Copy, Debug, Default)]
pub struct MillerTuckerZemlin {
    pub strengthened: bool,
}

// MillerTuckerZemlin::MillerTuckerZemlin
impl MillerTuckerZemlin {
    pub fn ceiling(&self, skeleton: &TreeSkeleton) -> f64 {
        if self.strengthened {
            skeleton.arc_target as f64
        } else {
            skeleton.n_nodes() as f64
        }
    }
}

// MillerTuckerZemlin::ConnectivityEncoder
impl ConnectivityEncoder for MillerTuckerZemlin {
    fn encode(&self, skeleton: &mut TreeSkeleton) -> AuxiliaryVariables {
        let ceiling: f64 = self.ceiling(skeleton);
        let n_nodes: usize = skeleton.n_nodes();
        // * u(v) in {0, ..., U}, u(0) == 0
        let potentials: Vec<VarId> = (0..n_nodes)
            .map(|node| skeleton.model.add_variable(Variable::integer(0.0, ceiling, format!("u({})", node))))
            .collect();
        skeleton.model.fix_variable(potentials[ROOT], 0.0);
        // * u(i) + x(i,j) - u(j) - (1 - x(i,j)) U <= 0
        for arc_i in 0..skeleton.arcs.len() {
            let arc = skeleton.orientation.arc(arc_i);
            let constraint = LinearExpression::new()
                .plus(potentials[arc.tail], 1.0)
                .plus(potentials[arc.head], -1.0)
                .plus(skeleton.arc_var(arc_i), 1.0 + ceiling)
                .leq(ceiling, format!("potential_order({},{})", arc.tail, arc.head));
            skeleton.model.add_constraint(constraint);
        }
        // * U - U sum of x(i,v) <= u(v) for every v != 0
        for node in 1..n_nodes {
            let constraint = LinearExpression::new()
                .weighted_sum(skeleton.orientation.incoming(node).iter().map(|&x| &skeleton.arcs[x]), ceiling)
                .plus(potentials[node], 1.0)
                .geq(ceiling, format!("potential_unreached({})", node));
            skeleton.model.add_constraint(constraint);
        }
        // * sum of u(v) <= K (K + 1) / 2 + (n - 1 - K) U
        // Depths of K reached nodes add up to at most 1 + ... + K, every other node sits at U.
        if self.strengthened {
            let arc_target: f64 = skeleton.arc_target as f64;
            let bound: f64 = arc_target * (arc_target + 1.0) / 2.0 + (n_nodes as f64 - 1.0 - arc_target) * ceiling;
            let constraint = LinearExpression::new().sum(&potentials[1..]).leq(bound, "potential_sum");
            skeleton.model.add_constraint(constraint);
        }
        debug!("Miller-Tucker-Zemlin added {} potentials with ceiling {}", potentials.len(), ceiling);
        AuxiliaryVariables::Potentials(potentials)
    }
}
