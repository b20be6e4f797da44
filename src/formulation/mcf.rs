use tracing::debug;
use crate::{instance::ROOT, model::{LinearExpression, VarId, Variable}};
use super::{skeleton::TreeSkeleton, AuxiliaryVariables, ConnectivityEncoder};





/// Multi-commodity flow: every reached node j receives its own unit of commodity j from
/// the root, routed over selected arcs only.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultiCommodityFlow;

// MultiCommodityFlow::ConnectivityEncoder
impl ConnectivityEncoder for MultiCommodityFlow {
    fn encode(&self, skeleton: &mut TreeSkeleton) -> AuxiliaryVariables {
        let n_nodes: usize = skeleton.n_nodes();
        let n_arcs: usize = skeleton.arcs.len();
        // * f(c;i,j) in {0, 1} for every commodity c != 0 and every arc
        // The root has no commodity, its row stays empty.
        let mut commodities: Vec<Vec<VarId>> = vec![Vec::new(); n_nodes];
        for commodity in 1..n_nodes {
            for arc_i in 0..n_arcs {
                let arc = skeleton.orientation.arc(arc_i);
                let variable: VarId = skeleton.model.add_variable(Variable::binary(format!("f({};{},{})", commodity, arc.tail, arc.head)));
                commodities[commodity].push(variable);
            }
        }
        for commodity in 1..n_nodes {
            let flow: &[VarId] = &commodities[commodity];
            // * sum of f(c;0,j) == sum of x(i,c)
            let constraint = LinearExpression::new()
                .sum(skeleton.orientation.outgoing(ROOT).iter().map(|&x| &flow[x]))
                .weighted_sum(skeleton.orientation.incoming(commodity).iter().map(|&x| &skeleton.arcs[x]), -1.0)
                .eq(0.0, format!("commodity_source({})", commodity));
            skeleton.model.add_constraint(constraint);
            // * sum of f(c;i,c) == sum of x(i,c)
            let constraint = LinearExpression::new()
                .sum(skeleton.orientation.incoming(commodity).iter().map(|&x| &flow[x]))
                .weighted_sum(skeleton.orientation.incoming(commodity).iter().map(|&x| &skeleton.arcs[x]), -1.0)
                .eq(0.0, format!("commodity_sink({})", commodity));
            skeleton.model.add_constraint(constraint);
            // * sum of f(c;i,v) == sum of f(c;v,j) for every v not in {0, c}
            for node in (1..n_nodes).filter(|&x| x != commodity) {
                let constraint = LinearExpression::new()
                    .sum(skeleton.orientation.incoming(node).iter().map(|&x| &flow[x]))
                    .weighted_sum(skeleton.orientation.outgoing(node).iter().map(|&x| &flow[x]), -1.0)
                    .eq(0.0, format!("commodity_conservation({};{})", commodity, node));
                skeleton.model.add_constraint(constraint);
            }
            // * f(c;i,j) <= x(i,j)
            for arc_i in 0..n_arcs {
                let constraint = LinearExpression::new()
                    .plus(flow[arc_i], 1.0)
                    .plus(skeleton.arc_var(arc_i), -1.0)
                    .leq(0.0, format!("commodity_link({};{})", commodity, arc_i));
                skeleton.model.add_constraint(constraint);
            }
        }
        debug!("Multi-commodity flow added {} commodities over {} arcs", n_nodes.saturating_sub(1), n_arcs);
        AuxiliaryVariables::Commodities(commodities)
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arcs::ArcId, instance::Instance};

    fn path_and_triangle() -> Instance {
        "6 5\n0 0 1 1\n1 1 2 1\n2 3 4 1\n3 4 5 1\n4 5 3 1\n".parse().unwrap()
    }

    fn assignment(skeleton: &TreeSkeleton, commodities: &[Vec<VarId>], arcs: &[ArcId], routes: &[(usize, &[ArcId])]) -> Vec<f64> {
        let mut values: Vec<f64> = vec![0.0; skeleton.model.variables().len()];
        for &arc in arcs {
            values[skeleton.arc_var(arc)] = 1.0;
        }
        for &(commodity, route) in routes {
            for &arc in route {
                values[commodities[commodity][arc]] = 1.0;
            }
        }
        values
    }

    #[test]
    fn one_commodity_per_non_root_node() {
        let instance = path_and_triangle();
        let mut skeleton = TreeSkeleton::new(&instance, 2);
        let AuxiliaryVariables::Commodities(commodities) = MultiCommodityFlow.encode(&mut skeleton) else {
            panic!("expected commodities");
        };
        assert!(commodities[0].is_empty());
        assert!(commodities[1..].iter().all(|x| x.len() == 10));
        assert_eq!(skeleton.model.variable(commodities[2][1]).label, "f(2;1,2)");
    }

    #[test]
    fn certifies_a_rooted_path() {
        let instance = path_and_triangle();
        let mut skeleton = TreeSkeleton::new(&instance, 2);
        let AuxiliaryVariables::Commodities(commodities) = MultiCommodityFlow.encode(&mut skeleton) else {
            panic!("expected commodities");
        };
        let values = assignment(&skeleton, &commodities, &[0, 1], &[(1, &[0]), (2, &[0, 1])]);
        assert!(skeleton.model.violated_constraints(&values, 1e-6).is_empty());
    }

    #[test]
    fn rejects_a_detached_cycle() {
        let instance = path_and_triangle();
        let mut skeleton = TreeSkeleton::new(&instance, 4);
        let AuxiliaryVariables::Commodities(commodities) = MultiCommodityFlow.encode(&mut skeleton) else {
            panic!("expected commodities");
        };
        let values = assignment(&skeleton, &commodities, &[0, 2, 3, 4], &[(1, &[0])]);
        let violated = skeleton.model.violated_constraints(&values, 1e-6);
        assert!(violated.contains(&"commodity_source(3)".to_string()));
        assert!(violated.contains(&"commodity_sink(4)".to_string()));
    }
}
