use tracing::debug;
use crate::{arcs::{ArcId, ArcOrientation}, instance::{Instance, NodeId, ROOT}, model::{LinearExpression, Model, VarId, Variable}};





/// Arc variables plus the constraints every formulation shares: one orientation per edge,
/// exactly K selected arcs, in-degree at most one, and a root with no incoming arcs and a
/// single outgoing arc.
///
/// These constraints alone still admit cycles detached from the root; a
/// [`ConnectivityEncoder`](super::ConnectivityEncoder) has to rule those out.
pub struct TreeSkeleton<'a> {
    pub orientation: ArcOrientation<'a>,
    pub model: Model,
    pub arcs: Vec<VarId>,
    pub arc_target: usize,
}

// TreeSkeleton::TreeSkeleton
impl<'a> TreeSkeleton<'a> {
    pub fn new(instance: &'a Instance, arc_target: usize) -> Self {
        let orientation: ArcOrientation = ArcOrientation::new(instance);
        let mut model: Model = Model::new();
        // * x(i,j) in {0, 1} for every arc i -> j
        let arcs: Vec<VarId> = orientation
            .iter()
            .map(|arc| model.add_variable(Variable::binary(format!("x({},{})", arc.tail, arc.head))))
            .collect();
        let mut skeleton = TreeSkeleton { orientation, model, arcs, arc_target };
        skeleton.add_tree_constraints();
        skeleton
    }

    fn add_tree_constraints(&mut self) {
        let instance: &Instance = self.orientation.instance();
        // * x(i,j) + x(j,i) <= 1
        for edge in instance.edges() {
            let constraint = LinearExpression::new()
                .plus(self.arc_var(self.orientation.forward(edge.id)), 1.0)
                .plus(self.arc_var(self.orientation.backward(edge.id)), 1.0)
                .leq(1.0, format!("exclusive({})", edge.id));
            self.model.add_constraint(constraint);
        }
        // * sum of all x == K
        let constraint = LinearExpression::new().sum(&self.arcs).eq(self.arc_target as f64, "size");
        self.model.add_constraint(constraint);
        // * sum of x(i,v) over incoming arcs <= 1
        for node in 0..instance.n_nodes() {
            if self.orientation.incoming(node).is_empty() {
                continue;
            }
            let constraint = self.incoming_arc_sum(node).leq(1.0, format!("indegree({})", node));
            self.model.add_constraint(constraint);
        }
        // * sum of x(0,j) == 1, unless the root has no edges at all
        if !self.orientation.outgoing(ROOT).is_empty() {
            let constraint = LinearExpression::new()
                .sum(self.orientation.outgoing(ROOT).iter().map(|&x| &self.arcs[x]))
                .eq(1.0, "root_out");
            self.model.add_constraint(constraint);
        } else {
            debug!("Root has no incident edges, skipping the root out-degree constraint");
        }
        // * x(i,0) == 0
        for &arc in self.orientation.incoming(ROOT) {
            self.model.fix_variable(self.arcs[arc], 0.0);
        }
    }

    #[inline]
    pub fn arc_var(&self, arc: ArcId) -> VarId {
        self.arcs[arc]
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.orientation.instance().n_nodes()
    }

    /// Sum of x over the arcs entering `node`, i.e. the indicator that `node` is reached.
    pub fn incoming_arc_sum(&self, node: NodeId) -> LinearExpression {
        LinearExpression::new().sum(self.orientation.incoming(node).iter().map(|&x| &self.arcs[x]))
    }

    // * minimise sum of w(e) x(i,j)
    pub fn add_objective(&mut self) {
        let objective: LinearExpression = self
            .orientation
            .iter()
            .fold(LinearExpression::new(), |expression, arc| expression.plus(self.arcs[arc.id], self.orientation.weight(arc.id) as f64));
        self.model.set_objective(objective);
    }
}
