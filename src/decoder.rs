use std::{collections::VecDeque, fmt::Write};
use itertools::Itertools;
use tracing::warn;
use crate::{
    arcs::{ArcId, ArcOrientation, Direction},
    formulation::{AuxiliaryVariables, Formulation},
    instance::{EdgeId, Instance, NodeId, Weight, ROOT},
    solver::{base_solver::Solution, errors::ExtractionError},
};





// Binary values above this count as selected.
const SELECTION_THRESHOLD: f64 = 0.5;



#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectedArc {
    pub arc: ArcId,
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
    pub direction: Direction,
}



/// Children of every node in the single-commodity flow, together with the flow sent to them.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowTree {
    children: Vec<Vec<(NodeId, f64)>>,
}

// FlowTree::FlowTree
impl FlowTree {
    pub fn new(n_nodes: usize) -> Self {
        FlowTree { children: vec![Vec::new(); n_nodes] }
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId, flow: f64) {
        self.children[parent].push((child, flow));
    }

    #[inline]
    pub fn children(&self, node: NodeId) -> &[(NodeId, f64)] {
        &self.children[node]
    }

    /// Graphviz digraph: every node with children is declared first, then the edges reachable
    /// from the root are listed breadth-first.
    pub fn to_dot(&self) -> String {
        let mut answer: String = "digraph G {\n".to_string();
        for node in (0..self.children.len()).filter(|&x| !self.children[x].is_empty()) {
            let _ = writeln!(answer, "\t{};", node);
        }
        let mut visited: Vec<bool> = vec![false; self.children.len()];
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        if !self.children.is_empty() {
            visited[ROOT] = true;
            queue.push_back(ROOT);
        }
        while let Some(node) = queue.pop_front() {
            for &(child, flow) in &self.children[node] {
                let _ = writeln!(answer, "\t{} -> {} [ label = \"{}\" ];", node, child, flow.round());
                if !visited[child] {
                    visited[child] = true;
                    queue.push_back(child);
                }
            }
        }
        answer.push_str("}\n");
        answer
    }
}



#[derive(Clone, Debug, PartialEq)]
pub struct SelectedTree {
    pub arcs: Vec<SelectedArc>,
    pub flow_tree: Option<FlowTree>,
    pub potentials: Option<Vec<f64>>,
    n_nodes: usize,
}

// SelectedTree::SelectedTree
impl SelectedTree {
    pub fn total_weight(&self) -> u64 {
        self.arcs.iter().map(|x| x.weight as u64).sum()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.arcs.iter().map(|x| x.edge).sorted().collect()
    }

    /// Nodes the selected arcs connect to the root, in breadth-first order starting with the root.
    pub fn reached_nodes(&self) -> Vec<NodeId> {
        let mut children: Vec<Vec<NodeId>> = vec![Vec::new(); self.n_nodes];
        for arc in &self.arcs {
            children[arc.from].push(arc.to);
        }
        let mut visited: Vec<bool> = vec![false; self.n_nodes];
        let mut answer: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        if self.n_nodes > 0 {
            visited[ROOT] = true;
            queue.push_back(ROOT);
        }
        while let Some(node) = queue.pop_front() {
            answer.push(node);
            for &child in &children[node] {
                if !visited[child] {
                    visited[child] = true;
                    queue.push_back(child);
                }
            }
        }
        answer
    }

    /// True if the selected arcs form one arborescence hanging off the root.
    pub fn is_arborescence(&self) -> bool {
        let mut in_degree: Vec<usize> = vec![0; self.n_nodes];
        for arc in &self.arcs {
            in_degree[arc.to] += 1;
        }
        if in_degree.first().is_some_and(|&x| x > 0) || in_degree.iter().any(|&x| x > 1) {
            return false;
        }
        // Every arc enters a distinct node, so all of them hang off the root iff their heads are reached.
        self.reached_nodes().len() == self.arcs.len() + 1
    }

    /// One line per selected arc, annotated with the flow it carries or the potential of its head.
    pub fn listing(&self) -> String {
        let mut answer: String = String::new();
        for arc in &self.arcs {
            let annotation: String = match (&self.flow_tree, &self.potentials) {
                (Some(flow_tree), _) => {
                    let flow: f64 = flow_tree.children(arc.from).iter().find(|x| x.0 == arc.to).map(|x| x.1).unwrap_or_default();
                    format!(" f: {:2}", flow.round())
                },
                (None, Some(potentials)) => format!(" u: {:2}", potentials[arc.to].round()),
                (None, None) => String::new(),
            };
            let _ = writeln!(answer, "{:4}:{} edge({:3} to {:3}, w: {})", arc.arc, annotation, arc.from, arc.to, arc.weight);
        }
        answer
    }
}



fn auxiliary_group(solution: &Solution, group: &str, indices: &[usize]) -> Option<Vec<f64>> {
    match solution.group_values(group, indices) {
        Ok(values) => Some(values),
        Err(error) => {
            warn!("{} Continuing without them.", error);
            None
        },
    }
}

/// Reads the selected arcs back from a solution. Only missing arc values are an error, missing
/// auxiliary values leave the corresponding part of the tree empty.
pub fn decode(instance: &Instance, formulation: &Formulation, solution: &Solution) -> Result<SelectedTree, ExtractionError> {
    let orientation: ArcOrientation = ArcOrientation::new(instance);
    let arc_values: Vec<f64> = solution.group_values("arc selection", &formulation.arcs)?;
    let selected: Vec<ArcId> = (0..arc_values.len()).filter(|&x| arc_values[x] > SELECTION_THRESHOLD).collect();
    let arcs: Vec<SelectedArc> = selected
        .iter()
        .map(|&x| {
            let arc = orientation.arc(x);
            SelectedArc { arc: x, edge: arc.edge, from: arc.tail, to: arc.head, weight: orientation.weight(x), direction: arc.direction }
        })
        .collect();
    let mut flow_tree: Option<FlowTree> = None;
    let mut potentials: Option<Vec<f64>> = None;
    match &formulation.auxiliary {
        AuxiliaryVariables::Flow(flow) => {
            flow_tree = auxiliary_group(solution, "flow", flow).map(|values| {
                let mut answer = FlowTree::new(instance.n_nodes());
                for arc in &arcs {
                    answer.add_child(arc.from, arc.to, values[arc.arc]);
                }
                answer
            });
        },
        AuxiliaryVariables::Potentials(indices) => potentials = auxiliary_group(solution, "potentials", indices),
        AuxiliaryVariables::Commodities(_) => (),
    }
    Ok(SelectedTree { arcs, flow_tree, potentials, n_nodes: instance.n_nodes() })
}
