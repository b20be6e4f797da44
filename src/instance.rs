use std::{collections::BTreeMap, fs::File, io::{BufRead, BufReader}, path::Path, str::FromStr};
use itertools::Itertools;
use tracing::info;
use crate::solver::errors::{KmstError, MalformedInputError};





pub type NodeId = usize;
pub type EdgeId = usize;
pub type Weight = u32;

/// Node 0 is the artificial root of every instance.
pub const ROOT: NodeId = 0;



#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub v1: NodeId,
    pub v2: NodeId,
    pub weight: Weight,
}

// Edge::Edge
impl Edge {
    #[inline]
    pub fn new(id: EdgeId, v1: NodeId, v2: NodeId, weight: Weight) -> Self {
        Edge { id, v1, v2, weight }
    }

    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if node == self.v1 { self.v2 } else { self.v1 }
    }
}



/// A weighted undirected graph together with per-node incidence lists.
///
/// Instances are read-only once built: every formulation borrows the same instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    edges: Vec<Edge>,
    incident_edges: Vec<Vec<EdgeId>>,
}

// Instance::Instance
impl Instance {
    pub fn new(n_nodes: usize, edges: Vec<Edge>) -> Result<Self, MalformedInputError> {
        if n_nodes == 0 {
            return Err(MalformedInputError::new("An instance needs at least the root node 0."));
        }
        // The node count may come straight from a file header.
        let mut incident_edges: Vec<Vec<EdgeId>> = Vec::new();
        incident_edges
            .try_reserve_exact(n_nodes)
            .map_err(|_| MalformedInputError::new(format!("Cannot hold {} nodes.", n_nodes)))?;
        incident_edges.resize_with(n_nodes, Vec::new);
        for (edge_i, edge) in edges.iter().enumerate() {
            if edge.id != edge_i {
                return Err(MalformedInputError::new(format!("Edge stored at position {} carries id {}.", edge_i, edge.id)));
            }
            Self::check_endpoints(edge, n_nodes).map_err(MalformedInputError::new)?;
            incident_edges[edge.v1].push(edge.id);
            incident_edges[edge.v2].push(edge.id);
        }
        Ok(Instance { edges, incident_edges })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KmstError> {
        let path: &Path = path.as_ref();
        info!("Reading instance from file {}", path.display());
        let file: File = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, KmstError> {
        let mut records: Vec<(usize, Vec<String>)> = Vec::new();
        for (line_i, line) in reader.lines().enumerate() {
            let line: String = line?;
            let fields = line.split_whitespace().map(str::to_string).collect_vec();
            if !fields.is_empty() {
                records.push((line_i + 1, fields));
            }
        }
        Ok(Self::from_records(records)?)
    }

    // Shared by from_reader and FromStr: one record per non-blank line,
    // tagged with its 1-based line number for diagnostics.
    fn from_records(records: Vec<(usize, Vec<String>)>) -> Result<Self, MalformedInputError> {
        let mut records = records.into_iter();
        let (header_line, header) = records.next().ok_or_else(|| MalformedInputError::new("The instance is empty."))?;
        if header.len() != 2 {
            return Err(MalformedInputError::at_line(header_line, "Expected the header 'n_nodes n_edges'."));
        }
        let n_nodes: usize = parse_field(&header[0], "node count", header_line)?;
        let n_edges: usize = parse_field(&header[1], "edge count", header_line)?;
        if n_nodes == 0 {
            return Err(MalformedInputError::at_line(header_line, "An instance needs at least the root node 0."));
        }
        info!("Number of nodes: {}, number of edges: {}", n_nodes, n_edges);
        let mut slots: BTreeMap<EdgeId, Edge> = BTreeMap::new();
        let mut read_count: usize = 0;
        for (line, fields) in records {
            if read_count == n_edges {
                return Err(MalformedInputError::at_line(line, format!("More than the announced {} edges.", n_edges)));
            }
            if fields.len() != 4 {
                return Err(MalformedInputError::at_line(line, "Expected an edge record 'edge_id v1 v2 weight'."));
            }
            let edge = Edge::new(
                parse_field(&fields[0], "edge id", line)?,
                parse_field(&fields[1], "endpoint", line)?,
                parse_field(&fields[2], "endpoint", line)?,
                parse_field(&fields[3], "weight", line)?,
            );
            if edge.id >= n_edges {
                return Err(MalformedInputError::at_line(line, format!("Edge id {} is out of range [0, {}).", edge.id, n_edges)));
            }
            Self::check_endpoints(&edge, n_nodes).map_err(|x| MalformedInputError::at_line(line, x))?;
            if slots.insert(edge.id, edge).is_some() {
                return Err(MalformedInputError::at_line(line, format!("Edge id {} appears twice.", edge.id)));
            }
            read_count += 1;
        }
        if read_count < n_edges {
            return Err(MalformedInputError::new(format!("Truncated input: {} of {} edges were read.", read_count, n_edges)));
        }
        Self::new(n_nodes, slots.into_values().collect())
    }

    fn check_endpoints(edge: &Edge, n_nodes: usize) -> Result<(), String> {
        for endpoint in [edge.v1, edge.v2] {
            if endpoint >= n_nodes {
                return Err(format!("Edge {} references node {} outside [0, {}).", edge.id, endpoint, n_nodes));
            }
        }
        if edge.v1 == edge.v2 {
            return Err(format!("Edge {} is a self-loop at node {}.", edge.id, edge.v1));
        }
        Ok(())
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.incident_edges.len()
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.incident_edges[node]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident_edges[node].len()
    }

    /// Nodes reachable from the root, the root included.
    pub fn reachable_from_root(&self) -> Vec<NodeId> {
        let mut visited: Vec<bool> = vec![false; self.n_nodes()];
        let mut stack: Vec<NodeId> = vec![ROOT];
        visited[ROOT] = true;
        while let Some(node) = stack.pop() {
            for &edge_id in self.incident_edges(node) {
                let adjacent_id = self.edges[edge_id].other(node);
                if !visited[adjacent_id] {
                    visited[adjacent_id] = true;
                    stack.push(adjacent_id);
                }
            }
        }
        (0..self.n_nodes()).filter(|&x| visited[x]).collect()
    }
}

// Instance::FromStr
impl FromStr for Instance {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let records = s
            .lines()
            .enumerate()
            .map(|(line_i, line)| (line_i + 1, line.split_whitespace().map(str::to_string).collect_vec()))
            .filter(|(_, fields)| !fields.is_empty())
            .collect_vec();
        Self::from_records(records)
    }
}



fn parse_field<T: FromStr>(field: &str, what: &str, line: usize) -> Result<T, MalformedInputError> {
    field.parse().map_err(|_| MalformedInputError::at_line(line, format!("Cannot parse {} from '{}'.", what, field)))
}
