use crate::instance::{Edge, EdgeId, Instance, NodeId, Weight};





pub type ArcId = usize;



#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}



#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arc {
    pub id: ArcId,
    pub edge: EdgeId,
    pub tail: NodeId,
    pub head: NodeId,
    pub direction: Direction,
}



// Arc id i < m orients edge i as v1 -> v2, arc id i + m orients it as v2 -> v1.
pub struct ArcOrientation<'a> {
    instance: &'a Instance,
    incoming: Vec<Vec<ArcId>>,
    outgoing: Vec<Vec<ArcId>>,
}

// ArcOrientation::ArcOrientation
impl<'a> ArcOrientation<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        let mut incoming: Vec<Vec<ArcId>> = vec![Vec::new(); instance.n_nodes()];
        let mut outgoing: Vec<Vec<ArcId>> = vec![Vec::new(); instance.n_nodes()];
        for node in 0..instance.n_nodes() {
            for &edge_id in instance.incident_edges(node) {
                let edge: &Edge = instance.edge(edge_id);
                if edge.v1 == node {
                    outgoing[node].push(edge_id);
                    incoming[node].push(edge_id + instance.n_edges());
                } else {
                    outgoing[node].push(edge_id + instance.n_edges());
                    incoming[node].push(edge_id);
                }
            }
        }
        ArcOrientation { instance, incoming, outgoing }
    }

    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        2 * self.instance.n_edges()
    }

    #[inline]
    pub fn forward(&self, edge: EdgeId) -> ArcId {
        edge
    }

    #[inline]
    pub fn backward(&self, edge: EdgeId) -> ArcId {
        edge + self.instance.n_edges()
    }

    #[inline]
    pub fn reverse(&self, arc: ArcId) -> ArcId {
        let m: usize = self.instance.n_edges();
        if arc < m { arc + m } else { arc - m }
    }

    pub fn arc(&self, id: ArcId) -> Arc {
        let m: usize = self.instance.n_edges();
        let edge: &Edge = self.instance.edge(id % m);
        if id < m {
            Arc { id, edge: edge.id, tail: edge.v1, head: edge.v2, direction: Direction::Forward }
        } else {
            Arc { id, edge: edge.id, tail: edge.v2, head: edge.v1, direction: Direction::Backward }
        }
    }

    #[inline]
    pub fn weight(&self, id: ArcId) -> Weight {
        self.instance.edge(id % self.instance.n_edges()).weight
    }

    #[inline]
    pub fn incoming(&self, node: NodeId) -> &[ArcId] {
        &self.incoming[node]
    }

    #[inline]
    pub fn outgoing(&self, node: NodeId) -> &[ArcId] {
        &self.outgoing[node]
    }

    pub fn iter(&self) -> impl Iterator<Item = Arc> + '_ {
        (0..self.arc_count()).map(|x| self.arc(x))
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> Instance {
        "3 3\n0 0 1 4\n1 1 2 2\n2 2 0 7\n".parse().unwrap()
    }

    #[test]
    fn arcs_are_doubled_edges() {
        let instance = triangle();
        let orientation = ArcOrientation::new(&instance);
        assert_eq!(orientation.arc_count(), 6);
        assert_eq!(orientation.arc(1), Arc { id: 1, edge: 1, tail: 1, head: 2, direction: Direction::Forward });
        assert_eq!(orientation.arc(4), Arc { id: 4, edge: 1, tail: 2, head: 1, direction: Direction::Backward });
        assert_eq!(orientation.weight(5), 7);
        assert_eq!(orientation.reverse(2), 5);
        assert_eq!(orientation.reverse(5), 2);
    }

    #[test]
    fn incidence_splits_by_direction() {
        let instance = triangle();
        let orientation = ArcOrientation::new(&instance);
        assert_eq!(orientation.outgoing(0), &[0, 5]);
        assert_eq!(orientation.incoming(0), &[3, 2]);
        assert_eq!(orientation.outgoing(2), &[4, 2]);
        assert_eq!(orientation.incoming(2), &[1, 5]);
    }

    proptest! {
        #[test]
        fn every_arc_leaves_its_tail_and_enters_its_head(
            n_nodes in 2usize..8,
            raw_edges in proptest::collection::vec((0usize..8, 0usize..8, 0u32..20), 0..16)
        ) {
            let edges: Vec<Edge> = raw_edges
                .into_iter()
                .map(|(v1, v2, weight)| (v1 % n_nodes, v2 % n_nodes, weight))
                .filter(|(v1, v2, _)| v1 != v2)
                .enumerate()
                .map(|(id, (v1, v2, weight))| Edge::new(id, v1, v2, weight))
                .collect();
            let instance = Instance::new(n_nodes, edges).unwrap();
            let orientation = ArcOrientation::new(&instance);
            for arc in orientation.iter() {
                prop_assert!(orientation.outgoing(arc.tail).contains(&arc.id));
                prop_assert!(orientation.incoming(arc.head).contains(&arc.id));
                prop_assert_eq!(orientation.arc(orientation.reverse(arc.id)).tail, arc.head);
            }
            let total_out: usize = (0..n_nodes).map(|x| orientation.outgoing(x).len()).sum();
            prop_assert_eq!(total_out, orientation.arc_count());
        }
    }
}
