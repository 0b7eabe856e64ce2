use bit_set::BitSet;

use crate::binary;
use crate::dimacs;
use crate::graph::{Graph, VertexId};

/** models a graph instance in compressed sparse row form.
All engines consume this representation through the [`Graph`] trait. */
#[derive(Debug)]
pub struct CsrGraph {
    /// nb vertices
    n: usize,
    /// nb undirected edges
    m: usize,
    /// offsets[v]..offsets[v+1] indexes the neighbor slice of v
    offsets: Vec<usize>,
    /// concatenated neighbor lists
    targets: Vec<VertexId>,
    /// adj_matrix[v]: bitset of the neighbors of v
    adj_matrix: Vec<BitSet>,
}

impl Graph for CsrGraph {
    fn nb_vertices(&self) -> usize { self.n }

    fn nb_edges(&self) -> usize { self.m }

    fn degree(&self, v: VertexId) -> usize { self.offsets[v + 1] - self.offsets[v] }

    fn neighbors(&self, v: VertexId) -> &[VertexId] {
        &self.targets[self.offsets[v]..self.offsets[v + 1]]
    }

    fn are_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.adj_matrix[u].contains(v)
    }

    fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees: Vec<usize> = (0..self.nb_vertices()).map(|v| self.degree(v)).collect();
        println!("\t{} \t min degree", degrees.iter().min().unwrap());
        println!("\t{} \t max degree", degrees.iter().max().unwrap());
    }
}

impl CsrGraph {
    /** constructor using an adjacency list */
    pub fn new(adj_list: Vec<Vec<VertexId>>) -> Self {
        let n = adj_list.len();
        // compute nb arcs (at the end: ∑ d(v))
        let mut nb_arcs = 0;
        for l in &adj_list {
            nb_arcs += l.len();
        }
        let mut offsets = Vec::with_capacity(n + 1);
        let mut targets = Vec::with_capacity(nb_arcs);
        let mut adj_matrix = vec![BitSet::new(); n];
        offsets.push(0);
        for (v, l) in adj_list.into_iter().enumerate() {
            for u in &l {
                adj_matrix[v].insert(*u);
            }
            targets.extend_from_slice(&l);
            offsets.push(targets.len());
        }
        Self { n, m: nb_arcs / 2, offsets, targets, adj_matrix }
    }

    /** constructor from an undirected edge list (inserts both directions) */
    pub fn from_edges(n: usize, edges: &[(VertexId, VertexId)]) -> Self {
        let mut adj_list = vec![Vec::new(); n];
        for (a, b) in edges {
            adj_list[*a].push(*b);
            adj_list[*b].push(*a);
        }
        Self::new(adj_list)
    }

    /// creates an instance from a DIMACS file
    pub fn from_file(filename: &str) -> Self {
        let (_, _, adj_list) = dimacs::read_from_file(filename);
        Self::new(adj_list)
    }

    /// creates an instance from a binary adjacency file
    pub fn from_binary_file(filename: &str) -> Self {
        let adj_list = binary::read_from_file(filename);
        Self::new(adj_list)
    }

    /// concatenated neighbor lists (used by the binary writer)
    pub(crate) fn arcs(&self) -> (&[usize], &[VertexId]) {
        (&self.offsets, &self.targets)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(g.nb_vertices(), 3);
        assert_eq!(g.nb_edges(), 3);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.neighbors(1), &[0, 2]);
        assert!(g.are_adjacent(0, 2));
        assert!(!g.are_adjacent(0, 0));
        assert_eq!(g.max_degree(), 2);
    }

    #[test]
    fn test_star() {
        let g = CsrGraph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        assert_eq!(g.degree(0), 5);
        assert_eq!(g.degree(3), 1);
        assert_eq!(g.neighbors(3), &[0]);
        assert_eq!(g.max_degree(), 5);
    }

    #[test]
    fn test_isolated_vertex() {
        let g = CsrGraph::from_edges(3, &[(0, 1)]);
        assert_eq!(g.degree(2), 0);
        assert!(g.neighbors(2).is_empty());
        assert_eq!(g.nb_edges(), 1);
    }
}
