use std::fmt::Debug;

use rayon::prelude::*;

/** Vertex Id */
pub type VertexId = usize;

/** Color value assigned to a vertex (first-fit minimal colorings use values
in [0, deg(v)]). */
pub type ColorId = usize;

/** Read-only view of an undirected graph.

Implementations must be safe to share between threads: the engines read
degrees and neighbor slices concurrently from a work-stealing pool and never
mutate the graph during coloring. */
pub trait Graph: Debug + Sync {
    /// returns the number of vertices in the graph
    fn nb_vertices(&self) -> usize;

    /// returns the number of undirected edges in the graph
    fn nb_edges(&self) -> usize;

    /// number of neighbors of vertex v
    fn degree(&self, v: VertexId) -> usize;

    /// returns the neighbors of vertex v as a slice (no allocation)
    fn neighbors(&self, v: VertexId) -> &[VertexId];

    /// returns true iff u and v are adjacent
    fn are_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.neighbors(u).iter().any(|w| *w == v)
    }

    /// maximum out-degree over all vertices (Δ)
    fn max_degree(&self) -> usize {
        (0..self.nb_vertices())
            .into_par_iter()
            .map(|v| self.degree(v))
            .max()
            .unwrap_or(0)
    }

    /// displays various information about the instance
    fn display_statistics(&self) {}
}
