use std::process;

use bit_set::BitSet;
use rayon::prelude::*;

use crate::graph::{ColorId, Graph};
use crate::store::ColorSeed;

/** Result of assessing a finished coloring: violation counts and the
extremal values reported alongside the verdict. */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Assessment {
    /// vertices sharing a color with at least one neighbor
    pub nb_conflicting: usize,
    /// vertices not holding the smallest color absent from their neighborhood
    pub nb_not_minimal: usize,
    /// largest color in use
    pub max_color: ColorId,
    /// largest out-degree in the graph
    pub max_degree: usize,
}

impl Assessment {
    /// true iff the coloring is conflict-free and first-fit minimal
    pub fn is_success(&self) -> bool {
        self.nb_conflicting == 0 && self.nb_not_minimal == 0
    }

    /// prints the verdict lines
    pub fn report(&self) {
        if self.nb_conflicting != 0 {
            println!("Failure: color conflicts on {} vertices", self.nb_conflicting);
        }
        if self.nb_not_minimal != 0 {
            println!(
                "Failure: minimality condition broken for {} vertices",
                self.nb_not_minimal
            );
        }
        if self.is_success() {
            println!("Successful Coloring!");
            println!("Max Color: {}\tMax Degree: {}", self.max_color, self.max_degree);
        }
    }
}

/** Checks every vertex against its neighbors: counts color conflicts and
minimality violations, tracks the largest color. Runs in parallel; the
outcome does not depend on the enumeration order. */
pub fn assess_coloring<G: Graph>(g: &G, colors: &[ColorId]) -> Assessment {
    let n = g.nb_vertices();
    let (nb_conflicting, nb_not_minimal, max_color) = (0..n)
        .into_par_iter()
        .map(|v| {
            let v_color = colors[v];
            let mut forbidden = BitSet::new();
            let mut conflict = false;
            for u in g.neighbors(v) {
                forbidden.insert(colors[*u]);
                if colors[*u] == v_color {
                    conflict = true;
                }
            }
            // the search range [0, deg(v)+1] always contains a free color
            let minimal = (0..=g.degree(v) + 1)
                .find(|c| !forbidden.contains(*c))
                .unwrap();
            (conflict as usize, (v_color != minimal) as usize, v_color)
        })
        .reduce(
            || (0, 0, 0),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2.max(b.2)),
        );
    Assessment { nb_conflicting, nb_not_minimal, max_color, max_degree: g.max_degree() }
}

/** Checks that the graph is undirected (in-degree equals out-degree for every
vertex); exits with code 2 otherwise. */
pub fn ensure_undirected<G: Graph>(g: &G) {
    let n = g.nb_vertices();
    let mut in_degrees = vec![0usize; n];
    for v in 0..n {
        for u in g.neighbors(v) {
            in_degrees[*u] += 1;
        }
    }
    for v in 0..n {
        if in_degrees[v] != g.degree(v) {
            println!("Graph is not undirected. Exiting...");
            process::exit(2);
        }
    }
}

/// seeds every vertex with a uniform random color in [0, deg(v)]
pub fn randomize_colors<G: Graph>(g: &G) -> Vec<ColorId> {
    ColorSeed::Random.initial(g)
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::csr::CsrGraph;

    fn triangle() -> CsrGraph {
        CsrGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)])
    }

    #[test]
    fn test_success_on_proper_minimal_coloring() {
        let g = triangle();
        let assessment = assess_coloring(&g, &[0, 1, 2]);
        assert!(assessment.is_success());
        assert_eq!(assessment.max_color, 2);
        assert_eq!(assessment.max_degree, 2);
    }

    #[test]
    fn test_counts_conflicts() {
        let g = triangle();
        let assessment = assess_coloring(&g, &[0, 0, 1]);
        assert_eq!(assessment.nb_conflicting, 2);
        assert!(!assessment.is_success());
    }

    #[test]
    fn test_counts_non_minimal() {
        // path 0-1-2: [0,1,2] is proper but vertex 2 could take 0
        let g = CsrGraph::from_edges(3, &[(0, 1), (1, 2)]);
        let assessment = assess_coloring(&g, &[0, 1, 2]);
        assert_eq!(assessment.nb_conflicting, 0);
        assert_eq!(assessment.nb_not_minimal, 1);
    }

    #[test]
    fn test_randomize_colors_in_degree_range() {
        let g = CsrGraph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let colors = randomize_colors(&g);
        for (v, c) in colors.iter().enumerate() {
            assert!(*c <= g.degree(v));
        }
    }
}
