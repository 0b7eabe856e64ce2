use bit_set::BitSet;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph};
use crate::scheduler::BitsetScheduler;
use crate::store::ColorSeed;

/** Sequential greedy coloring. Processes scheduled vertices in index order,
assigns each the smallest color absent from its neighborhood and reschedules
all neighbors of every changed vertex. The outcome is deterministic given the
input order. */
pub fn color_serial_naive<G: Graph>(g: &G, seed: ColorSeed, verbose: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let mut colors = seed.initial(g);
    let mut schedule = BitsetScheduler::new(n);
    schedule.schedule_all();

    let mut log = IterationLog::new(verbose);
    let mut iter = 0;
    while schedule.any_scheduled() {
        iter += 1;
        schedule.begin_iteration();
        log.begin(iter);
        let active_vertices = schedule.nb_scheduled();
        let mut active_edges = 0;
        let mut changed_vertices = 0;

        for v in 0..n {
            if !schedule.is_scheduled(v) {
                continue;
            }
            let v_degree = g.degree(v);
            active_edges += v_degree;

            let mut forbidden = BitSet::new();
            for u in g.neighbors(v) {
                forbidden.insert(colors[*u]);
            }

            // the search range [0, deg(v)+1] always contains a free color
            let new_color = (0..=v_degree + 1)
                .find(|c| !forbidden.contains(*c))
                .unwrap();
            if new_color != colors[v] {
                colors[v] = new_color;
                changed_vertices += 1;
                for u in g.neighbors(v) {
                    schedule.schedule(*u);
                }
            }
        }
        log.end(active_vertices, active_edges, changed_vertices);
    }
    log.finish();
    colors
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::assess::assess_coloring;
    use crate::csr::CsrGraph;

    #[test]
    fn test_triangle() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        let colors = color_serial_naive(&g, ColorSeed::MaxDegree, false);
        assert_eq!(colors, vec![0, 1, 2]);
    }

    #[test]
    fn test_triangle_zero_seed_is_a_bijection() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        let mut colors = color_serial_naive(&g, ColorSeed::Zero, false);
        colors.sort_unstable();
        assert_eq!(colors, vec![0, 1, 2]);
    }

    #[test]
    fn test_path() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let colors = color_serial_naive(&g, ColorSeed::MaxDegree, false);
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_star() {
        let g = CsrGraph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let colors = color_serial_naive(&g, ColorSeed::MaxDegree, false);
        assert_eq!(colors, vec![0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_clique_uses_four_colors() {
        let g = CsrGraph::from_edges(
            4,
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        );
        let mut colors = color_serial_naive(&g, ColorSeed::MaxDegree, false);
        colors.sort_unstable();
        assert_eq!(colors, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_disconnected_edges() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (2, 3)]);
        let colors = color_serial_naive(&g, ColorSeed::MaxDegree, false);
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_cycle() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let colors = color_serial_naive(&g, ColorSeed::MaxDegree, false);
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_long_path_terminates() {
        // worst case for reactivation chains: changes propagate end to end
        let edges: Vec<(usize, usize)> = (0..999).map(|v| (v, v + 1)).collect();
        let g = CsrGraph::from_edges(1000, &edges);
        let colors = color_serial_naive(&g, ColorSeed::Zero, false);
        assert!(assess_coloring(&g, &colors).is_success());
    }

    #[test]
    fn test_random_seed_still_converges() {
        let g = CsrGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 3)]);
        let colors = color_serial_naive(&g, ColorSeed::Random, false);
        assert!(assess_coloring(&g, &colors).is_success());
    }
}
