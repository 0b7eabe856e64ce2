use std::sync::atomic::{AtomicUsize, Ordering};

use bit_set::BitSet;
use rayon::prelude::*;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph};
use crate::scheduler::BitsetScheduler;
use crate::store::{AtomicColors, ColorSeed};

/** Optimistic parallel coloring. Each vertex computes a candidate color from
a snapshot of its neighbors, publishes it to a side cell and validates it
with a compare-and-set pass: if any neighbor already claims the same
candidate, the candidate is reverted to the old color and the vertex retries
in the next iteration. On commit, only the neighbors whose color strictly
exceeds the old color are rescheduled; they are the ones that may now
reduce. */
pub fn color_asynch_occ<G: Graph>(g: &G, seed: ColorSeed, verbose: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let initial = seed.initial(g);
    let colors = AtomicColors::new(initial.clone());
    let potential = AtomicColors::new(initial);
    let mut schedule = BitsetScheduler::new(n);
    schedule.schedule_all();

    let mut log = IterationLog::new(verbose);
    let mut iter = 0;
    while schedule.any_scheduled() {
        iter += 1;
        schedule.begin_iteration();
        log.begin(iter);
        let active_vertices = schedule.nb_scheduled();
        let active_edges = AtomicUsize::new(0);
        let changed_vertices = AtomicUsize::new(0);
        let sched = &schedule;
        let cells = &colors;
        let candidates = &potential;

        (0..n).into_par_iter().for_each(|v| {
            if !sched.is_scheduled(v) {
                return;
            }
            let v_degree = g.degree(v);
            active_edges.fetch_add(v_degree, Ordering::Relaxed);

            let old_color = cells.read(v);
            let mut forbidden = BitSet::new();
            for u in g.neighbors(v) {
                forbidden.insert(cells.read(*u));
            }
            let candidate = (0..=v_degree + 1)
                .find(|c| !forbidden.contains(*c))
                .unwrap();
            if candidate == old_color {
                return;
            }
            candidates.write(v, candidate);

            // validation: revert and retry later if a neighbor claims the same candidate
            for u in g.neighbors(v) {
                if candidates.cas(v, candidates.read(*u), old_color) {
                    sched.schedule(v);
                    return;
                }
            }

            cells.write(v, candidate);
            changed_vertices.fetch_add(1, Ordering::Relaxed);
            for u in g.neighbors(v) {
                if old_color < cells.read(*u) {
                    sched.schedule(*u);
                }
            }
        });
        log.end(
            active_vertices,
            active_edges.into_inner(),
            changed_vertices.into_inner(),
        );
    }
    log.finish();
    colors.into_colors()
}


#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::assess::assess_coloring;
    use crate::csr::CsrGraph;

    fn sequential_pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap()
    }

    fn random_graph(n: usize, p: f64, rng: &mut StdRng) -> CsrGraph {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen::<f64>() < p {
                    edges.push((i, j));
                }
            }
        }
        CsrGraph::from_edges(n, &edges)
    }

    #[test]
    fn test_triangle() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        let colors =
            sequential_pool().install(|| color_asynch_occ(&g, ColorSeed::MaxDegree, false));
        assert_eq!(colors, vec![0, 1, 2]);
    }

    #[test]
    fn test_path() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let colors =
            sequential_pool().install(|| color_asynch_occ(&g, ColorSeed::MaxDegree, false));
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_clique_uses_four_colors() {
        let g = CsrGraph::from_edges(
            4,
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        );
        let mut colors =
            sequential_pool().install(|| color_asynch_occ(&g, ColorSeed::MaxDegree, false));
        colors.sort_unstable();
        assert_eq!(colors, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_random_graphs_reach_the_invariants() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..5 {
            let g = random_graph(120, 0.05, &mut rng);
            let colors = sequential_pool()
                .install(|| color_asynch_occ(&g, ColorSeed::MaxDegree, false));
            assert!(assess_coloring(&g, &colors).is_success());
        }
    }
}
