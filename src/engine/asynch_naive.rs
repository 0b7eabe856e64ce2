use std::sync::atomic::{AtomicUsize, Ordering};

use bit_set::BitSet;
use rayon::prelude::*;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph};
use crate::scheduler::BitsetScheduler;
use crate::store::{AtomicColors, ColorSeed};

/** Parallel greedy coloring without synchronization beyond word-sized atomic
cells. Neighbor reads may be stale; a stale read can only produce a color
that a later iteration corrects, because every changed vertex reschedules all
of its neighbors. Termination is reached when an iteration produces no
change. */
pub fn color_asynch_naive<G: Graph>(g: &G, seed: ColorSeed, verbose: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let colors = AtomicColors::new(seed.initial(g));
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

        (0..n).into_par_iter().for_each(|v| {
            if !sched.is_scheduled(v) {
                return;
            }
            let v_degree = g.degree(v);
            active_edges.fetch_add(v_degree, Ordering::Relaxed);

            let mut forbidden = BitSet::new();
            for u in g.neighbors(v) {
                forbidden.insert(cells.read(*u));
            }

            let new_color = (0..=v_degree + 1)
                .find(|c| !forbidden.contains(*c))
                .unwrap();
            if new_color != cells.read(v) {
                cells.write(v, new_color);
                changed_vertices.fetch_add(1, Ordering::Relaxed);
                for u in g.neighbors(v) {
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
    fn test_triangle_is_a_bijection() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
        let mut colors =
            sequential_pool().install(|| color_asynch_naive(&g, ColorSeed::Zero, false));
        colors.sort_unstable();
        assert_eq!(colors, vec![0, 1, 2]);
    }

    #[test]
    fn test_path() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let colors =
            sequential_pool().install(|| color_asynch_naive(&g, ColorSeed::MaxDegree, false));
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_cycle() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let colors =
            sequential_pool().install(|| color_asynch_naive(&g, ColorSeed::MaxDegree, false));
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_random_graphs_reach_the_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            let g = random_graph(120, 0.05, &mut rng);
            let colors =
                sequential_pool().install(|| color_asynch_naive(&g, ColorSeed::Zero, false));
            let assessment = assess_coloring(&g, &colors);
            assert!(assessment.is_success());
            for (v, c) in colors.iter().enumerate() {
                assert!(*c <= g.degree(v));
            }
        }
    }
}
