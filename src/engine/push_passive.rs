use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph};
use crate::scheduler::BitsetScheduler;
use crate::store::AtomicColors;

/** Flat per-vertex counter table: `count(v, c)` is the number of neighbors
of v currently holding color c, maintained by the writers (push updates).
Each vertex owns deg(v)+2 slots; updates for colors outside that width are
dropped, the vertex can never choose them. */
#[derive(Debug)]
struct CountTable {
    offsets: Vec<usize>,
    counts: Vec<AtomicUsize>,
}

impl CountTable {
    /// builds the table for the all-zeros seed: count(v, 0) = deg(v)
    fn new<G: Graph>(g: &G) -> Self {
        let n = g.nb_vertices();
        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        for v in 0..n {
            offsets.push(offsets[v] + g.degree(v) + 2);
        }
        let counts = (0..offsets[n]).map(|_| AtomicUsize::new(0)).collect();
        let table = Self { offsets, counts };
        for v in 0..n {
            table.counts[table.offsets[v]].store(g.degree(v), Ordering::Relaxed);
        }
        table
    }

    /// number of color slots owned by v
    fn width(&self, v: usize) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    fn get(&self, v: usize, c: ColorId) -> usize {
        self.counts[self.offsets[v] + c].load(Ordering::Acquire)
    }

    fn increment(&self, v: usize, c: ColorId) {
        self.counts[self.offsets[v] + c].fetch_add(1, Ordering::AcqRel);
    }

    /// returns the count before the decrement
    fn decrement(&self, v: usize, c: ColorId) -> usize {
        self.counts[self.offsets[v] + c].fetch_sub(1, Ordering::AcqRel)
    }
}

/** Passive-push parallel coloring. Instead of scanning neighbor colors, each
vertex consults its own counter table; whoever changes color pushes the
counter updates into every neighbor. A neighbor is rescheduled when its count
at the freed color drops to zero (its color may now be reducible) or when it
ends up sharing the new color. */
pub fn color_push_passive<G: Graph>(g: &G, verbose: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let colors = AtomicColors::new(vec![0; n]);
    let table = CountTable::new(g);
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
        let counts = &table;

        (0..n).into_par_iter().for_each(|v| {
            if !sched.is_scheduled(v) {
                return;
            }
            let v_degree = g.degree(v);
            active_edges.fetch_add(v_degree, Ordering::Relaxed);

            let old_color = cells.read(v);
            // smallest color no neighbor currently holds
            let new_color = match (0..=v_degree + 1).find(|c| counts.get(v, *c) == 0) {
                Some(c) => c,
                // counts inflated by an in-flight push: settle next iteration
                None => {
                    sched.schedule(v);
                    return;
                }
            };
            if new_color == old_color {
                return;
            }
            cells.write(v, new_color);
            changed_vertices.fetch_add(1, Ordering::Relaxed);

            for u in g.neighbors(v) {
                if old_color < counts.width(*u) && counts.decrement(*u, old_color) == 1 {
                    sched.schedule(*u);
                }
                if new_color < counts.width(*u) {
                    counts.increment(*u, new_color);
                }
                if cells.read(*u) == new_color {
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
