use std::sync::atomic::{AtomicUsize, Ordering};

use bit_set::BitSet;
use rayon::prelude::*;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph};
use crate::scheduler::BitsetScheduler;
use crate::store::{priority_permutation, ColorSeed, LockedColors};

/// outcome of a successful recoloring attempt
struct Recolored {
    old_color: ColorId,
    new_color: ColorId,
    /// colors read under the neighbor locks, in neighbor-index order
    neighbor_colors: Vec<ColorId>,
}

/** One acquisition attempt for v: write lock on self, then try-read locks on
the neighbors in index order. On a busy neighbor the wound-wait rule applies:
v dies when the neighbor outranks it on (degree, priority), releasing every
held lock (the guards drop), and the caller restarts; otherwise v retries the
try-lock. In read-commit mode each neighbor lock is released right after its
color is read, trading snapshot strength for a smaller lock footprint. */
fn try_recolor<G: Graph>(
    g: &G,
    cells: &LockedColors,
    v: usize,
    read_commit: bool,
) -> Option<Recolored> {
    let mut self_guard = cells.lock_w(v);
    let mut read_guards = Vec::new();
    let mut neighbor_colors = Vec::with_capacity(g.degree(v));
    for u in g.neighbors(v) {
        loop {
            match cells.try_lock_r(*u) {
                Some(guard) => {
                    neighbor_colors.push(*guard);
                    if !read_commit {
                        read_guards.push(guard);
                    }
                    break;
                }
                // busy: die if the holder outranks v, otherwise retry
                None => {
                    if cells.outranks(*u, v) {
                        return None;
                    }
                }
            }
        }
    }

    let old_color = *self_guard;
    let mut forbidden = BitSet::new();
    for c in &neighbor_colors {
        forbidden.insert(*c);
    }
    let new_color = (0..=g.degree(v) + 1)
        .find(|c| !forbidden.contains(*c))
        .unwrap();
    if new_color != old_color {
        *self_guard = new_color;
    }
    Some(Recolored { old_color, new_color, neighbor_colors })
}

fn run<G: Graph>(g: &G, seed: ColorSeed, verbose: bool, read_commit: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let priorities = priority_permutation(n, &mut rand::thread_rng());
    let cells = LockedColors::new(g, seed.initial(g), priorities);
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
        let store = &cells;

        (0..n).into_par_iter().for_each(|v| {
            if !sched.is_scheduled(v) {
                return;
            }
            active_edges.fetch_add(g.degree(v), Ordering::Relaxed);

            // restart the whole acquisition whenever v is wounded
            let recolored = loop {
                if let Some(r) = try_recolor(g, store, v, read_commit) {
                    break r;
                }
            };

            if recolored.new_color != recolored.old_color {
                changed_vertices.fetch_add(1, Ordering::Relaxed);
                if read_commit {
                    // the reads may be stale: reschedule the whole neighborhood
                    for u in g.neighbors(v) {
                        sched.schedule(*u);
                    }
                } else {
                    // neighbors above the freed color are the ones that may reduce
                    for (u, u_color) in g.neighbors(v).iter().zip(&recolored.neighbor_colors) {
                        if recolored.old_color < *u_color {
                            sched.schedule(*u);
                        }
                    }
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
    cells.into_colors()
}

/** Locking parallel coloring: every vertex recolors under a write lock on
itself and read locks on all neighbors, so each commit is first-fit minimal
with respect to a consistent snapshot. Deadlock-free by wound-wait on the
lexicographic (degree, priority) order. */
pub fn color_asynch_locks<G: Graph>(g: &G, seed: ColorSeed, verbose: bool) -> Vec<ColorId> {
    run(g, seed, verbose, false)
}

/** Read-commit variant: neighbor read locks are dropped as soon as the color
is read. The chosen color may race with concurrent neighbor writes; later
iterations correct it. */
pub fn color_asynch_locks_rc<G: Graph>(g: &G, seed: ColorSeed, verbose: bool) -> Vec<ColorId> {
    run(g, seed, verbose, true)
}
