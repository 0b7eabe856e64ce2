use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use bit_set::BitSet;
use rayon::prelude::*;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph, VertexId};
use crate::scheduler::BitsetScheduler;
use crate::store::AtomicColors;

/// serial first pass: greedily colors every vertex and groups the vertices
/// into one bucket per color
fn make_color_partition<G: Graph>(
    g: &G,
    colors: &mut [ColorId],
    nb_buckets: usize,
) -> Vec<Vec<VertexId>> {
    let mut partition = vec![Vec::new(); nb_buckets];
    for v in 0..g.nb_vertices() {
        let mut forbidden = BitSet::new();
        for u in g.neighbors(v) {
            forbidden.insert(colors[*u]);
        }
        // unprocessed neighbors sit above every candidate, so a free color
        // always exists in [0, deg(v)]
        let new_color = (0..=g.degree(v))
            .find(|c| !forbidden.contains(*c))
            .unwrap();
        colors[v] = new_color;
        partition[new_color].push(v);
    }
    partition
}

/** Partitioned parallel coloring. A serial first pass buckets the vertices
by color; afterwards each iteration walks the buckets in parallel. A bucket
is a color class of the previous assignment, hence an independent set:
vertices inside it never race with each other, only with other buckets. Each
vertex is re-appended to the bucket of its (possibly unchanged) color so a
later reactivation can always find it. */
pub fn color_partition_recursive<G: Graph>(g: &G, verbose: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let max_degree = g.max_degree();
    let nb_buckets = max_degree + 2;
    let mut initial = vec![max_degree + 1; n];

    let mut log = IterationLog::new(verbose);
    let mut iter = 1;
    log.begin(iter);
    let mut current = make_color_partition(g, &mut initial, nb_buckets);
    log.end(n, 2 * g.nb_edges(), n);

    let colors = AtomicColors::new(initial);
    let mut schedule = BitsetScheduler::new(n);
    schedule.schedule_all();

    while schedule.any_scheduled() {
        iter += 1;
        schedule.begin_iteration();
        log.begin(iter);
        let active_vertices = schedule.nb_scheduled();
        let active_edges = AtomicUsize::new(0);
        let changed_vertices = AtomicUsize::new(0);
        let sched = &schedule;
        let cells = &colors;
        let next: Vec<Mutex<Vec<VertexId>>> =
            (0..nb_buckets).map(|_| Mutex::new(Vec::new())).collect();
        let next_ref = &next;

        current.par_iter().for_each(|bucket| {
            for bucket_vertex in bucket {
                let v = *bucket_vertex;
                if !sched.is_scheduled(v) {
                    // keep the vertex bucketed under its current color
                    let c = cells.read(v);
                    next_ref[c].lock().unwrap().push(v);
                    continue;
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
                next_ref[new_color].lock().unwrap().push(v);
            }
        });
        current = next
            .into_iter()
            .map(|bucket| bucket.into_inner().unwrap())
            .collect();
        log.end(
            active_vertices,
            active_edges.into_inner(),
            changed_vertices.into_inner(),
        );
    }
    log.finish();
    colors.into_colors()
}
