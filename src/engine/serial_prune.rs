use std::collections::HashMap;

use crate::engine::IterationLog;
use crate::graph::{ColorId, Graph, VertexId};
use crate::scheduler::BitsetScheduler;

/// node of a per-vertex doubly-linked neighbor list; `prev`/`next` index the
/// same arena, positions 0 and deg(v)+1 are the head/tail sentinels
#[derive(Debug, Clone, Copy)]
struct ListNode {
    vertex: VertexId,
    prev: usize,
    next: usize,
}

/// still-relevant neighbors of every vertex, with O(1) removal
#[derive(Debug)]
struct NeighborLists {
    nodes: Vec<Vec<ListNode>>,
    /// position[v]: neighbor vertex -> its node index in v's arena
    position: Vec<HashMap<VertexId, usize>>,
}

impl NeighborLists {
    fn new<G: Graph>(g: &G) -> Self {
        let n = g.nb_vertices();
        let mut nodes = Vec::with_capacity(n);
        let mut position = Vec::with_capacity(n);
        for v in 0..n {
            let v_degree = g.degree(v);
            let mut arena = Vec::with_capacity(v_degree + 2);
            arena.push(ListNode { vertex: VertexId::MAX, prev: 0, next: 1 });
            let mut pos = HashMap::with_capacity(v_degree);
            for (i, u) in g.neighbors(v).iter().enumerate() {
                arena.push(ListNode { vertex: *u, prev: i, next: i + 2 });
                pos.insert(*u, i + 1);
            }
            arena.push(ListNode { vertex: VertexId::MAX, prev: v_degree, next: v_degree + 1 });
            nodes.push(arena);
            position.push(pos);
        }
        Self { nodes, position }
    }

    /// live neighbors of v, in list order
    fn live(&self, v: VertexId) -> Vec<VertexId> {
        let arena = &self.nodes[v];
        let tail = arena.len() - 1;
        let mut live = Vec::new();
        let mut i = arena[0].next;
        while i != tail {
            live.push(arena[i].vertex);
            i = arena[i].next;
        }
        live
    }

    /// unlinks v from u's list
    fn remove(&mut self, u: VertexId, v: VertexId) {
        let i = self.position[u][&v];
        let (prev, next) = (self.nodes[u][i].prev, self.nodes[u][i].next);
        self.nodes[u][prev].next = next;
        self.nodes[u][next].prev = prev;
    }
}

/** Sequential push coloring with pruning. Every vertex starts at its own
degree and only ever decreases; `minimal_color[v]` is a monotone lower bound
on where v can still land. Once a vertex commits at its lower bound it is
final: it removes itself from every neighbor list, and neighbors whose bound
it occupied move their bound up. Counter updates are pushed along the pruned
lists only. */
pub fn color_serial_prune<G: Graph>(g: &G, verbose: bool) -> Vec<ColorId> {
    let n = g.nb_vertices();
    let mut colors: Vec<ColorId> = (0..n).map(|v| g.degree(v)).collect();
    let mut minimal_color = vec![0; n];
    let mut lists = NeighborLists::new(g);

    // possible[v][c]: number of neighbors of v at color c, for c <= deg(v)
    let mut possible: Vec<Vec<usize>> = (0..n)
        .map(|v| {
            let mut counts = vec![0; g.degree(v) + 1];
            for u in g.neighbors(v) {
                if g.degree(v) >= g.degree(*u) {
                    counts[g.degree(*u)] += 1;
                }
            }
            counts
        })
        .collect();

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
            active_edges += g.degree(v);

            let old_color = colors[v];
            let mut new_color = minimal_color[v];
            let mut committed = false;
            while new_color < old_color {
                if possible[v][new_color] == 0 {
                    committed = true;
                    break;
                }
                new_color += 1;
            }
            if !committed {
                continue;
            }
            colors[v] = new_color;
            changed_vertices += 1;
            // landing on the lower bound makes v final
            let final_commit = new_color == minimal_color[v];

            for u in lists.live(v) {
                if old_color < colors[u] {
                    schedule.schedule(u);
                }
                if final_commit {
                    lists.remove(u, v);
                    if minimal_color[u] == new_color {
                        minimal_color[u] = new_color + 1;
                    }
                }
                if g.degree(u) >= new_color {
                    possible[u][new_color] += 1;
                }
                if g.degree(u) >= old_color {
                    possible[u][old_color] -= 1;
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

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::assess::assess_coloring;
    use crate::csr::CsrGraph;

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
        let colors = color_serial_prune(&g, false);
        assert_eq!(colors, vec![0, 1, 2]);
    }

    #[test]
    fn test_path() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let colors = color_serial_prune(&g, false);
        assert_eq!(colors, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_cycle() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let colors = color_serial_prune(&g, false);
        assert!(assess_coloring(&g, &colors).is_success());
    }

    #[test]
    fn test_neighbor_list_removal() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2)]);
        let mut lists = NeighborLists::new(&g);
        assert_eq!(lists.live(0), vec![1, 2]);
        lists.remove(0, 1);
        assert_eq!(lists.live(0), vec![2]);
        lists.remove(0, 2);
        assert!(lists.live(0).is_empty());
    }

    #[test]
    fn test_random_graphs_reach_the_invariants() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..5 {
            let g = random_graph(150, 0.05, &mut rng);
            let colors = color_serial_prune(&g, false);
            assert!(assess_coloring(&g, &colors).is_success());
        }
    }
}
