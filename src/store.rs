use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

use rand::prelude::*;

use crate::graph::{ColorId, Graph};

/** Initial color assignment strategy.
All seeds are correct; they differ only in convergence speed. */
#[derive(Debug, Clone, Copy)]
pub enum ColorSeed {
    /// every vertex starts at color 0
    Zero,
    /// every vertex starts at Δ
    MaxDegree,
    /// every vertex starts at a uniform value in [0, deg(v)]
    Random,
}

impl ColorSeed {
    /// materializes the initial color vector for a graph
    pub fn initial<G: Graph>(self, g: &G) -> Vec<ColorId> {
        let n = g.nb_vertices();
        match self {
            ColorSeed::Zero => vec![0; n],
            ColorSeed::MaxDegree => vec![g.max_degree(); n],
            ColorSeed::Random => {
                let mut rng = rand::thread_rng();
                (0..n).map(|v| rng.gen_range(0..=g.degree(v))).collect()
            }
        }
    }
}


/** Array of per-vertex color cells with atomic access.
Each color fits in a machine word, so loads never tear; publication happens
through the release store or the CAS. */
#[derive(Debug)]
pub struct AtomicColors {
    /// cells[v]: color of vertex v
    cells: Vec<AtomicUsize>,
}

impl AtomicColors {
    /// builds the store from an initial color vector
    pub fn new(initial: Vec<ColorId>) -> Self {
        Self { cells: initial.into_iter().map(AtomicUsize::new).collect() }
    }

    /// number of cells
    pub fn len(&self) -> usize { self.cells.len() }

    /// true iff the store is empty
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    /// atomic load of v's color
    pub fn read(&self, v: usize) -> ColorId {
        self.cells[v].load(Ordering::Acquire)
    }

    /// atomic store of v's color
    pub fn write(&self, v: usize, c: ColorId) {
        self.cells[v].store(c, Ordering::Release);
    }

    /// compare-and-set on v's cell; succeeds only if the current color equals `expected`
    pub fn cas(&self, v: usize, expected: ColorId, new: ColorId) -> bool {
        self.cells[v]
            .compare_exchange(expected, new, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// consumes the store, returns the plain color vector
    pub fn into_colors(self) -> Vec<ColorId> {
        self.cells.into_iter().map(AtomicUsize::into_inner).collect()
    }
}


/// fatal exit on an unexpected lock failure (anything but busy)
fn fatal_lock_error() -> ! {
    eprintln!("Locking Error: poisoned vertex lock");
    process::exit(1);
}

/** A color cell carrying its own reader/writer lock and tie-break fields.
The cell owns its lock handle and never moves while the engine runs: cells
live inside [`LockedColors`] for the whole coloring. */
#[derive(Debug)]
struct ColorCell {
    /// current color, guarded by the embedded lock
    color: RwLock<ColorId>,
    /// unique tie-break rank
    priority: usize,
    /// cached out-degree
    degree: usize,
}

/** Color store for the locking engines: one reader/writer lock per vertex,
plus the static (degree, priority) pair used by the wound-wait tie-break. */
#[derive(Debug)]
pub struct LockedColors {
    cells: Vec<ColorCell>,
}

impl LockedColors {
    /// builds the store; `priorities` must be a permutation of [0,n)
    pub fn new<G: Graph>(g: &G, initial: Vec<ColorId>, priorities: Vec<usize>) -> Self {
        let cells = initial
            .into_iter()
            .zip(priorities)
            .enumerate()
            .map(|(v, (c, priority))| ColorCell {
                color: RwLock::new(c),
                priority,
                degree: g.degree(v),
            })
            .collect();
        Self { cells }
    }

    /// number of cells
    pub fn len(&self) -> usize { self.cells.len() }

    /// true iff the store is empty
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    /// cached out-degree of v
    pub fn degree(&self, v: usize) -> usize { self.cells[v].degree }

    /// unique tie-break rank of v
    pub fn priority(&self, v: usize) -> usize { self.cells[v].priority }

    /// true when u wins the lexicographic (degree, priority) tie-break against v
    pub fn outranks(&self, u: usize, v: usize) -> bool {
        (self.cells[u].degree, self.cells[u].priority)
            > (self.cells[v].degree, self.cells[v].priority)
    }

    /// blocking write lock on v's cell
    pub fn lock_w(&self, v: usize) -> RwLockWriteGuard<'_, ColorId> {
        match self.cells[v].color.write() {
            Ok(guard) => guard,
            Err(_) => fatal_lock_error(),
        }
    }

    /// non-blocking read lock on v's cell; `None` when the cell is busy
    pub fn try_lock_r(&self, v: usize) -> Option<RwLockReadGuard<'_, ColorId>> {
        match self.cells[v].color.try_read() {
            Ok(guard) => Some(guard),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(_)) => fatal_lock_error(),
        }
    }

    /// reads v's color through a blocking read lock
    pub fn read(&self, v: usize) -> ColorId {
        match self.cells[v].color.read() {
            Ok(guard) => *guard,
            Err(_) => fatal_lock_error(),
        }
    }

    /// consumes the store, returns the plain color vector
    pub fn into_colors(self) -> Vec<ColorId> {
        self.cells
            .into_iter()
            .map(|cell| cell.color.into_inner().unwrap_or_else(|p| p.into_inner()))
            .collect()
    }
}


/// builds a unique per-vertex priority assignment: a shuffled permutation of [0,n)
pub fn priority_permutation<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(rng);
    permutation
}


#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;

    use crate::csr::CsrGraph;

    #[test]
    fn test_cas_success_and_failure() {
        let store = AtomicColors::new(vec![3, 5]);
        assert!(store.cas(0, 3, 7));
        assert_eq!(store.read(0), 7);
        assert!(!store.cas(0, 3, 9));
        assert_eq!(store.read(0), 7);
        assert_eq!(store.into_colors(), vec![7, 5]);
    }

    #[test]
    fn test_seed_ranges() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(ColorSeed::Zero.initial(&g), vec![0; 4]);
        assert_eq!(ColorSeed::MaxDegree.initial(&g), vec![2; 4]);
        let random = ColorSeed::Random.initial(&g);
        for (v, c) in random.iter().enumerate() {
            assert!(*c <= g.degree(v));
        }
    }

    #[test]
    fn test_priority_permutation() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = priority_permutation(100, &mut rng);
        let mut sorted = p.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<usize>>());
    }

    #[test]
    fn test_outranks_is_lexicographic() {
        let g = CsrGraph::from_edges(3, &[(0, 1), (0, 2)]);
        // degrees: v0 = 2, v1 = v2 = 1; priorities break the v1/v2 tie
        let store = LockedColors::new(&g, vec![0; 3], vec![1, 0, 2]);
        assert!(store.outranks(0, 1));
        assert!(store.outranks(0, 2));
        assert!(store.outranks(2, 1));
        assert!(!store.outranks(1, 2));
    }

    #[test]
    fn test_locked_read_write() {
        let g = CsrGraph::from_edges(2, &[(0, 1)]);
        let store = LockedColors::new(&g, vec![4, 4], vec![0, 1]);
        {
            let mut guard = store.lock_w(0);
            *guard = 1;
        }
        assert_eq!(store.read(0), 1);
        assert!(store.try_lock_r(1).is_some());
        assert_eq!(store.into_colors(), vec![1, 4]);
    }
}
