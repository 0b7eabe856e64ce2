use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::graph::VertexId;

const WORD_BITS: usize = 64;

/// fixed-size bitset whose bits can be set concurrently
#[derive(Debug)]
struct AtomicBitset {
    len: usize,
    words: Vec<AtomicU64>,
}

impl AtomicBitset {
    fn new(len: usize) -> Self {
        let nb_words = (len + WORD_BITS - 1) / WORD_BITS;
        Self { len, words: (0..nb_words).map(|_| AtomicU64::new(0)).collect() }
    }

    fn set(&self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / WORD_BITS].fetch_or(1 << (i % WORD_BITS), Ordering::Release);
    }

    fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        self.words[i / WORD_BITS].load(Ordering::Acquire) & (1 << (i % WORD_BITS)) != 0
    }

    fn set_all(&self) {
        let mut remaining = self.len;
        for w in &self.words {
            let bits = remaining.min(WORD_BITS);
            w.store(u64::MAX >> (WORD_BITS - bits), Ordering::Release);
            remaining -= bits;
        }
    }

    fn clear_all(&self) {
        for w in &self.words {
            w.store(0, Ordering::Release);
        }
    }

    fn any(&self) -> bool {
        self.words.iter().any(|w| w.load(Ordering::Acquire) != 0)
    }

    fn count(&self) -> usize {
        self.words.iter().map(|w| w.load(Ordering::Acquire).count_ones() as usize).sum()
    }
}


/** Double-buffered set of scheduled vertices.

Marks land in the *next* generation; [`BitsetScheduler::begin_iteration`]
swaps generations and clears the new next, so an iteration only ever sees the
marks produced before the swap. `schedule` is safe to call concurrently from
the parallel loop; the swap itself requires exclusive access, which the engine
loop has between two parallel phases. */
#[derive(Debug)]
pub struct BitsetScheduler {
    /// generation iterated by the current phase
    current: AtomicBitset,
    /// generation accumulating marks for the following phase
    next: AtomicBitset,
}

impl BitsetScheduler {
    /// creates a scheduler for n vertices with both generations empty
    pub fn new(n: usize) -> Self {
        Self { current: AtomicBitset::new(n), next: AtomicBitset::new(n) }
    }

    /// marks every vertex in the next generation
    pub fn schedule_all(&self) {
        self.next.set_all();
    }

    /// marks v in the next generation
    pub fn schedule(&self, v: VertexId) {
        self.next.set(v);
    }

    /// true iff the next generation holds at least one vertex (termination gate)
    pub fn any_scheduled(&self) -> bool {
        self.next.any()
    }

    /// swaps generations; the accumulated marks become the iterated set
    pub fn begin_iteration(&mut self) {
        mem::swap(&mut self.current, &mut self.next);
        self.next.clear_all();
    }

    /// tests v in the current generation
    pub fn is_scheduled(&self, v: VertexId) -> bool {
        self.current.get(v)
    }

    /// number of vertices in the current generation (diagnostic)
    pub fn nb_scheduled(&self) -> usize {
        self.current.count()
    }
}
