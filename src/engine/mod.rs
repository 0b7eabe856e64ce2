//! Coloring engines. All variants share the same skeleton: schedule every
//! vertex, then iterate until no vertex is scheduled, recoloring each
//! scheduled vertex to the smallest color absent from its neighborhood. They
//! differ in how neighbor reads are made consistent and how a new color is
//! published.

use std::time::Instant;

/// sequential skeleton, vertex order 0..n
pub mod serial_naive;

/// parallel skeleton with unsynchronized (relaxed atomic) color cells
pub mod asynch_naive;

/// optimistic concurrency: candidate colors validated with compare-and-set
pub mod asynch_occ;

/// fine-grained reader/writer locking with wound-wait deadlock avoidance
pub mod asynch_locks;

/// passive push: per-vertex neighbor-color counters maintained by the writers
pub mod push_passive;

/// sequential push with neighbor-list pruning and monotone lower bounds
pub mod serial_prune;

/// color classes processed as parallel buckets
pub mod partition_recursive;


/** Per-iteration diagnostic printer shared by the engines: iteration index,
active vertex/edge counts, modified vertex count and wall time. */
#[derive(Debug)]
pub struct IterationLog {
    verbose: bool,
    start: Instant,
    last_stop: Instant,
}

impl IterationLog {
    /// creates the log; nothing is printed when `verbose` is false
    pub fn new(verbose: bool) -> Self {
        let now = Instant::now();
        Self { verbose, start: now, last_stop: now }
    }

    /// prints the iteration header
    pub fn begin(&self, iter: u64) {
        if self.verbose {
            println!();
            println!("Iteration: {}", iter);
        }
    }

    /// prints the iteration counters and the time since the previous stop
    pub fn end(&mut self, active_vertices: usize, active_edges: usize, changed_vertices: usize) {
        if self.verbose {
            println!("\tActive Vs: {}", active_vertices);
            println!("\tActive Es: {}", active_edges);
            println!("\tModified Vs: {}", changed_vertices);
            println!("\tTime: {:.3}", self.last_stop.elapsed().as_secs_f64());
            self.last_stop = Instant::now();
        }
    }

    /// prints the total run time
    pub fn finish(self) {
        if self.verbose {
            println!("\nTotal Time : {:.3}", self.start.elapsed().as_secs_f64());
        }
    }
}
