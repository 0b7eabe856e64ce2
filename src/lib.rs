//! Parallel greedy vertex coloring on shared-memory multiprocessors

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// graph view base trait and vertex/color identifiers
pub mod graph;

/// compressed adjacency instance (use this for all inputs)
pub mod csr;

/// read DIMACS text format
pub mod dimacs;

/// read/write the compact binary adjacency format
pub mod binary;

/// per-vertex color stores (atomic cells, lock cells, seeds)
pub mod store;

/// double-buffered bitset work scheduler
pub mod scheduler;

/// coloring engines (one module per concurrency discipline)
pub mod engine;

/// post-run assessment: conflicts, minimality, graph sanity checks
pub mod assess;

/// helper and utility methods for executables
pub mod util;
