//! # HierLib
//!
//! Hierlib simulates memory-access latency through a two-level cache
//! hierarchy: split first-level instruction and data caches backed by a
//! unified second level, backed by main memory at a fixed latency.
//!
//! For each access it reports the cycle cost of the hits and misses along the
//! way, honouring set-associative geometry, LRU replacement, and an optional
//! inclusion policy in which a unified-level eviction invalidates the block
//! from the first-level caches as well.
//!
//! The hierarchy itself is pure in-memory bookkeeping; trace input, JSON
//! configuration, and report output live in the simulator/io/config modules
//! around it.

/// Contains the address bit-field decomposition shared by all levels
pub mod decode;

/// Contains the recency-ordered residency list backing each cache set
pub mod set;

/// Contains a single cache level: sets, geometry, and the hit/miss protocol
pub mod cache;

/// Contains the three-level hierarchy and its access/invalidation protocol
pub mod hierarchy;

/// Contains the per-level statistics counters
pub mod stats;

/// Contains definitions for the JSON configuration format and its validation
pub mod config;

/// Contains the simulator used to replay a memory-access trace against a
/// configured hierarchy
pub mod simulator;

/// Contains the trace file reader
pub mod io;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
