//! Contains utilities for running tests and benchmarks.

use crate::config::{HierarchyConfig, LevelConfig};

/// A small hierarchy with distinctive hit times, handy for latency
/// composition checks: instruction/data hits cost 1/2 cycles, unified hits
/// 10, memory 100.
pub fn small_config() -> HierarchyConfig {
    HierarchyConfig {
        instruction: LevelConfig {
            sets: 4,
            associativity: 2,
            hit_time: 1,
        },
        data: LevelConfig {
            sets: 4,
            associativity: 2,
            hit_time: 2,
        },
        unified: LevelConfig {
            sets: 16,
            associativity: 4,
            hit_time: 10,
        },
        block_size: 4,
        memory_latency: 100,
        inclusive: false,
    }
}

/// A deterministic pseudo-random address stream for benchmarks. Plain LCG;
/// quality doesn't matter, repeatability does.
pub struct AddressStream {
    state: u64,
}

impl AddressStream {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Iterator for AddressStream {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        Some((self.state >> 24) as u32)
    }
}
