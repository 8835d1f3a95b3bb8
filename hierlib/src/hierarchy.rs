use log::debug;

use crate::cache::CacheLevel;
use crate::config::{ConfigError, HierarchyConfig, LevelConfig};
use crate::stats::{HierarchyStats, LevelStats};

/// Which first-level cache an access goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstLevel {
    Instruction,
    Data,
}

/// The full two-level hierarchy: split instruction and data caches backed by
/// a unified second level, backed by main memory at a fixed latency.
///
/// Each access runs to completion synchronously, including the unified-level
/// fallback and any inclusion-driven invalidations, before the next one
/// begins; there is no pending state between accesses. Statistics and cache
/// content always reflect exactly the prefix of accesses processed so far.
///
/// Configuration is validated once at construction and immutable afterwards.
/// A level configured with zero sets is never built at all: accesses bypass
/// it with no latency and no statistics.
pub struct CacheHierarchy {
    instruction: Option<CacheLevel>,
    data: Option<CacheLevel>,
    unified: Option<CacheLevel>,
    memory_latency: u32,
    inclusive: bool,
    stats: HierarchyStats,
}

impl CacheHierarchy {
    /// Builds a hierarchy from a configuration, validating the geometry of
    /// every enabled level.
    ///
    /// # Arguments
    ///
    /// * `config`: level geometries, block size, memory latency, inclusion
    ///   flag, usually resulting from parsing JSON
    ///
    /// returns: Result<CacheHierarchy, ConfigError>
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let level = |cfg: &LevelConfig, name| {
            cfg.enabled()
                .then(|| CacheLevel::new(cfg, config.block_size, name))
        };
        Ok(Self {
            instruction: level(&config.instruction, "icache"),
            data: level(&config.data, "dcache"),
            unified: level(&config.unified, "l2cache"),
            memory_latency: config.memory_latency,
            inclusive: config.inclusive,
            stats: HierarchyStats::default(),
        })
    }

    /// Performs an instruction fetch at `address`, returning the total access
    /// time in cycles.
    pub fn instruction_access(&mut self, address: u32) -> u32 {
        self.first_level_access(FirstLevel::Instruction, address)
    }

    /// Performs a data access at `address`, returning the total access time
    /// in cycles.
    pub fn data_access(&mut self, address: u32) -> u32 {
        self.first_level_access(FirstLevel::Data, address)
    }

    /// Read-only snapshot of the per-level counters
    pub fn statistics(&self) -> &HierarchyStats {
        &self.stats
    }

    fn first_level_access(&mut self, which: FirstLevel, address: u32) -> u32 {
        let level = match which {
            FirstLevel::Instruction => self.instruction.as_mut(),
            FirstLevel::Data => self.data.as_mut(),
        };
        // A disabled first level is bypassed: straight to the unified level,
        // contributing no latency and no statistics
        let Some(level) = level else {
            return self.unified_access(address);
        };
        let hit_time = level.hit_time();
        let outcome = level.access(address);
        // A first-level eviction needs no upward invalidation; there is no
        // level above to keep consistent
        let stats = self.first_level_stats(which);
        stats.references += 1;
        if outcome.hit {
            return hit_time;
        }
        stats.misses += 1;
        let penalty = self.unified_access(address);
        self.first_level_stats(which).penalty_cycles += u64::from(penalty);
        hit_time + penalty
    }

    /// The unified level is the last cache: a miss here is always resolved by
    /// main memory at the fixed latency, never by further recursion.
    fn unified_access(&mut self, address: u32) -> u32 {
        let Some(unified) = self.unified.as_mut() else {
            return self.memory_latency;
        };
        let hit_time = unified.hit_time();
        let outcome = unified.access(address);
        let victim = outcome
            .evicted
            .map(|eviction| unified.victim_address(eviction, address));
        self.stats.unified.references += 1;
        if outcome.hit {
            return hit_time;
        }
        self.stats.unified.misses += 1;
        self.stats.unified.penalty_cycles += u64::from(self.memory_latency);
        if self.inclusive {
            if let Some(victim) = victim {
                self.back_invalidate(victim);
            }
        }
        hit_time + self.memory_latency
    }

    /// Maintains the inclusion invariant: a block the unified level evicted
    /// may not stay resident above it. Removal is best-effort on both first
    /// levels; absence is not an error.
    fn back_invalidate(&mut self, victim: u32) {
        debug!("back-invalidating {victim:#010x} after unified eviction");
        if let Some(instruction) = self.instruction.as_mut() {
            instruction.invalidate(victim);
        }
        if let Some(data) = self.data.as_mut() {
            data.invalidate(victim);
        }
    }

    fn first_level_stats(&mut self, which: FirstLevel) -> &mut LevelStats {
        match which {
            FirstLevel::Instruction => &mut self.stats.instruction,
            FirstLevel::Data => &mut self.stats.data,
        }
    }

    pub(crate) fn instruction_level(&self) -> Option<&CacheLevel> {
        self.instruction.as_ref()
    }

    pub(crate) fn data_level(&self) -> Option<&CacheLevel> {
        self.data.as_ref()
    }

    pub(crate) fn unified_level(&self) -> Option<&CacheLevel> {
        self.unified.as_ref()
    }
}
