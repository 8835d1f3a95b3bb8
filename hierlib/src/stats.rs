use serde::{Deserialize, Serialize};

/// Counters for one cache level. Zeroed at hierarchy construction and
/// monotonically incremented for its lifetime.
///
/// `penalty_cycles` accumulates the downstream cost of this level's misses:
/// for a first-level cache that is whatever the unified-level access cost,
/// for the unified level it is the fixed memory latency per miss.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub references: u64,
    pub misses: u64,
    pub penalty_cycles: u64,
}

impl LevelStats {
    pub fn hits(&self) -> u64 {
        self.references - self.misses
    }

    /// Miss rate over [0, 1]; zero when the level was never referenced
    pub fn miss_rate(&self) -> f64 {
        if self.references == 0 {
            0.0
        } else {
            self.misses as f64 / self.references as f64
        }
    }
}

/// Read-only snapshot of all per-level counters. Disabled levels stay
/// all-zero forever.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStats {
    pub instruction: LevelStats,
    pub data: LevelStats,
    pub unified: LevelStats,
}
