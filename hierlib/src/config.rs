use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geometry and hit time for one cache level
///
/// `sets == 0` disables the level: it holds no state, records no statistics,
/// and accesses pass straight through to the next level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelConfig {
    pub sets: u32,
    pub associativity: u32,
    pub hit_time: u32,
}

/// The full construction-time configuration of a hierarchy, usually resulting
/// from parsing JSON. Immutable for the hierarchy's lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub instruction: LevelConfig,
    pub data: LevelConfig,
    pub unified: LevelConfig,
    pub block_size: u32,
    pub memory_latency: u32,
    pub inclusive: bool,
}

/// A configuration the bit-field decomposition cannot support. Raised at
/// construction; accesses themselves never fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{level} sets ({value}) must be a power of two or zero")]
    SetsNotPowerOfTwo { level: &'static str, value: u32 },
    #[error("{level} associativity ({value}) must be a power of two")]
    AssociativityNotPowerOfTwo { level: &'static str, value: u32 },
    #[error("{level} associativity is zero but the level has {sets} sets")]
    ZeroAssociativity { level: &'static str, sets: u32 },
    #[error("block size ({0}) must be a non-zero power of two")]
    BadBlockSize(u32),
}

impl LevelConfig {
    pub fn enabled(&self) -> bool {
        self.sets > 0
    }

    fn validate(&self, level: &'static str) -> Result<(), ConfigError> {
        if !self.enabled() {
            // Disabled levels carry no geometry to validate
            return Ok(());
        }
        if !self.sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo {
                level,
                value: self.sets,
            });
        }
        if self.associativity == 0 {
            return Err(ConfigError::ZeroAssociativity {
                level,
                sets: self.sets,
            });
        }
        if !self.associativity.is_power_of_two() {
            return Err(ConfigError::AssociativityNotPowerOfTwo {
                level,
                value: self.associativity,
            });
        }
        Ok(())
    }
}

impl HierarchyConfig {
    /// Checks that every mask the decoders will build is unambiguous
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 || !self.block_size.is_power_of_two() {
            return Err(ConfigError::BadBlockSize(self.block_size));
        }
        self.instruction.validate("instruction")?;
        self.data.validate("data")?;
        self.unified.validate("unified")?;
        Ok(())
    }
}
