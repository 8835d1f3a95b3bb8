use log::trace;

use crate::config::LevelConfig;
use crate::decode::AddressDecoder;
use crate::set::LruSet;

/// A block evicted by a miss-driven insertion, identified by its tag and the
/// set it left. Eviction only ever happens within the set the new block was
/// inserted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub tag: u32,
    pub index: usize,
}

/// The outcome of a single-level access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    pub hit: bool,
    pub evicted: Option<Eviction>,
}

/// One enabled cache level: an array of LRU sets plus its immutable geometry
/// and hit time.
///
/// A disabled level (`sets == 0` in the configuration) is never constructed;
/// the hierarchy represents it as `None` and bypasses it entirely, so this
/// type never has to reason about zero-set geometry.
pub struct CacheLevel {
    decoder: AddressDecoder,
    sets: Vec<LruSet>,
    hit_time: u32,
    name: &'static str,
}

impl CacheLevel {
    /// Creates a level from an already-validated configuration.
    ///
    /// # Arguments
    ///
    /// * `config`: per-level geometry and hit time, validated by the caller
    /// * `block_size`: bytes per block, shared by the whole hierarchy
    /// * `name`: level name used in log output
    ///
    /// returns: CacheLevel
    pub fn new(config: &LevelConfig, block_size: u32, name: &'static str) -> Self {
        debug_assert!(config.sets > 0);
        Self {
            decoder: AddressDecoder::new(block_size, config.sets),
            sets: (0..config.sets)
                .map(|_| LruSet::new(config.associativity as usize))
                .collect(),
            hit_time: config.hit_time,
            name,
        }
    }

    /// Performs the single-level hit/miss protocol for an address.
    ///
    /// A hit promotes the block and evicts nothing. A miss inserts the block,
    /// evicting the least recently used resident of its set if the set is at
    /// capacity; the evicted tag/index pair is reported to the caller so the
    /// hierarchy can apply inclusion rules.
    pub fn access(&mut self, address: u32) -> AccessOutcome {
        let index = self.decoder.index(address);
        let tag = self.decoder.tag(address);
        if self.sets[index].lookup(tag) {
            return AccessOutcome {
                hit: true,
                evicted: None,
            };
        }
        let evicted = self.sets[index].insert(tag).map(|tag| {
            trace!("{}: set {index} evicts tag {tag:#x}", self.name);
            Eviction { tag, index }
        });
        AccessOutcome {
            hit: false,
            evicted,
        }
    }

    /// Removes the block holding `address` if it is resident. Absence is not
    /// an error; invalidation is best-effort by contract.
    pub fn invalidate(&mut self, address: u32) -> bool {
        let index = self.decoder.index(address);
        let tag = self.decoder.tag(address);
        let removed = self.sets[index].remove(tag);
        if removed {
            trace!("{}: set {index} invalidates tag {tag:#x}", self.name);
        }
        removed
    }

    pub fn hit_time(&self) -> u32 {
        self.hit_time
    }

    /// Rebuilds the address a level-local eviction refers to, borrowing the
    /// offset bits of the access that caused it. The offset bits never
    /// influence which block an invalidation matches, so any offset from the
    /// same block size is equivalent.
    pub fn victim_address(&self, eviction: Eviction, access_address: u32) -> u32 {
        self.decoder
            .address(eviction.tag, eviction.index, self.decoder.offset(access_address))
    }

    /// True if `address` currently decodes to a resident block. Used by tests
    /// to check the inclusion invariant without disturbing recency.
    pub fn contains(&self, address: u32) -> bool {
        let index = self.decoder.index(address);
        let tag = self.decoder.tag(address);
        self.sets[index].tags().contains(&tag)
    }

    /// The number of blocks currently resident across all sets
    pub fn resident_blocks(&self) -> usize {
        self.sets.iter().map(LruSet::len).sum()
    }

    pub(crate) fn sets(&self) -> &[LruSet] {
        &self.sets
    }
}
