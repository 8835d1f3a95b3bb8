/// Splits addresses into the (offset, index, tag) bit-fields for one level's
/// geometry, and reconstructs addresses for invalidation.
///
/// The three fields partition the address with no overlap and no gaps, so the
/// reconstruction in [`AddressDecoder::address`] is exact. Both `block_size`
/// and `num_sets` must be powers of two; the configuration layer rejects
/// anything else before a decoder is ever built.
///
/// A decoder is only constructed for an enabled level (`num_sets > 0`);
/// disabled levels are bypassed without decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    offset_mask: u32,
    index_bits: u32,
    index_mask: u32,
}

impl AddressDecoder {
    /// Derives the field widths and masks once, at level construction.
    ///
    /// # Arguments
    ///
    /// * `block_size`: bytes per block, a power of two
    /// * `num_sets`: sets in this level, a power of two, at least 1
    ///
    /// returns: AddressDecoder
    pub fn new(block_size: u32, num_sets: u32) -> Self {
        debug_assert!(block_size.is_power_of_two());
        debug_assert!(num_sets.is_power_of_two());
        let offset_bits = block_size.trailing_zeros();
        // A single set needs no index bits
        let index_bits = num_sets.trailing_zeros();
        Self {
            offset_bits,
            offset_mask: block_size - 1,
            index_bits,
            index_mask: (num_sets - 1) << offset_bits,
        }
    }

    /// The high-order bits identifying a block uniquely within its set
    pub fn tag(&self, address: u32) -> u32 {
        (u64::from(address) >> (self.index_bits + self.offset_bits)) as u32
    }

    /// The set selected by this address, usable directly as an array index
    pub fn index(&self, address: u32) -> usize {
        ((address & self.index_mask) >> self.offset_bits) as usize
    }

    /// The byte offset within the block
    pub fn offset(&self, address: u32) -> u32 {
        address & self.offset_mask
    }

    /// Rebuilds the full address of a block from its tag, its set index, and
    /// an offset. Used only when a unified-level eviction has to be turned
    /// back into an address for first-level invalidation.
    pub fn address(&self, tag: u32, index: usize, offset: u32) -> u32 {
        ((u64::from(tag) << (self.index_bits + self.offset_bits)) as u32)
            | ((index as u32) << self.offset_bits)
            | offset
    }
}
