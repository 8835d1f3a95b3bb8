/// One cache set: the resident block tags, ordered strictly by recency with
/// the most recently used first.
///
/// The original structure for this is a doubly linked list with
/// remove-from-middle, push-front and pop-back. Associativities are small, so
/// an array-backed ordered list gives the same contract without pointer
/// chasing: every operation is a short scan over at most `associativity`
/// entries.
///
/// Invariants: at most `associativity` resident tags, and at most one
/// occurrence of any tag value.
#[derive(Debug)]
pub struct LruSet {
    associativity: usize,
    // Most recently used at the front, eviction candidate at the back
    blocks: Vec<u32>,
}

impl LruSet {
    pub fn new(associativity: usize) -> Self {
        Self {
            associativity,
            blocks: Vec::with_capacity(associativity),
        }
    }

    /// Searches for a resident block. On a hit the block is promoted to the
    /// most-recently-used position; a miss changes nothing.
    pub fn lookup(&mut self, tag: u32) -> bool {
        match self.blocks.iter().position(|&resident| resident == tag) {
            Some(at) => {
                let block = self.blocks.remove(at);
                self.blocks.insert(0, block);
                true
            }
            None => false,
        }
    }

    /// Inserts a block at the most-recently-used position, evicting the
    /// least recently used block first if the set is at capacity. Returns the
    /// evicted tag, if any.
    ///
    /// Only valid after a confirmed miss; inserting a tag that is already
    /// resident is a caller-protocol violation and fails loudly rather than
    /// corrupting the recency order.
    pub fn insert(&mut self, tag: u32) -> Option<u32> {
        assert!(
            !self.blocks.contains(&tag),
            "insert of already-resident tag {tag:#x}"
        );
        debug_assert!(self.associativity > 0);
        let evicted = if self.blocks.len() == self.associativity {
            self.blocks.pop()
        } else {
            None
        };
        self.blocks.insert(0, tag);
        evicted
    }

    /// Removes a block by tag from any recency position, preserving the
    /// relative order of the rest. Reports whether the tag was resident.
    /// Used only for invalidation, never for normal replacement.
    pub fn remove(&mut self, tag: u32) -> bool {
        match self.blocks.iter().position(|&resident| resident == tag) {
            Some(at) => {
                self.blocks.remove(at);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Resident tags in recency order, most recently used first
    pub fn tags(&self) -> &[u32] {
        &self.blocks
    }
}
