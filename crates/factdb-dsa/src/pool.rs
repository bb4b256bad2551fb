use alloc::vec::Vec;

/// Slots allocated per slab. 256 inner forests is 32KiB of nodes, so slab
/// bookkeeping stays invisible next to the splits that trigger it.
const SLAB_SLOTS: usize = 256;

/// A slab arena with stable addresses and no per-slot free.
///
/// Each slab is a fixed-capacity `Vec` that is never pushed past its
/// capacity, so a slot address never moves once handed out. The trie only
/// ever grows (splits allocate, nothing deallocates), which is what makes
/// wholesale release on drop sufficient.
pub struct Pool<T> {
    slabs: Vec<Vec<T>>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Pool { slabs: Vec::new() }
    }

    /// Place `item` in the arena and return its address.
    ///
    /// The pointer stays valid, and uniquely reachable through it, until the
    /// pool is dropped.
    pub fn alloc(&mut self, item: T) -> *mut T {
        if self.slabs.last().map_or(true, |s| s.len() == s.capacity()) {
            self.slabs.push(Vec::with_capacity(SLAB_SLOTS));
        }
        let slab = self.slabs.last_mut().unwrap();
        slab.push(item);
        let slot = slab.len() - 1;
        &mut slab[slot] as *mut T
    }

    /// Number of slots handed out over the pool's lifetime.
    pub fn allocated(&self) -> usize {
        self.slabs.iter().map(Vec::len).sum()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
