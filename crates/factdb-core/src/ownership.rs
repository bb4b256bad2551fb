use std::cell::Cell;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};

use factdb_dsa::RefCounted;

/// An ownership unit: one claimant of facts, e.g. a compilation unit.
pub type UnitId = u32;

/// Identifier an [`OwnershipSet`] receives when it is interned.
pub type SetId = u32;

/// The set of units that claim some group of facts.
///
/// Sets are shared objects: the ownership trie holds one reference per
/// payload node, and published snapshots refer to them by id only. The
/// refcount word is atomic because external subsystems may observe it
/// concurrently; the unit list itself is immutable after interning.
pub struct OwnershipSet {
    id: SetId,
    units: Vec<UnitId>,
    refs: AtomicU32,
    link: Cell<*mut ()>,
}

impl OwnershipSet {
    /// `units` must be sorted and deduped; the interning store guarantees
    /// this.
    pub(crate) fn new(id: SetId, units: Vec<UnitId>) -> Self {
        OwnershipSet {
            id,
            units,
            refs: AtomicU32::new(0),
            link: Cell::new(ptr::null_mut()),
        }
    }

    pub fn id(&self) -> SetId {
        self.id
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn refs(&self) -> u32 {
        self.refs.load(Ordering::Acquire)
    }

    pub(crate) fn into_units(self) -> Vec<UnitId> {
        self.units
    }
}

impl RefCounted for OwnershipSet {
    fn use_refs(&self, delta: i32) {
        // Two's complement addition covers negative deltas on the unsigned
        // word.
        let prev = self.refs.fetch_add(delta as u32, Ordering::AcqRel);
        debug_assert!(
            prev as i64 + delta as i64 >= 0,
            "ownership set {} refcount underflow",
            self.id
        );
    }

    fn link(&self) -> *mut () {
        self.link.get()
    }

    fn set_link(&self, link: *mut ()) {
        self.link.set(link);
    }
}
