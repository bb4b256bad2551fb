use std::collections::HashMap;
use std::sync::atomic::Ordering;

use crossbeam_epoch::{self as epoch, Atomic, Owned};

use crate::ownership::{SetId, UnitId};

/// Dense-slot sentinel for facts with no recorded owner.
pub const NO_OWNER: SetId = SetId::MAX;

/// A pointer-free projection of the ownership trie: per-fact set ids in a
/// dense region plus a sparse map below it, alongside the interned unit
/// lists. Safe to hand to concurrent readers as-is.
pub struct OwnershipSnapshot {
    dense_start: u64,
    dense: Vec<SetId>,
    sparse: HashMap<u64, SetId>,
    sets: Vec<Vec<UnitId>>,
}

impl OwnershipSnapshot {
    pub(crate) fn new(
        dense_start: u64,
        dense: Vec<SetId>,
        sparse: HashMap<u64, SetId>,
        sets: Vec<Vec<UnitId>>,
    ) -> Self {
        OwnershipSnapshot {
            dense_start,
            dense,
            sparse,
            sets,
        }
    }

    /// The set owning `fact`, if any.
    pub fn owner_of(&self, fact: u64) -> Option<SetId> {
        if fact >= self.dense_start {
            match self.dense.get((fact - self.dense_start) as usize) {
                Some(&id) if id != NO_OWNER => Some(id),
                _ => None,
            }
        } else {
            self.sparse.get(&fact).copied()
        }
    }

    /// Unit list of an interned set.
    pub fn units_of(&self, set: SetId) -> Option<&[UnitId]> {
        self.sets.get(set as usize).map(Vec::as_slice)
    }

    pub fn dense_len(&self) -> usize {
        self.dense.len()
    }

    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }
}

/// Publish/read cell for the active ownership snapshot.
///
/// Writers swap in a rebuilt snapshot without blocking readers; readers pin
/// an epoch guard, so a snapshot they are still looking at is reclaimed
/// only after their guard drops.
pub struct SnapshotCell {
    current: Atomic<OwnershipSnapshot>,
}

impl SnapshotCell {
    pub fn empty() -> Self {
        SnapshotCell {
            current: Atomic::null(),
        }
    }

    /// Swap in `snapshot` and defer destruction of the one it replaces.
    pub fn publish(&self, snapshot: OwnershipSnapshot) {
        let guard = epoch::pin();
        let old = self.current.swap(Owned::new(snapshot), Ordering::AcqRel, &guard);
        // # Safety: every reader holds an epoch guard across its load and
        // read, so the displaced snapshot is destroyed only after all such
        // guards retire.
        unsafe {
            if !old.is_null() {
                guard.defer_destroy(old);
            }
        }
    }

    /// Owner lookup against the currently published snapshot.
    pub fn owner_of(&self, fact: u64) -> Option<SetId> {
        let guard = epoch::pin();
        let shared = self.current.load(Ordering::Acquire, &guard);
        // # Safety: Acquire pairs with the publishing swap; the guard keeps
        // the snapshot alive for the duration of the read.
        let snapshot = unsafe { shared.as_ref() }?;
        snapshot.owner_of(fact)
    }
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for SnapshotCell {
    fn drop(&mut self) {
        let guard = epoch::pin();
        let old = self
            .current
            .swap(epoch::Shared::null(), Ordering::AcqRel, &guard);
        // # Safety: same reclamation protocol as `publish`; late readers
        // see the null cell.
        unsafe {
            if !old.is_null() {
                guard.defer_destroy(old);
            }
        }
    }
}
