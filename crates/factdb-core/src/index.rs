use std::collections::HashMap;
use std::ptr::NonNull;

use factdb_dsa::{IdRange, RefCounted, TrieArray};

use crate::config::IndexConfig;
use crate::error::OwnershipError;
use crate::ownership::{OwnershipSet, SetId, UnitId};
use crate::snapshot::{OwnershipSnapshot, NO_OWNER};

/// Owns every ownership set the index ever interned.
///
/// Sets are boxed so their addresses survive growth of the surrounding
/// containers — the trie keeps raw pointers to them. Zero-ref sets are
/// retained until the store drops: the trie never frees payloads, and a set
/// that went unreferenced stays interned for cheap reuse.
struct SetStore {
    sets: Vec<Box<OwnershipSet>>,
    interned: HashMap<Vec<UnitId>, SetId>,
}

impl SetStore {
    fn with_capacity(expected: usize) -> Self {
        SetStore {
            sets: Vec::with_capacity(expected),
            interned: HashMap::with_capacity(expected),
        }
    }

    /// Same unit list, same set.
    fn intern(&mut self, units: Vec<UnitId>) -> NonNull<OwnershipSet> {
        if let Some(&id) = self.interned.get(&units) {
            return NonNull::from(self.sets[id as usize].as_ref());
        }
        let id = self.sets.len() as SetId;
        self.interned.insert(units.clone(), id);
        self.sets.push(Box::new(OwnershipSet::new(id, units)));
        NonNull::from(self.sets[id as usize].as_ref())
    }

    /// Merge combinator for one trie insert: `old ∪ {unit}`.
    ///
    /// `refs` node-refs move from `old` to the returned set, which comes
    /// back carrying one ref per the trie's insert contract.
    fn merge(
        &mut self,
        old: Option<NonNull<OwnershipSet>>,
        unit: UnitId,
        refs: u32,
    ) -> NonNull<OwnershipSet> {
        let units = match old {
            None => vec![unit],
            Some(old) => {
                // SAFETY: payload pointers handed back by the trie point at
                // boxed sets in `self.sets`, which only grows.
                let old = unsafe { old.as_ref() };
                let mut units = old.units().to_vec();
                if let Err(pos) = units.binary_search(&unit) {
                    units.insert(pos, unit);
                }
                units
            }
        };

        let set = self.intern(units);
        // SAFETY: `set` points into `self.sets`; `old` as above. When the
        // merge is a no-op (`unit` already present) both pointers are the
        // same set and the deltas net out against the trie's `refs - 1`.
        unsafe { set.as_ref() }.use_refs(1);
        if let Some(old) = old {
            unsafe { old.as_ref() }.use_refs(-(refs as i32));
        }
        set
    }

    fn into_unit_lists(self) -> Vec<Vec<UnitId>> {
        self.sets.into_iter().map(|set| set.into_units()).collect()
    }
}

/// Accumulates per-unit fact claims into the ownership trie and finalizes
/// them into a pointer-free snapshot.
pub struct OwnershipIndex {
    config: IndexConfig,
    trie: TrieArray<OwnershipSet>,
    store: SetStore,
}

impl OwnershipIndex {
    pub fn new(config: IndexConfig) -> Self {
        let store = SetStore::with_capacity(config.expected_sets);
        OwnershipIndex {
            config,
            trie: TrieArray::new(),
            store,
        }
    }

    /// Number of distinct ownership sets interned so far.
    pub fn set_count(&self) -> usize {
        self.store.sets.len()
    }

    /// Highest fact id claimed so far.
    pub fn max_id(&self) -> Option<u64> {
        self.trie.key_bounds().map(|(_, max)| max)
    }

    /// Record that `unit` owns the facts in `ranges` (sorted, disjoint,
    /// inclusive). Facts already claimed by other units end up owned by the
    /// union set.
    pub fn add_unit(&mut self, unit: UnitId, ranges: &[IdRange]) -> Result<(), OwnershipError> {
        if self.config.validate_ranges {
            validate(ranges)?;
        }
        tracing::trace!("add_unit: unit {} claims {} ranges", unit, ranges.len());

        let OwnershipIndex { trie, store, .. } = self;
        trie.insert(ranges, |old, refs| store.merge(old, unit, refs));
        Ok(())
    }

    /// Flatten the accumulated claims into a snapshot covering fact ids up
    /// to (exclusive) `end`, which must lie strictly above every claimed id
    /// and at or above the configured dense start.
    pub fn finalize(self, end: u64) -> Result<OwnershipSnapshot, OwnershipError> {
        let OwnershipIndex {
            config,
            trie,
            store,
        } = self;

        let Some((_, max)) = trie.key_bounds() else {
            return Ok(OwnershipSnapshot::new(
                config.dense_start,
                Vec::new(),
                HashMap::new(),
                store.into_unit_lists(),
            ));
        };
        if end <= max || config.dense_start > end {
            return Err(OwnershipError::InvalidBounds {
                start: config.dense_start,
                end,
                max,
            });
        }

        let flat = trie.flatten(config.dense_start, end);

        // SAFETY: flattened payload pointers point at boxed sets still owned
        // by `store`.
        let dense: Vec<SetId> = flat
            .dense
            .iter()
            .map(|slot| match slot {
                Some(set) => unsafe { set.as_ref() }.id(),
                None => NO_OWNER,
            })
            .collect();
        let sparse: HashMap<u64, SetId> = flat
            .sparse
            .iter()
            .map(|(&fact, set)| (fact, unsafe { set.as_ref() }.id()))
            .collect();

        tracing::debug!(
            "finalize: {} dense slots, {} sparse facts, {} sets",
            dense.len(),
            sparse.len(),
            store.sets.len()
        );
        Ok(OwnershipSnapshot::new(
            config.dense_start,
            dense,
            sparse,
            store.into_unit_lists(),
        ))
    }
}

fn validate(ranges: &[IdRange]) -> Result<(), OwnershipError> {
    let mut prev_last: Option<u64> = None;
    for (index, range) in ranges.iter().enumerate() {
        if range.first > u32::MAX as u64 || range.last > u32::MAX as u64 {
            return Err(OwnershipError::IdOverflow(range.first.max(range.last)));
        }
        if range.first > range.last {
            // degenerate, the trie skips it
            continue;
        }
        if let Some(prev) = prev_last {
            if range.first <= prev {
                return Err(OwnershipError::UnsortedRanges { index });
            }
        }
        prev_last = Some(range.last);
    }
    Ok(())
}
