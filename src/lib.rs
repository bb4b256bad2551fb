//! Ownership tracking for a fact database: a range-keyed trie over 32-bit
//! fact ids ([`TrieArray`]) plus the runtime surface that drives it — unit
//! claims, set interning, and epoch-published snapshots.

pub use factdb_core::{
    IndexConfig, OwnershipError, OwnershipIndex, OwnershipSet, OwnershipSnapshot, SetId,
    SnapshotCell, UnitId, NO_OWNER,
};
pub use factdb_dsa::{Flattened, IdRange, RefCounted, TrieArray};

/// Install the default tracing subscriber. Intended for binaries and ad-hoc
/// diagnostics; tests and embedders bring their own.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
    tracing::debug!("factdb tracing initialized");
}
