pub mod config;
pub mod error;
pub mod index;
pub mod ownership;
pub mod snapshot;

pub use config::IndexConfig;
pub use error::OwnershipError;
pub use index::OwnershipIndex;
pub use ownership::{OwnershipSet, SetId, UnitId};
pub use snapshot::{OwnershipSnapshot, SnapshotCell, NO_OWNER};
