use serde::Deserialize;

use crate::error::OwnershipError;

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    /// Capacity hint for the interning store.
    pub expected_sets: usize,
    /// Reject unsorted or overlapping ranges in `add_unit` instead of
    /// handing them to the trie, whose behavior on them is unspecified.
    pub validate_ranges: bool,
    /// First fact id of the dense region when finalizing; everything below
    /// it lands in the sparse map.
    pub dense_start: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            expected_sets: 256,
            validate_ranges: true,
            dense_start: 0,
        }
    }
}

impl IndexConfig {
    /// Parse a deployment config, e.g. the `[ownership]` table of a
    /// `factdb.toml`.
    pub fn from_toml_str(raw: &str) -> Result<Self, OwnershipError> {
        toml::from_str(raw).map_err(OwnershipError::from)
    }
}
