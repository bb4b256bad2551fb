#[derive(Debug)]
pub enum OwnershipError {
    /// An id in the submitted ranges does not fit the 32-bit key space.
    IdOverflow(u64),
    /// Ranges must arrive sorted and non-overlapping; `index` is the first
    /// offender.
    UnsortedRanges { index: usize },
    /// `finalize` was asked for a bound at or below the highest claimed id.
    InvalidBounds { start: u64, end: u64, max: u64 },
    Config(String),
}

impl From<toml::de::Error> for OwnershipError {
    fn from(e: toml::de::Error) -> Self {
        OwnershipError::Config(e.to_string())
    }
}
