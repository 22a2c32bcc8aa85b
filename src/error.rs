//! Error types surfaced by the map, its cursors and its configuration.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure of a cursor step or of a position-based access.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CursorError {
    /// Stepping back from the first entry or from an end position with
    /// nothing behind it, or reading the entry at an end position.
    #[error("position is out of range")]
    OutOfRange,
    /// The position was produced by a different map.
    #[error("position belongs to a different map")]
    WrongMap,
    /// The entry the position referred to has been removed.
    #[error("position refers to a removed entry")]
    Stale,
}

/// Rejected `MapConfig` values.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capacity must be at least one bucket")]
    ZeroCapacity,
    #[error("max load factor must be finite and at least 1e-6, got {0}")]
    InvalidLoadFactor(f64),
}

/// Allocation failure while growing the bucket index. The map is left as it
/// was before the call.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RehashError {
    #[error("bucket allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}
