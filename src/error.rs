//! Error types for DSN6 decoding.

use thiserror::Error;

/// Errors produced while decoding a DSN6 map.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure while acquiring map bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header fields violate a format invariant (bad extents, zero scale
    /// denominator, zero rescale divisor, short header).
    #[error("malformed DSN6 header: {0}")]
    MalformedHeader(String),

    /// Payload ended before every sample required by the declared extents
    /// could be read.
    #[error("truncated DSN6 data: {0}")]
    TruncatedData(String),

    /// Unit-cell lengths/angles do not describe a real cell (negative
    /// radicand in the basis construction).
    #[error("degenerate unit cell: {0}")]
    DegenerateCell(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
