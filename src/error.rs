//! Error types for Huffman encoding and decoding.

use thiserror::Error;

/// Error variants for codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// There were no input bytes to build a code from.
    #[error("empty input")]
    EmptyInput,

    /// Fewer than two distinct symbols occur in the input.
    #[error("insufficient alphabet: {distinct} distinct symbol(s), need at least 2")]
    InsufficientAlphabet {
        /// Number of symbols with a non-zero count.
        distinct: usize,
    },

    /// Symbol counts sum past `u64::MAX`.
    #[error("weight overflow: symbol counts exceed u64::MAX")]
    WeightOverflow,

    /// A symbol reached the packer without a code.
    ///
    /// Never caused by bad input: the code table was not derived from the data being packed.
    #[error("internal consistency failure: no code for symbol {symbol:#04x}")]
    InternalConsistency {
        /// The symbol that had no code.
        symbol: u8,
    },

    /// The container is corrupt, truncated, or its code table does not match the payload.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// An I/O error occurred while reading or writing a container.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedContainer(reason.into())
    }
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
