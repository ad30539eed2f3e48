//! Shared error type across bpfstats crates.

use thiserror::Error;

/// Stable error categories (for callers that branch on the failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or unreadable configuration.
    Config,
    /// Exposition listener could not bind.
    Bind,
    /// Instrument name registered twice.
    DuplicateInstrument,
    /// Metric name rejected by the exposition format.
    InvalidName,
    /// Label name rejected by the exposition format.
    InvalidLabel,
    /// Label set could not be hashed.
    Hash,
    /// Delta between two absolute values does not fit in i64.
    Overflow,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::Bind => "BIND",
            ErrorKind::DuplicateInstrument => "DUPLICATE_INSTRUMENT",
            ErrorKind::InvalidName => "INVALID_NAME",
            ErrorKind::InvalidLabel => "INVALID_LABEL",
            ErrorKind::Hash => "HASH",
            ErrorKind::Overflow => "OVERFLOW",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("config: {0}")]
    Config(String),
    #[error("failed to bind exposition listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("instrument already registered: {0}")]
    Duplicate(String),
    #[error("invalid metric name: {0:?}")]
    InvalidName(String),
    #[error("invalid label name: {0:?}")]
    InvalidLabel(String),
    #[error("label hashing failed: {0}")]
    Hash(String),
    #[error("delta from {previous} to {value} overflows i64")]
    Overflow { previous: i64, value: i64 },
    #[error("internal: {0}")]
    Internal(String),
}

impl StatsError {
    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::Config(_) => ErrorKind::Config,
            StatsError::Bind { .. } => ErrorKind::Bind,
            StatsError::Duplicate(_) => ErrorKind::DuplicateInstrument,
            StatsError::InvalidName(_) => ErrorKind::InvalidName,
            StatsError::InvalidLabel(_) => ErrorKind::InvalidLabel,
            StatsError::Hash(_) => ErrorKind::Hash,
            StatsError::Overflow { .. } => ErrorKind::Overflow,
            StatsError::Internal(_) => ErrorKind::Internal,
        }
    }
}
