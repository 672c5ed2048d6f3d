//! Thaw error type.

use storable_buffers::ReadError;
use thiserror::Error;

/// Error type for `thaw`/`retrieve` operations.
///
/// Every variant is fatal: decoding aborts at the first failure and no
/// partial result is returned.
#[derive(Debug, Error)]
pub enum ThawError {
    #[error("unsupported format version {0}.{1}")]
    UnsupportedVersion(u8, u8),
    #[error("byte order mismatch")]
    ByteOrderMismatch,
    #[error("incompatible {0} size {1}")]
    IncompatibleSize(&'static str, u8),
    #[error("file magic not found")]
    BadMagic,
    #[error("unsupported tag {0}")]
    UnknownTag(u8),
    #[error("backreference index {index} out of range (seen {len})")]
    BackrefOutOfRange { index: usize, len: usize },
    #[error("class index {index} out of range (seen {len})")]
    ClassIndexOutOfRange { index: usize, len: usize },
    #[error("{0} trailing bytes after root record")]
    TrailingData(usize),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("invalid hash key")]
    InvalidKey,
    #[error("nesting depth limit {0} exceeded")]
    DepthLimitExceeded(usize),
    #[error("unexpected end of input")]
    UnexpectedEof(#[from] ReadError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
