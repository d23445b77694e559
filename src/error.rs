use thiserror::Error;

/// A specialized `Result` type for iobuf operations.
pub type Result<T> = std::result::Result<T, crate::Error>;

/// Errors reported by checked iobuf operations.
///
/// Every checked accessor and bound mutator fails *before* any byte moves or
/// any index changes, so an `Err` always leaves the iobuf exactly as it was.
/// The `unsafe_` mirrors elide the corresponding check entirely and may
/// corrupt memory when their contract is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A requested range does not fit in the current window (or limits, for
    /// bound mutators). These are programmer errors; propagate them.
    #[error("range out of bounds: pos {pos} + len {len} exceeds {window} available bytes")]
    OutOfRange {
        /// Requested start, relative to the window.
        pos: usize,
        /// Requested length in bytes.
        len: usize,
        /// Bytes actually available.
        window: usize,
    },

    /// The window holds the beginning of a length-prefixed frame but not all
    /// of it. Recoverable: the window is untouched, retry once more bytes
    /// have arrived.
    #[error("truncated frame: need {need} bytes, window holds {have}")]
    TruncatedFrame {
        /// Bytes the complete frame requires, prefix included.
        need: usize,
        /// Bytes currently in the window.
        have: usize,
    },

    /// A frame payload did not decode, or the decoder consumed a different
    /// number of bytes than the prefix promised.
    #[error("malformed frame payload")]
    BadFrame,

    /// A bound snapshot does not lie within the current limits.
    #[error("bound outside the current limits")]
    BadBound,

    /// The window does not start with an ASCII decimal integer.
    #[error("window does not start with a decimal integer")]
    BadDecimal,

    /// A decimal integer in the window does not fit in an `i64`.
    #[error("decimal integer overflows an i64")]
    DecimalOverflow,

    /// Bytes requested as a string are not valid UTF-8.
    #[error("window bytes are not valid UTF-8")]
    BadUtf8,
}
