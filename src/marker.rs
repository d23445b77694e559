//! Capability markers.
//!
//! An [`Iobuf`](crate::Iobuf) carries two zero-sized type parameters: a data
//! marker deciding whether the bytes may be written, and a seek marker
//! deciding whether the window and limits may be moved. Neither has any
//! runtime representation; all gating happens at compile time.
//!
//! Capabilities only ever weaken. [`Iobuf::read_only`](crate::Iobuf::read_only)
//! and [`Iobuf::no_seek`](crate::Iobuf::no_seek) are free coercions to the
//! weaker marker; there is no conversion back.

mod sealed {
    pub trait Sealed {}
}

/// Data permission marker. Implemented by [`ReadOnly`] and [`ReadWrite`].
pub trait Access: sealed::Sealed + 'static {
    /// Human-readable name, used by `Debug` output.
    const NAME: &'static str;
}

/// Seek permission marker. Implemented by [`Seek`] and [`NoSeek`].
pub trait Seekability: sealed::Sealed + 'static {
    /// Human-readable name, used by `Debug` output.
    const NAME: &'static str;
}

/// The handle may read bytes but not write them.
pub enum ReadOnly {}

/// The handle may both read and write bytes.
pub enum ReadWrite {}

/// The handle may move its window and shrink its limits.
pub enum Seek {}

/// The handle's window and limits are frozen. Positional reads and writes
/// still work, which is what makes `NoSeek` sub-views safe to hand to
/// sub-parsers: they cannot move the parent's window out from under it.
pub enum NoSeek {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}
impl sealed::Sealed for Seek {}
impl sealed::Sealed for NoSeek {}

impl Access for ReadOnly {
    const NAME: &'static str = "read-only";
}

impl Access for ReadWrite {
    const NAME: &'static str = "read-write";
}

impl Seekability for Seek {
    const NAME: &'static str = "seek";
}

impl Seekability for NoSeek {
    const NAME: &'static str = "no-seek";
}
