//! The iobuf handle and its bound-management surface.

use std::marker::PhantomData;

use crate::bigstring::Bigstring;
use crate::error::{Error, Result};
use crate::marker::{Access, NoSeek, ReadOnly, ReadWrite, Seek, Seekability};
use crate::raw::RawIobuf;

mod access;
pub mod blit;
mod dump;
pub(crate) mod prim;

pub use dump::Region;

/// A non-moving, contiguous byte region with a movable window.
///
/// An `Iobuf` is a handle onto a shared [`Bigstring`] plus four indices:
/// the *limits* `[lo_min, hi_max)`, which may shrink but never widen, and the
/// *window* `[lo, hi)` inside them, which is what every accessor sees.
///
/// The two type parameters are zero-sized capability markers:
///
/// - `A`: [`ReadWrite`] handles may write bytes, [`ReadOnly`](crate::ReadOnly)
///   handles may not.
/// - `S`: [`Seek`] handles may move the window and shrink the limits,
///   [`NoSeek`](crate::NoSeek) handles may not.
///
/// Both default to the strongest marker, so `Iobuf` written bare means
/// `Iobuf<ReadWrite, Seek>`. Capabilities are weakened with [`read_only`]
/// and [`no_seek`]; there is no way back.
///
/// Cloning is cheap and shares the storage, giving two handles with
/// independent windows over the same bytes.
///
/// [`read_only`]: Iobuf::read_only
/// [`no_seek`]: Iobuf::no_seek
///
/// # Examples
///
/// ```
/// use monobuf::Iobuf;
///
/// let mut b: Iobuf = Iobuf::new(8);
/// b.fill_be::<u16>(0xBEEF).unwrap();
/// b.flip_lo();
/// assert_eq!(b.len(), 2);
/// assert_eq!(b.peek_be::<u16>(0).unwrap(), 0xBEEF);
/// ```
pub struct Iobuf<A: Access = ReadWrite, S: Seekability = Seek> {
    pub(crate) raw: RawIobuf,
    _marker: PhantomData<(A, S)>,
}

impl<A: Access, S: Seekability> Clone for Iobuf<A, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

/// An opaque capture of the window's lower edge, restorable later.
///
/// Snapshots enable speculative parsing: capture, consume, and restore if
/// the frame turns out to be incomplete. Restoring onto a *different* iobuf
/// is accepted whenever the captured position lies within that iobuf's
/// current limits; it can reposition the window but can never widen limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoBound(usize);

/// An opaque capture of the window's upper edge, restorable later.
///
/// Same cross-iobuf policy as [`LoBound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiBound(usize);

impl<A: Access, S: Seekability> Iobuf<A, S> {
    #[inline(always)]
    pub(crate) fn from_raw(raw: RawIobuf) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Creates an iobuf over `len` fresh zeroed bytes. Window and limits
    /// both cover the whole allocation.
    pub fn new(len: usize) -> Self {
        Self::from_raw(RawIobuf::new(len))
    }

    /// Creates an iobuf over a copy of `src`.
    pub fn of_slice(src: &[u8]) -> Self {
        Self::from_raw(RawIobuf::of_slice(src))
    }

    /// Creates an iobuf over a copy of the bytes of `s`.
    pub fn of_str(s: &str) -> Self {
        Self::of_slice(s.as_bytes())
    }

    /// Creates an iobuf adopting the subrange `[pos, pos + len)` of an
    /// existing [`Bigstring`]. Window and limits are both set to that range;
    /// the storage is shared, not copied.
    pub fn of_bigstring(buf: &Bigstring, pos: usize, len: usize) -> Result<Self> {
        Ok(Self::from_raw(RawIobuf::of_bigstring(buf.clone(), pos, len)?))
    }

    /// Size of the window.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Size of the limits. Shrinks under [`narrow`](Iobuf::narrow) and
    /// friends, never grows back.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// `true` if the window is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// `Ok(())` if `[pos, pos + len)` lies inside the window.
    ///
    /// Pair this with the `unsafe_` accessor mirrors to consolidate many
    /// bounds checks into one before a hot loop.
    #[inline(always)]
    pub fn check_range(&self, pos: usize, len: usize) -> Result<()> {
        self.raw.check_range(pos, len)
    }

    /// Captures the window's lower edge.
    #[inline]
    pub fn lo_bound(&self) -> LoBound {
        LoBound(self.raw.lo)
    }

    /// Captures the window's upper edge.
    #[inline]
    pub fn hi_bound(&self) -> HiBound {
        HiBound(self.raw.hi)
    }

    /// Aliases the subrange `[pos, pos + len)` of the window as a new iobuf
    /// whose window *and* limits are exactly that range.
    ///
    /// Data permission is inherited; seek permission of the sub-view is
    /// freely chosen by the caller, which is how a parent hands a frozen
    /// view to a sub-parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use monobuf::{Iobuf, NoSeek, ReadWrite};
    ///
    /// let mut t: Iobuf = Iobuf::new(10);
    /// t.poke_be::<u8>(3, 0xAA).unwrap();
    /// let sub: Iobuf<ReadWrite, NoSeek> = t.sub_shared(2, 4).unwrap();
    /// assert_eq!(sub.peek_be::<u8>(1).unwrap(), 0xAA);
    /// ```
    pub fn sub_shared<S2: Seekability>(&self, pos: usize, len: usize) -> Result<Iobuf<A, S2>> {
        Ok(Iobuf::from_raw(self.raw.sub_shared(pos, len)?))
    }

    /// Weakens the data permission to read-only. Free; there is no inverse.
    #[inline]
    pub fn read_only(self) -> Iobuf<ReadOnly, S> {
        Iobuf::from_raw(self.raw)
    }

    /// Freezes the window and limits. Free; there is no inverse.
    ///
    /// Positional reads (and writes, given `ReadWrite`) keep working on the
    /// frozen handle.
    #[inline]
    pub fn no_seek(self) -> Iobuf<A, NoSeek> {
        Iobuf::from_raw(self.raw)
    }

    /// Runs `f` on a temporarily seek-capable handle over the same storage,
    /// restoring the window and limits on every exit path, including a
    /// panic in `f`.
    ///
    /// Byte writes performed inside `f` persist; index motion does not.
    pub fn protect_window_and_bounds<R>(&mut self, f: impl FnOnce(&mut Iobuf<A, Seek>) -> R) -> R {
        // The scoped handle owns its own copy of the indices, so whatever f
        // does to them vanishes with it. Storage is shared, so data writes
        // stick.
        let mut scoped: Iobuf<A, Seek> = Iobuf::from_raw(self.raw.clone());
        f(&mut scoped)
    }

    /// CRC-32 (IEEE) of the window.
    pub fn crc32(&self) -> u32 {
        crc32fast::hash(unsafe { self.raw.window_bytes(0, self.len()) })
    }

    /// Raw view of the storage pointer and the four indices, for
    /// zero-allocation syscall wrappers.
    ///
    /// The core does not defend against writes done behind its back; a
    /// caller writing through [`Expert::buf_ptr`] must itself respect the
    /// limits.
    #[inline]
    pub fn expert(&self) -> Expert<'_> {
        Expert { raw: &self.raw }
    }
}

impl<A: Access> Iobuf<A, Seek> {
    /// Shrinks the limits to the current window.
    #[inline]
    pub fn narrow(&mut self) {
        self.raw.narrow();
    }

    /// Raises the lower limit to the window's lower edge.
    #[inline]
    pub fn narrow_lo(&mut self) {
        self.raw.narrow_lo();
    }

    /// Lowers the upper limit to the window's upper edge.
    #[inline]
    pub fn narrow_hi(&mut self) {
        self.raw.narrow_hi();
    }

    /// Moves the window's lower edge forward by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.raw.advance(n)
    }

    /// [`advance`](Iobuf::advance) without the bounds check.
    ///
    /// # Safety
    /// `n` must not exceed [`len`](Iobuf::len); otherwise the invariant is
    /// broken and later accesses may touch memory outside the window.
    #[inline(always)]
    pub unsafe fn unsafe_advance(&mut self, n: usize) {
        self.raw.unsafe_advance(n);
    }

    /// Sets the window's length to `len`, growing or shrinking its upper
    /// edge within the limits.
    #[inline]
    pub fn resize(&mut self, len: usize) -> Result<()> {
        self.raw.resize(len)
    }

    /// [`resize`](Iobuf::resize) without the bounds check.
    ///
    /// # Safety
    /// `lo + len` must not exceed `hi_max`.
    #[inline(always)]
    pub unsafe fn unsafe_resize(&mut self, len: usize) {
        self.raw.unsafe_resize(len);
    }

    /// Moves the window's lower edge back to the lower limit, keeping `hi`.
    #[inline]
    pub fn rewind(&mut self) {
        self.raw.rewind();
    }

    /// Sets the window to the whole of the limits.
    #[inline]
    pub fn reset(&mut self) {
        self.raw.reset();
    }

    /// Repositions the window over `[lo_min, lo)`: everything filled so far
    /// becomes the new window, ready to be consumed.
    ///
    /// ```text
    /// before: [       xxxx  ]
    /// after:  [xxxxxxx      ]
    /// ```
    #[inline]
    pub fn flip_lo(&mut self) {
        self.raw.flip_lo();
    }

    /// Repositions the window over `[hi, hi_max)`: the dual of
    /// [`flip_lo`](Iobuf::flip_lo), used to step past a processed frame.
    #[inline]
    pub fn flip_hi(&mut self) {
        self.raw.flip_hi();
    }

    /// As [`flip_lo`](Iobuf::flip_lo), but the new lower edge is the
    /// snapshot instead of the lower limit. Fails if the snapshot does not
    /// lie in `[lo_min, lo]`.
    #[inline]
    pub fn bounded_flip_lo(&mut self, snap: LoBound) -> Result<()> {
        self.raw.bounded_flip_lo(snap.0)
    }

    /// As [`flip_hi`](Iobuf::flip_hi), but the new upper edge is the
    /// snapshot instead of the upper limit. Fails if the snapshot does not
    /// lie in `[hi, hi_max]`.
    #[inline]
    pub fn bounded_flip_hi(&mut self, snap: HiBound) -> Result<()> {
        self.raw.bounded_flip_hi(snap.0)
    }

    /// Moves the window's lower edge to the captured position. Fails if the
    /// position does not lie in `[lo_min, hi]`.
    #[inline]
    pub fn restore_lo_bound(&mut self, snap: LoBound) -> Result<()> {
        if snap.0 < self.raw.lo_min || snap.0 > self.raw.hi {
            return Err(Error::BadBound);
        }
        self.raw.lo = snap.0;
        Ok(())
    }

    /// Moves the window's upper edge to the captured position. Fails if the
    /// position does not lie in `[lo, hi_max]`.
    #[inline]
    pub fn restore_hi_bound(&mut self, snap: HiBound) -> Result<()> {
        if snap.0 < self.raw.lo || snap.0 > self.raw.hi_max {
            return Err(Error::BadBound);
        }
        self.raw.hi = snap.0;
        Ok(())
    }
}

impl Iobuf<ReadWrite, Seek> {
    /// Re-points this handle at `src`'s storage and indices, creating an
    /// explicit alias.
    ///
    /// Both sides must be `ReadWrite`: a read-only alias can never be
    /// laundered into a writable one through this operation. The destination
    /// must be seekable, since all four of its indices change.
    pub fn set_bounds_and_buffer<S2: Seekability>(&mut self, src: &Iobuf<ReadWrite, S2>) {
        self.raw.set_bounds_and_buffer(&src.raw);
    }

    /// As [`set_bounds_and_buffer`](Iobuf::set_bounds_and_buffer) fused with
    /// a narrow to the subrange `[pos, pos + len)` of `src`'s window, with no
    /// intermediate sub-view.
    pub fn set_bounds_and_buffer_sub<S2: Seekability>(
        &mut self,
        src: &Iobuf<ReadWrite, S2>,
        pos: usize,
        len: usize,
    ) -> Result<()> {
        self.raw = src.raw.sub_shared(pos, len)?;
        Ok(())
    }

    /// Memmoves the window down to the lower limit and opens the window over
    /// the room that freed up: unread bytes survive at the front, and fills
    /// may continue behind them.
    ///
    /// # Examples
    ///
    /// ```
    /// use monobuf::Iobuf;
    ///
    /// let mut t: Iobuf = Iobuf::of_str("ABCDEFGH");
    /// t.advance(3).unwrap();
    /// t.compact();
    /// assert_eq!(t.expert().lo(), 5);
    /// assert_eq!(t.expert().hi(), 8);
    /// ```
    #[inline]
    pub fn compact(&mut self) {
        self.raw.compact();
    }

    /// As [`compact`](Iobuf::compact), but the destination floor and ceiling
    /// are the snapshots instead of the limits.
    #[inline]
    pub fn bounded_compact(&mut self, lo_snap: LoBound, hi_snap: HiBound) -> Result<()> {
        self.raw.compact_to(lo_snap.0, hi_snap.0)
    }
}

/// Raw storage and index view returned by [`Iobuf::expert`].
///
/// Everything here is an escape hatch for zero-allocation syscall plumbing.
/// Reads through the pointers race with nothing (the crate is
/// single-threaded by construction), but writes bypass the capability
/// system entirely.
pub struct Expert<'a> {
    raw: &'a RawIobuf,
}

impl Expert<'_> {
    /// Pointer to the first byte of the backing storage.
    #[inline]
    pub fn buf_ptr(&self) -> *const u8 {
        self.raw.ptr()
    }

    /// Mutable pointer to the first byte of the backing storage.
    ///
    /// Writing through it from a handle without write permission, or outside
    /// the limits, is undefined behavior at the contract level: the core
    /// does not defend against it.
    #[inline]
    pub fn buf_mut_ptr(&self) -> *mut u8 {
        self.raw.ptr()
    }

    /// Total size of the backing storage.
    #[inline]
    pub fn buf_len(&self) -> usize {
        self.raw.buf.len()
    }

    /// The lower limit.
    #[inline]
    pub fn lo_min(&self) -> usize {
        self.raw.lo_min
    }

    /// The window's lower edge.
    #[inline]
    pub fn lo(&self) -> usize {
        self.raw.lo
    }

    /// The window's upper edge.
    #[inline]
    pub fn hi(&self) -> usize {
        self.raw.hi
    }

    /// The upper limit.
    #[inline]
    pub fn hi_max(&self) -> usize {
        self.raw.hi_max
    }

    /// Pointer to the first window byte.
    #[inline]
    pub fn window_ptr(&self) -> *const u8 {
        self.raw.window_ptr()
    }

    /// Mutable pointer to the first window byte. Same contract as
    /// [`buf_mut_ptr`](Expert::buf_mut_ptr).
    #[inline]
    pub fn window_mut_ptr(&self) -> *mut u8 {
        self.raw.window_ptr()
    }
}
