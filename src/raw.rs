//! Untyped core shared by every capability flavor of [`Iobuf`](crate::Iobuf).
//!
//! `RawIobuf` owns the storage handle and the four indices, and implements
//! every operation without capability gating. The public wrapper re-exposes
//! each method under the capability bounds that make it sound. Checked
//! operations are a range check followed by the unchecked body, so the
//! `unsafe_` mirrors in the public surface are the same code minus the check.

use std::ptr;
use std::slice;

use crate::bigstring::Bigstring;
use crate::error::{Error, Result};

/// Invariant: `0 <= lo_min <= lo <= hi <= hi_max <= buf.len()`.
#[derive(Clone)]
pub(crate) struct RawIobuf {
    pub(crate) buf: Bigstring,
    pub(crate) lo_min: usize,
    pub(crate) lo: usize,
    pub(crate) hi: usize,
    pub(crate) hi_max: usize,
}

impl RawIobuf {
    pub(crate) fn new(len: usize) -> Self {
        Self::of_bigstring_unchecked(Bigstring::new(len), 0, len)
    }

    pub(crate) fn of_slice(src: &[u8]) -> Self {
        Self::of_bigstring_unchecked(Bigstring::from_slice(src), 0, src.len())
    }

    pub(crate) fn of_bigstring(buf: Bigstring, pos: usize, len: usize) -> Result<Self> {
        let end = pos.checked_add(len).ok_or(Error::OutOfRange {
            pos,
            len,
            window: buf.len(),
        })?;
        if end > buf.len() {
            return Err(Error::OutOfRange {
                pos,
                len,
                window: buf.len(),
            });
        }
        Ok(Self::of_bigstring_unchecked(buf, pos, len))
    }

    fn of_bigstring_unchecked(buf: Bigstring, pos: usize, len: usize) -> Self {
        Self {
            buf,
            lo_min: pos,
            lo: pos,
            hi: pos + len,
            hi_max: pos + len,
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.hi - self.lo
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.hi_max - self.lo_min
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.hi == self.lo
    }

    /// `Ok(())` if `[pos, pos + len)` lies inside the window.
    #[inline(always)]
    pub(crate) fn check_range(&self, pos: usize, len: usize) -> Result<()> {
        match pos.checked_add(len) {
            Some(end) if end <= self.len() => Ok(()),
            _ => Err(Error::OutOfRange {
                pos,
                len,
                window: self.len(),
            }),
        }
    }

    #[inline(always)]
    pub(crate) fn ptr(&self) -> *mut u8 {
        self.buf.as_mut_ptr()
    }

    /// Pointer to the first window byte.
    #[inline(always)]
    pub(crate) fn window_ptr(&self) -> *mut u8 {
        // In bounds: lo <= hi <= buf.len() by the invariant.
        unsafe { self.ptr().add(self.lo) }
    }

    // ---- bound management ------------------------------------------------

    #[inline]
    pub(crate) fn narrow(&mut self) {
        self.lo_min = self.lo;
        self.hi_max = self.hi;
    }

    #[inline]
    pub(crate) fn narrow_lo(&mut self) {
        self.lo_min = self.lo;
    }

    #[inline]
    pub(crate) fn narrow_hi(&mut self) {
        self.hi_max = self.hi;
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) -> Result<()> {
        self.check_range(0, n)?;
        unsafe { self.unsafe_advance(n) };
        Ok(())
    }

    #[inline(always)]
    pub(crate) unsafe fn unsafe_advance(&mut self, n: usize) {
        self.lo += n;
    }

    #[inline]
    pub(crate) fn resize(&mut self, len: usize) -> Result<()> {
        let new_hi = self.lo.checked_add(len).ok_or(Error::OutOfRange {
            pos: 0,
            len,
            window: self.hi_max - self.lo,
        })?;
        if new_hi > self.hi_max {
            return Err(Error::OutOfRange {
                pos: 0,
                len,
                window: self.hi_max - self.lo,
            });
        }
        self.hi = new_hi;
        Ok(())
    }

    #[inline(always)]
    pub(crate) unsafe fn unsafe_resize(&mut self, len: usize) {
        self.hi = self.lo + len;
    }

    #[inline]
    pub(crate) fn rewind(&mut self) {
        self.lo = self.lo_min;
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.lo = self.lo_min;
        self.hi = self.hi_max;
    }

    #[inline]
    pub(crate) fn flip_lo(&mut self) {
        self.hi = self.lo;
        self.lo = self.lo_min;
    }

    #[inline]
    pub(crate) fn flip_hi(&mut self) {
        self.lo = self.hi;
        self.hi = self.hi_max;
    }

    #[inline]
    pub(crate) fn bounded_flip_lo(&mut self, new_lo: usize) -> Result<()> {
        if new_lo < self.lo_min || new_lo > self.lo {
            return Err(Error::BadBound);
        }
        self.hi = self.lo;
        self.lo = new_lo;
        Ok(())
    }

    #[inline]
    pub(crate) fn bounded_flip_hi(&mut self, new_hi: usize) -> Result<()> {
        if new_hi > self.hi_max || new_hi < self.hi {
            return Err(Error::BadBound);
        }
        self.lo = self.hi;
        self.hi = new_hi;
        Ok(())
    }

    /// Memmove the window down to `floor`, then open the window over the
    /// remaining room up to `ceil`.
    pub(crate) fn compact_to(&mut self, floor: usize, ceil: usize) -> Result<()> {
        let len = self.len();
        if floor < self.lo_min || ceil > self.hi_max || floor + len > ceil {
            return Err(Error::BadBound);
        }
        unsafe {
            ptr::copy(self.window_ptr(), self.ptr().add(floor), len);
        }
        self.lo = floor + len;
        self.hi = ceil;
        Ok(())
    }

    pub(crate) fn compact(&mut self) {
        // Cannot fail: lo_min + len <= hi <= hi_max.
        let len = self.len();
        unsafe {
            ptr::copy(self.window_ptr(), self.ptr().add(self.lo_min), len);
        }
        self.lo = self.lo_min + len;
        self.hi = self.hi_max;
    }

    /// Re-point this handle at `src`'s storage and indices.
    pub(crate) fn set_bounds_and_buffer(&mut self, src: &RawIobuf) {
        self.buf = src.buf.clone();
        self.lo_min = src.lo_min;
        self.lo = src.lo;
        self.hi = src.hi;
        self.hi_max = src.hi_max;
    }

    /// Alias over the same storage, window and limits both set to
    /// `[lo + pos, lo + pos + len)`.
    pub(crate) fn sub_shared(&self, pos: usize, len: usize) -> Result<RawIobuf> {
        self.check_range(pos, len)?;
        let lo = self.lo + pos;
        Ok(RawIobuf {
            buf: self.buf.clone(),
            lo_min: lo,
            lo,
            hi: lo + len,
            hi_max: lo + len,
        })
    }

    // ---- byte access -----------------------------------------------------

    /// # Safety
    /// `[pos, pos + dst.len())` must lie inside the window, and `dst` must
    /// not overlap the storage.
    #[inline]
    pub(crate) unsafe fn unsafe_peek(&self, pos: usize, dst: &mut [u8]) {
        ptr::copy_nonoverlapping(self.window_ptr().add(pos), dst.as_mut_ptr(), dst.len());
    }

    /// # Safety
    /// `[pos, pos + src.len())` must lie inside the window, and `src` must
    /// not overlap the storage.
    #[inline]
    pub(crate) unsafe fn unsafe_poke(&mut self, pos: usize, src: &[u8]) {
        ptr::copy_nonoverlapping(src.as_ptr(), self.window_ptr().add(pos), src.len());
    }

    /// # Safety
    /// `[pos, pos + len)` must lie inside the window. The returned slice
    /// aliases the shared storage; it must not outlive this statement's use.
    #[inline]
    pub(crate) unsafe fn window_bytes(&self, pos: usize, len: usize) -> &[u8] {
        slice::from_raw_parts(self.window_ptr().add(pos), len)
    }

    /// # Safety
    /// Same contract as [`window_bytes`](Self::window_bytes).
    #[inline]
    pub(crate) unsafe fn window_bytes_mut(&mut self, pos: usize, len: usize) -> &mut [u8] {
        slice::from_raw_parts_mut(self.window_ptr().add(pos), len)
    }
}
