//! Typed copies between iobufs.
//!
//! Four variants, distinguished by which cursors advance:
//!
//! | function | advances `src` | advances `dst` |
//! |---|---|---|
//! | [`blit`] | no | no |
//! | [`consume`] | yes | no |
//! | [`fill`] | no | yes |
//! | [`consume_and_fill`] | yes | yes |
//!
//! A side only needs `Seek` if its cursor advances; the destination always
//! needs `ReadWrite`. All variants are bounded and fail before any byte
//! moves. Source and destination may alias the same storage; copies use
//! memmove semantics, so overlapping ranges are handled correctly.

use std::ptr;

use super::Iobuf;
use crate::error::Result;
use crate::marker::{Access, ReadWrite, Seek, Seekability};

/// Copies `len` bytes from `src`'s window at `src_pos` to `dst`'s window at
/// `dst_pos`. Neither cursor moves.
pub fn blit<A: Access, SA: Seekability, SD: Seekability>(
    src: &Iobuf<A, SA>,
    src_pos: usize,
    dst: &mut Iobuf<ReadWrite, SD>,
    dst_pos: usize,
    len: usize,
) -> Result<()> {
    src.check_range(src_pos, len)?;
    dst.check_range(dst_pos, len)?;
    unsafe { unsafe_blit(src, src_pos, dst, dst_pos, len) };
    Ok(())
}

/// [`blit`] without the bounds checks.
///
/// # Safety
/// Both ranges must lie inside their respective windows.
pub unsafe fn unsafe_blit<A: Access, SA: Seekability, SD: Seekability>(
    src: &Iobuf<A, SA>,
    src_pos: usize,
    dst: &mut Iobuf<ReadWrite, SD>,
    dst_pos: usize,
    len: usize,
) {
    ptr::copy(
        src.raw.window_ptr().add(src_pos),
        dst.raw.window_ptr().add(dst_pos),
        len,
    );
}

/// Copies `len` bytes from the front of `src`'s window to `dst`'s window at
/// `dst_pos`, advancing `src` past them.
pub fn consume<A: Access, SD: Seekability>(
    src: &mut Iobuf<A, Seek>,
    dst: &mut Iobuf<ReadWrite, SD>,
    dst_pos: usize,
    len: usize,
) -> Result<()> {
    src.check_range(0, len)?;
    dst.check_range(dst_pos, len)?;
    unsafe { unsafe_consume(src, dst, dst_pos, len) };
    Ok(())
}

/// [`consume`] without the bounds checks.
///
/// # Safety
/// Both ranges must lie inside their respective windows.
pub unsafe fn unsafe_consume<A: Access, SD: Seekability>(
    src: &mut Iobuf<A, Seek>,
    dst: &mut Iobuf<ReadWrite, SD>,
    dst_pos: usize,
    len: usize,
) {
    ptr::copy(
        src.raw.window_ptr(),
        dst.raw.window_ptr().add(dst_pos),
        len,
    );
    src.raw.unsafe_advance(len);
}

/// Copies `len` bytes from `src`'s window at `src_pos` to the front of
/// `dst`'s window, advancing `dst` past them.
pub fn fill<A: Access, SA: Seekability>(
    src: &Iobuf<A, SA>,
    src_pos: usize,
    dst: &mut Iobuf<ReadWrite, Seek>,
    len: usize,
) -> Result<()> {
    src.check_range(src_pos, len)?;
    dst.check_range(0, len)?;
    unsafe { unsafe_fill(src, src_pos, dst, len) };
    Ok(())
}

/// [`fill`] without the bounds checks.
///
/// # Safety
/// Both ranges must lie inside their respective windows.
pub unsafe fn unsafe_fill<A: Access, SA: Seekability>(
    src: &Iobuf<A, SA>,
    src_pos: usize,
    dst: &mut Iobuf<ReadWrite, Seek>,
    len: usize,
) {
    ptr::copy(
        src.raw.window_ptr().add(src_pos),
        dst.raw.window_ptr(),
        len,
    );
    dst.raw.unsafe_advance(len);
}

/// Copies `len` bytes from the front of `src`'s window to the front of
/// `dst`'s window, advancing both.
pub fn consume_and_fill<A: Access>(
    src: &mut Iobuf<A, Seek>,
    dst: &mut Iobuf<ReadWrite, Seek>,
    len: usize,
) -> Result<()> {
    src.check_range(0, len)?;
    dst.check_range(0, len)?;
    unsafe { unsafe_consume_and_fill(src, dst, len) };
    Ok(())
}

/// [`consume_and_fill`] without the bounds checks.
///
/// # Safety
/// Both windows must hold at least `len` bytes.
pub unsafe fn unsafe_consume_and_fill<A: Access>(
    src: &mut Iobuf<A, Seek>,
    dst: &mut Iobuf<ReadWrite, Seek>,
    len: usize,
) {
    ptr::copy(src.raw.window_ptr(), dst.raw.window_ptr(), len);
    src.raw.unsafe_advance(len);
    dst.raw.unsafe_advance(len);
}

/// Copies `[pos, pos + len)` of `src`'s window into a fresh iobuf with its
/// own storage. `src` does not move.
pub fn sub<A: Access, SA: Seekability>(
    src: &Iobuf<A, SA>,
    pos: usize,
    len: usize,
) -> Result<Iobuf<ReadWrite, Seek>> {
    src.check_range(pos, len)?;
    Ok(Iobuf::of_slice(unsafe { src.raw.window_bytes(pos, len) }))
}

/// Copies the first `len` window bytes of `src` into a fresh iobuf with its
/// own storage, advancing `src` past them.
pub fn consume_sub<A: Access>(
    src: &mut Iobuf<A, Seek>,
    len: usize,
) -> Result<Iobuf<ReadWrite, Seek>> {
    let out = sub(src, 0, len)?;
    unsafe { src.raw.unsafe_advance(len) };
    Ok(out)
}
