//! The four accessor families.
//!
//! `peek`/`poke` are positional and leave the window alone, so they work on
//! `NoSeek` handles. `consume`/`fill` operate at the window's lower edge and
//! advance it, so they additionally require `Seek`. Read operations accept
//! any data marker; write operations require `ReadWrite`.
//!
//! Every checked operation is a range check followed by the unchecked body,
//! and fails before any byte moves. The `unsafe_` mirrors are the same
//! bodies with the check elided, for hot loops that have already
//! consolidated their bounds checks via
//! [`check_range`](super::Iobuf::check_range).

use std::io::{Cursor, Write};

use super::prim::Primitive;
use super::Iobuf;
use crate::error::{Error, Result};
use crate::marker::{Access, ReadWrite, Seek, Seekability};

/// `i64::MIN` renders as `-9223372036854775808`, 20 bytes exactly.
const DECIMAL_MAX: usize = 20;

impl<A: Access, S: Seekability> Iobuf<A, S> {
    /// Reads a little-endian primitive at `pos` bytes past the window's
    /// lower edge.
    #[inline]
    pub fn peek_le<P: Primitive>(&self, pos: usize) -> Result<P> {
        self.check_range(pos, P::SIZE)?;
        Ok(unsafe { self.unsafe_peek_le(pos) })
    }

    /// Reads a big-endian primitive at `pos` bytes past the window's lower
    /// edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use monobuf::Iobuf;
    ///
    /// let b: Iobuf = Iobuf::of_slice(&[0x01, 0x02, 0x03]);
    /// assert_eq!(b.peek_be::<u16>(1).unwrap(), 0x0203);
    /// assert!(b.peek_be::<u16>(2).is_err());
    /// ```
    #[inline]
    pub fn peek_be<P: Primitive>(&self, pos: usize) -> Result<P> {
        self.check_range(pos, P::SIZE)?;
        Ok(unsafe { self.unsafe_peek_be(pos) })
    }

    /// Fills `dst` from the window bytes starting at `pos`.
    #[inline]
    pub fn peek(&self, pos: usize, dst: &mut [u8]) -> Result<()> {
        self.check_range(pos, dst.len())?;
        unsafe { self.raw.unsafe_peek(pos, dst) };
        Ok(())
    }

    /// Copies `len` window bytes starting at `pos` into a fresh vector.
    pub fn peek_to_vec(&self, pos: usize, len: usize) -> Result<Vec<u8>> {
        self.check_range(pos, len)?;
        let mut dst = vec![0u8; len];
        unsafe { self.raw.unsafe_peek(pos, &mut dst) };
        Ok(dst)
    }

    /// Parses an ASCII decimal integer starting at `pos`: an optional `-`,
    /// then digits, greedily up to the first non-digit or the window's end.
    /// Returns the value and the number of bytes it occupied.
    pub fn peek_decimal(&self, pos: usize) -> Result<(i64, usize)> {
        self.check_range(pos, 0)?;
        let bytes = unsafe { self.raw.window_bytes(pos, self.len() - pos) };
        let (neg, mut at) = match bytes.first() {
            Some(b'-') => (true, 1),
            _ => (false, 0),
        };
        // Accumulate negative so that i64::MIN parses.
        let mut acc: i64 = 0;
        let mut digits = 0;
        while let Some(d) = bytes.get(at).filter(|b| b.is_ascii_digit()) {
            acc = acc
                .checked_mul(10)
                .and_then(|a| a.checked_sub((d - b'0') as i64))
                .ok_or(Error::DecimalOverflow)?;
            at += 1;
            digits += 1;
        }
        if digits == 0 {
            return Err(Error::BadDecimal);
        }
        let value = if neg {
            acc
        } else {
            acc.checked_neg().ok_or(Error::DecimalOverflow)?
        };
        Ok((value, at))
    }

    /// [`peek_le`](Iobuf::peek_le) without the bounds check.
    ///
    /// # Safety
    /// `[pos, pos + P::SIZE)` must lie inside the window.
    #[inline(always)]
    pub unsafe fn unsafe_peek_le<P: Primitive>(&self, pos: usize) -> P {
        P::get_le(self.raw.window_bytes(pos, P::SIZE))
    }

    /// [`peek_be`](Iobuf::peek_be) without the bounds check.
    ///
    /// # Safety
    /// `[pos, pos + P::SIZE)` must lie inside the window.
    #[inline(always)]
    pub unsafe fn unsafe_peek_be<P: Primitive>(&self, pos: usize) -> P {
        P::get_be(self.raw.window_bytes(pos, P::SIZE))
    }

    /// [`peek`](Iobuf::peek) without the bounds check.
    ///
    /// # Safety
    /// `[pos, pos + dst.len())` must lie inside the window.
    #[inline(always)]
    pub unsafe fn unsafe_peek(&self, pos: usize, dst: &mut [u8]) {
        self.raw.unsafe_peek(pos, dst);
    }
}

impl<S: Seekability> Iobuf<ReadWrite, S> {
    /// Writes a little-endian primitive at `pos` bytes past the window's
    /// lower edge. The window does not move.
    #[inline]
    pub fn poke_le<P: Primitive>(&mut self, pos: usize, v: P) -> Result<()> {
        self.check_range(pos, P::SIZE)?;
        unsafe { self.unsafe_poke_le(pos, v) };
        Ok(())
    }

    /// Writes a big-endian primitive at `pos` bytes past the window's lower
    /// edge. The window does not move.
    #[inline]
    pub fn poke_be<P: Primitive>(&mut self, pos: usize, v: P) -> Result<()> {
        self.check_range(pos, P::SIZE)?;
        unsafe { self.unsafe_poke_be(pos, v) };
        Ok(())
    }

    /// Copies `src` into the window at `pos`. The window does not move.
    #[inline]
    pub fn poke(&mut self, pos: usize, src: &[u8]) -> Result<()> {
        self.check_range(pos, src.len())?;
        unsafe { self.raw.unsafe_poke(pos, src) };
        Ok(())
    }

    /// Writes the ASCII decimal representation of `v` at `pos`, no
    /// separators or terminator. Returns the number of bytes written so the
    /// caller can advance manually if desired.
    pub fn poke_decimal(&mut self, pos: usize, v: i64) -> Result<usize> {
        let mut tmp = [0u8; DECIMAL_MAX];
        let mut cur = Cursor::new(&mut tmp[..]);
        write!(cur, "{v}").expect("an i64 always fits in DECIMAL_MAX bytes");
        let n = cur.position() as usize;
        self.poke(pos, &tmp[..n])?;
        Ok(n)
    }

    /// [`poke_le`](Iobuf::poke_le) without the bounds check.
    ///
    /// # Safety
    /// `[pos, pos + P::SIZE)` must lie inside the window.
    #[inline(always)]
    pub unsafe fn unsafe_poke_le<P: Primitive>(&mut self, pos: usize, v: P) {
        v.put_le(self.raw.window_bytes_mut(pos, P::SIZE));
    }

    /// [`poke_be`](Iobuf::poke_be) without the bounds check.
    ///
    /// # Safety
    /// `[pos, pos + P::SIZE)` must lie inside the window.
    #[inline(always)]
    pub unsafe fn unsafe_poke_be<P: Primitive>(&mut self, pos: usize, v: P) {
        v.put_be(self.raw.window_bytes_mut(pos, P::SIZE));
    }

    /// [`poke`](Iobuf::poke) without the bounds check.
    ///
    /// # Safety
    /// `[pos, pos + src.len())` must lie inside the window.
    #[inline(always)]
    pub unsafe fn unsafe_poke(&mut self, pos: usize, src: &[u8]) {
        self.raw.unsafe_poke(pos, src);
    }
}

impl<A: Access> Iobuf<A, Seek> {
    /// Reads a little-endian primitive at the window's lower edge and
    /// advances past it.
    #[inline]
    pub fn consume_le<P: Primitive>(&mut self) -> Result<P> {
        self.check_range(0, P::SIZE)?;
        Ok(unsafe { self.unsafe_consume_le() })
    }

    /// Reads a big-endian primitive at the window's lower edge and advances
    /// past it.
    ///
    /// # Examples
    ///
    /// ```
    /// use monobuf::Iobuf;
    ///
    /// let mut b: Iobuf = Iobuf::of_slice(&[0x01, 0x02, 0x03, 0x04]);
    /// assert_eq!(b.consume_be::<u16>().unwrap(), 0x0102);
    /// assert_eq!(b.consume_be::<u16>().unwrap(), 0x0304);
    /// assert!(b.consume_be::<u16>().is_err());
    /// ```
    #[inline]
    pub fn consume_be<P: Primitive>(&mut self) -> Result<P> {
        self.check_range(0, P::SIZE)?;
        Ok(unsafe { self.unsafe_consume_be() })
    }

    /// Fills `dst` from the front of the window and advances past the bytes
    /// read. All of `dst` is filled, or the call fails and nothing moves.
    #[inline]
    pub fn consume(&mut self, dst: &mut [u8]) -> Result<()> {
        self.check_range(0, dst.len())?;
        unsafe {
            self.raw.unsafe_peek(0, dst);
            self.raw.unsafe_advance(dst.len());
        }
        Ok(())
    }

    /// Copies `len` bytes from the front of the window into a fresh vector
    /// and advances past them.
    pub fn consume_to_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_range(0, len)?;
        let mut dst = vec![0u8; len];
        unsafe {
            self.raw.unsafe_peek(0, &mut dst);
            self.raw.unsafe_advance(len);
        }
        Ok(dst)
    }

    /// As [`consume_to_vec`](Iobuf::consume_to_vec), decoding the bytes as
    /// UTF-8. On invalid UTF-8 the window does not move.
    pub fn consume_to_string(&mut self, len: usize) -> Result<String> {
        self.check_range(0, len)?;
        let s = unsafe {
            std::str::from_utf8(self.raw.window_bytes(0, len)).map_err(|_| Error::BadUtf8)?
        }
        .to_owned();
        unsafe { self.raw.unsafe_advance(len) };
        Ok(s)
    }

    /// Parses an ASCII decimal integer at the front of the window, greedily,
    /// and advances past it.
    pub fn consume_decimal(&mut self) -> Result<i64> {
        let (value, n) = self.peek_decimal(0)?;
        unsafe { self.raw.unsafe_advance(n) };
        Ok(value)
    }

    /// [`consume_le`](Iobuf::consume_le) without the bounds check.
    ///
    /// # Safety
    /// The window must hold at least `P::SIZE` bytes.
    #[inline(always)]
    pub unsafe fn unsafe_consume_le<P: Primitive>(&mut self) -> P {
        let v = self.unsafe_peek_le(0);
        self.raw.unsafe_advance(P::SIZE);
        v
    }

    /// [`consume_be`](Iobuf::consume_be) without the bounds check.
    ///
    /// # Safety
    /// The window must hold at least `P::SIZE` bytes.
    #[inline(always)]
    pub unsafe fn unsafe_consume_be<P: Primitive>(&mut self) -> P {
        let v = self.unsafe_peek_be(0);
        self.raw.unsafe_advance(P::SIZE);
        v
    }

    /// [`consume`](Iobuf::consume) without the bounds check.
    ///
    /// # Safety
    /// The window must hold at least `dst.len()` bytes.
    #[inline(always)]
    pub unsafe fn unsafe_consume(&mut self, dst: &mut [u8]) {
        self.raw.unsafe_peek(0, dst);
        self.raw.unsafe_advance(dst.len());
    }
}

impl Iobuf<ReadWrite, Seek> {
    /// Writes a little-endian primitive at the window's lower edge and
    /// advances past it.
    #[inline]
    pub fn fill_le<P: Primitive>(&mut self, v: P) -> Result<()> {
        self.check_range(0, P::SIZE)?;
        unsafe { self.unsafe_fill_le(v) };
        Ok(())
    }

    /// Writes a big-endian primitive at the window's lower edge and advances
    /// past it.
    #[inline]
    pub fn fill_be<P: Primitive>(&mut self, v: P) -> Result<()> {
        self.check_range(0, P::SIZE)?;
        unsafe { self.unsafe_fill_be(v) };
        Ok(())
    }

    /// Copies `src` to the window's lower edge and advances past it. All of
    /// `src` is written, or the call fails and nothing moves.
    #[inline]
    pub fn fill(&mut self, src: &[u8]) -> Result<()> {
        self.check_range(0, src.len())?;
        unsafe {
            self.raw.unsafe_poke(0, src);
            self.raw.unsafe_advance(src.len());
        }
        Ok(())
    }

    /// Copies the bytes of `s` to the window's lower edge and advances.
    #[inline]
    pub fn fill_str(&mut self, s: &str) -> Result<()> {
        self.fill(s.as_bytes())
    }

    /// Writes the ASCII decimal representation of `v` at the window's lower
    /// edge, no separators or terminator, and advances by the bytes written.
    /// Fails without a partial write if the window is too small.
    pub fn fill_decimal(&mut self, v: i64) -> Result<()> {
        let mut tmp = [0u8; DECIMAL_MAX];
        let mut cur = Cursor::new(&mut tmp[..]);
        write!(cur, "{v}").expect("an i64 always fits in DECIMAL_MAX bytes");
        let n = cur.position() as usize;
        self.fill(&tmp[..n])
    }

    /// [`fill_le`](Iobuf::fill_le) without the bounds check.
    ///
    /// # Safety
    /// The window must hold at least `P::SIZE` bytes.
    #[inline(always)]
    pub unsafe fn unsafe_fill_le<P: Primitive>(&mut self, v: P) {
        self.unsafe_poke_le(0, v);
        self.raw.unsafe_advance(P::SIZE);
    }

    /// [`fill_be`](Iobuf::fill_be) without the bounds check.
    ///
    /// # Safety
    /// The window must hold at least `P::SIZE` bytes.
    #[inline(always)]
    pub unsafe fn unsafe_fill_be<P: Primitive>(&mut self, v: P) {
        self.unsafe_poke_be(0, v);
        self.raw.unsafe_advance(P::SIZE);
    }

    /// [`fill`](Iobuf::fill) without the bounds check.
    ///
    /// # Safety
    /// The window must hold at least `src.len()` bytes.
    #[inline(always)]
    pub unsafe fn unsafe_fill(&mut self, src: &[u8]) {
        self.raw.unsafe_poke(0, src);
        self.raw.unsafe_advance(src.len());
    }
}
