//! Human-readable hex dumps.

use std::fmt::{self, Write};
use std::slice;

use super::Iobuf;
use crate::marker::{Access, Seekability};

/// Which part of the storage [`Iobuf::to_string_hum`] should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The window `[lo, hi)`.
    Window,
    /// The limits `[lo_min, hi_max)`.
    Limits,
    /// The whole backing storage.
    Whole,
}

impl<A: Access, S: Seekability> Iobuf<A, S> {
    /// Renders the chosen region as a multi-line hex + ASCII dump.
    ///
    /// Offsets are absolute positions in the backing storage. The format is
    /// informational and not a stable contract.
    pub fn to_string_hum(&self, region: Region) -> String {
        let (start, end) = match region {
            Region::Window => (self.raw.lo, self.raw.hi),
            Region::Limits => (self.raw.lo_min, self.raw.hi_max),
            Region::Whole => (0, self.raw.buf.len()),
        };
        let bytes = unsafe { slice::from_raw_parts(self.raw.ptr().add(start), end - start) };
        let mut out = String::new();
        dump_bytes(&mut out, bytes, start).expect("fmt::Write on a String cannot fail");
        out
    }
}

impl<A: Access, S: Seekability> fmt::Debug for Iobuf<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} Iobuf: buf_len={}, limits=[{},{}), window=[{},{})",
            A::NAME,
            S::NAME,
            self.raw.buf.len(),
            self.raw.lo_min,
            self.raw.hi_max,
            self.raw.lo,
            self.raw.hi,
        )?;
        if self.is_empty() {
            return f.write_str("<empty window>");
        }
        let bytes = unsafe { slice::from_raw_parts(self.raw.window_ptr(), self.len()) };
        dump_bytes(f, bytes, self.raw.lo)
    }
}

const BYTES_PER_LINE: usize = 16;

fn dump_bytes<W: Write>(w: &mut W, bytes: &[u8], base: usize) -> fmt::Result {
    for (line, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        write!(w, "{:08x}: ", base + line * BYTES_PER_LINE)?;
        for col in 0..BYTES_PER_LINE {
            match chunk.get(col) {
                Some(b) => write!(w, "{b:02x} ")?,
                None => w.write_str("   ")?,
            }
            if col == BYTES_PER_LINE / 2 - 1 {
                w.write_str(" ")?;
            }
        }
        w.write_str(" |")?;
        for &b in chunk {
            let c = if (32..127).contains(&b) { b as char } else { '.' };
            w.write_char(c)?;
        }
        writeln!(w, "|")?;
    }
    Ok(())
}
