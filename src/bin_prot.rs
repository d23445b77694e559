//! Length-prefixed binary framing.
//!
//! The iobuf layer does not define a serialization format. It defines the
//! two traits below as the contract an encoding registry must satisfy, and
//! contributes exactly one thing on top: a 4-byte little-endian length
//! prefix, written by [`Iobuf::fill_bin_prot`] and consumed by
//! [`Iobuf::consume_bin_prot`].
//!
//! Note that this 4-byte prefix is deliberately distinct from the 8-byte
//! prefix used by framed *file* formats built above this crate. The two are
//! incompatible on the wire and are not reconciled here.

use crate::error::{Error, Result};
use crate::marker::{Access, ReadWrite, Seek};
use crate::Iobuf;

/// Size of the little-endian length prefix.
pub const PREFIX_LEN: usize = 4;

/// A value that knows its own framed encoding.
pub trait BinProtWrite {
    /// Exact length of the encoding in bytes.
    fn bin_prot_size(&self) -> usize;

    /// Encodes `self` into `dst`, which holds exactly
    /// [`bin_prot_size`](Self::bin_prot_size) bytes. Returns the number of
    /// bytes written, which must equal the promised size.
    fn bin_prot_write(&self, dst: &mut [u8]) -> usize;
}

/// A value decodable from its framed encoding.
pub trait BinProtRead: Sized {
    /// Decodes one value from the front of `src`, returning it together
    /// with the number of bytes consumed.
    fn bin_prot_read(src: &[u8]) -> Result<(Self, usize)>;
}

impl Iobuf<ReadWrite, Seek> {
    /// Writes a 4-byte little-endian length prefix followed by `v`'s
    /// encoding, advancing by the total. Fails without a partial write if
    /// the window cannot hold prefix plus payload.
    pub fn fill_bin_prot<T: BinProtWrite>(&mut self, v: &T) -> Result<()> {
        let size = v.bin_prot_size();
        let prefix = u32::try_from(size).map_err(|_| Error::BadFrame)?;
        let total = PREFIX_LEN + size;
        self.check_range(0, total)?;
        unsafe {
            self.unsafe_poke_le::<u32>(0, prefix);
            let written = v.bin_prot_write(self.raw.window_bytes_mut(PREFIX_LEN, size));
            debug_assert_eq!(written, size);
            self.raw.unsafe_advance(total);
        }
        Ok(())
    }
}

impl<A: Access> Iobuf<A, Seek> {
    /// Reads a 4-byte length prefix, then that many payload bytes as a `T`,
    /// advancing by the total.
    ///
    /// An incomplete frame is reported as
    /// [`Error::TruncatedFrame`](crate::Error::TruncatedFrame) with the
    /// window untouched, so the caller can retry after more bytes arrive.
    pub fn consume_bin_prot<T: BinProtRead>(&mut self) -> Result<T> {
        let have = self.len();
        if have < PREFIX_LEN {
            return Err(Error::TruncatedFrame {
                need: PREFIX_LEN,
                have,
            });
        }
        let size = unsafe { self.unsafe_peek_le::<u32>(0) } as usize;
        let total = PREFIX_LEN + size;
        if have < total {
            return Err(Error::TruncatedFrame { need: total, have });
        }
        let (value, used) = T::bin_prot_read(unsafe { self.raw.window_bytes(PREFIX_LEN, size) })?;
        if used != size {
            return Err(Error::BadFrame);
        }
        unsafe { self.raw.unsafe_advance(total) };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Pair {
        x: u32,
        y: u32,
    }

    impl BinProtWrite for Pair {
        fn bin_prot_size(&self) -> usize {
            8
        }

        fn bin_prot_write(&self, dst: &mut [u8]) -> usize {
            dst[..4].copy_from_slice(&self.x.to_le_bytes());
            dst[4..8].copy_from_slice(&self.y.to_le_bytes());
            8
        }
    }

    impl BinProtRead for Pair {
        fn bin_prot_read(src: &[u8]) -> Result<(Self, usize)> {
            if src.len() < 8 {
                return Err(Error::BadFrame);
            }
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&src[..4]);
            let x = u32::from_le_bytes(raw);
            raw.copy_from_slice(&src[4..8]);
            let y = u32::from_le_bytes(raw);
            Ok((Pair { x, y }, 8))
        }
    }

    #[test]
    fn frame_round_trips() {
        let v = Pair { x: 7, y: 0xFFFF_0001 };
        let mut t: Iobuf = Iobuf::new(64);
        t.fill_bin_prot(&v).unwrap();
        t.flip_lo();
        assert_eq!(t.len(), PREFIX_LEN + 8);
        assert_eq!(t.consume_bin_prot::<Pair>().unwrap(), v);
        assert!(t.is_empty());
    }

    #[test]
    fn truncated_frame_leaves_window_untouched() {
        let v = Pair { x: 1, y: 2 };
        let mut t: Iobuf = Iobuf::new(64);
        t.fill_bin_prot(&v).unwrap();
        t.flip_lo();
        // Chop the window short of the full frame.
        t.resize(PREFIX_LEN + 3).unwrap();
        assert_eq!(
            t.consume_bin_prot::<Pair>(),
            Err(Error::TruncatedFrame {
                need: PREFIX_LEN + 8,
                have: PREFIX_LEN + 3
            })
        );
        assert_eq!(t.len(), PREFIX_LEN + 3);
        // Re-expose the rest and retry.
        t.resize(PREFIX_LEN + 8).unwrap();
        assert_eq!(t.consume_bin_prot::<Pair>().unwrap(), v);
    }

    #[test]
    fn window_too_small_for_fill() {
        let mut t: Iobuf = Iobuf::new(8);
        let v = Pair { x: 1, y: 2 };
        assert!(t.fill_bin_prot(&v).is_err());
        assert_eq!(t.len(), 8);
    }
}
