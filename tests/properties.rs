//! Randomized operation sequences must preserve the geometry invariant
//! `0 <= lo_min <= lo <= hi <= hi_max <= buf_len` and the monotonicity of
//! the limits.

use monobuf::{Iobuf, Seek};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Advance(usize),
    Resize(usize),
    FlipLo,
    FlipHi,
    Narrow,
    NarrowLo,
    NarrowHi,
    Rewind,
    Reset,
    Compact,
    FillU32(u32),
    ConsumeU16,
    PokeU8 { pos: usize, v: u8 },
    Sub { pos: usize, len: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..40).prop_map(Op::Advance),
        (0usize..40).prop_map(Op::Resize),
        Just(Op::FlipLo),
        Just(Op::FlipHi),
        Just(Op::Narrow),
        Just(Op::NarrowLo),
        Just(Op::NarrowHi),
        Just(Op::Rewind),
        Just(Op::Reset),
        Just(Op::Compact),
        any::<u32>().prop_map(Op::FillU32),
        Just(Op::ConsumeU16),
        ((0usize..40), any::<u8>()).prop_map(|(pos, v)| Op::PokeU8 { pos, v }),
        ((0usize..40), (0usize..40)).prop_map(|(pos, len)| Op::Sub { pos, len }),
    ]
}

const BUF: usize = 32;

proptest! {
    #[test]
    fn invariants_survive_arbitrary_ops(ops in proptest::collection::vec(op(), 0..64)) {
        let mut t: Iobuf = Iobuf::new(BUF);
        let mut floor = 0usize;
        let mut ceil = BUF;
        for op in ops {
            match op {
                Op::Advance(n) => { let _ = t.advance(n); }
                Op::Resize(n) => { let _ = t.resize(n); }
                Op::FlipLo => t.flip_lo(),
                Op::FlipHi => t.flip_hi(),
                Op::Narrow => t.narrow(),
                Op::NarrowLo => t.narrow_lo(),
                Op::NarrowHi => t.narrow_hi(),
                Op::Rewind => t.rewind(),
                Op::Reset => t.reset(),
                Op::Compact => t.compact(),
                Op::FillU32(v) => { let _ = t.fill_be::<u32>(v); }
                Op::ConsumeU16 => { let _ = t.consume_be::<u16>(); }
                Op::PokeU8 { pos, v } => { let _ = t.poke_be::<u8>(pos, v); }
                Op::Sub { pos, len } => {
                    if let Ok(sub) = t.sub_shared::<Seek>(pos, len) {
                        let e = sub.expert();
                        prop_assert!(e.lo_min() <= e.lo() && e.lo() <= e.hi());
                        prop_assert!(e.hi() <= e.hi_max() && e.hi_max() <= e.buf_len());
                    }
                }
            }

            let e = t.expert();
            let (lo_min, lo, hi, hi_max) = (e.lo_min(), e.lo(), e.hi(), e.hi_max());
            let buf_len = e.buf_len();
            prop_assert!(lo_min <= lo && lo <= hi && hi <= hi_max && hi_max <= buf_len);
            // limits only ever shrink
            prop_assert!(lo_min >= floor && hi_max <= ceil);
            floor = lo_min;
            ceil = hi_max;
            prop_assert_eq!(t.len(), hi - lo);
            prop_assert_eq!(t.capacity(), hi_max - lo_min);
        }
    }

    #[test]
    fn compact_preserves_window_bytes(skip in 0usize..8, keep in 0usize..8) {
        let content: Vec<u8> = (0u8..16).collect();
        let mut t: Iobuf = Iobuf::of_slice(&content);
        prop_assume!(skip + keep <= 16);
        t.advance(skip).unwrap();
        t.resize(keep).unwrap();
        let expected = t.peek_to_vec(0, keep).unwrap();
        t.compact();
        t.rewind();
        prop_assert_eq!(t.peek_to_vec(0, keep).unwrap(), expected);
    }
}
