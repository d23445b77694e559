//! The blit family: which cursors move, memmove semantics, copies.

use monobuf::{blit, Iobuf};

#[test]
fn blit_moves_neither_cursor() {
    let src: Iobuf = Iobuf::of_str("abcdef");
    let mut dst: Iobuf = Iobuf::new(6);
    blit::blit(&src, 1, &mut dst, 2, 3).unwrap();
    assert_eq!(src.len(), 6);
    assert_eq!(dst.len(), 6);
    assert_eq!(dst.peek_to_vec(2, 3).unwrap(), b"bcd");
}

#[test]
fn consume_advances_the_source_only() {
    let mut src: Iobuf = Iobuf::of_str("abcdef");
    let mut dst: Iobuf = Iobuf::new(6);
    blit::consume(&mut src, &mut dst, 0, 4).unwrap();
    assert_eq!(src.len(), 2);
    assert_eq!(dst.len(), 6);
    assert_eq!(dst.peek_to_vec(0, 4).unwrap(), b"abcd");
}

#[test]
fn fill_advances_the_destination_only() {
    let src: Iobuf = Iobuf::of_str("abcdef");
    let mut dst: Iobuf = Iobuf::new(6);
    blit::fill(&src, 2, &mut dst, 3).unwrap();
    assert_eq!(src.len(), 6);
    assert_eq!(dst.len(), 3);
    dst.flip_lo();
    assert_eq!(dst.consume_to_vec(3).unwrap(), b"cde".to_vec());
}

#[test]
fn consume_and_fill_advances_both() {
    let mut src: Iobuf = Iobuf::of_str("abcdef");
    let mut dst: Iobuf = Iobuf::new(8);
    blit::consume_and_fill(&mut src, &mut dst, 6).unwrap();
    assert_eq!(src.len(), 0);
    assert_eq!(dst.len(), 2);
    dst.flip_lo();
    assert_eq!(dst.consume_to_string(6).unwrap(), "abcdef");
}

#[test]
fn out_of_range_blit_moves_nothing() {
    let mut src: Iobuf = Iobuf::of_str("abc");
    let mut dst: Iobuf = Iobuf::new(2);
    assert!(blit::blit(&src, 0, &mut dst, 0, 3).is_err());
    assert!(blit::consume(&mut src, &mut dst, 0, 4).is_err());
    assert_eq!(src.len(), 3);
    assert_eq!(dst.len(), 2);
    assert_eq!(dst.peek_be::<u16>(0).unwrap(), 0);
}

#[test]
fn overlapping_blit_has_memmove_semantics() {
    let mut t: Iobuf = Iobuf::of_str("ABCDEFGH");
    let alias = t.clone();
    blit::blit(&alias, 0, &mut t, 2, 6).unwrap();
    assert_eq!(t.peek_to_vec(0, 8).unwrap(), b"ABABCDEF");
}

#[test]
fn sub_copies_out_of_shared_storage() {
    let mut src: Iobuf = Iobuf::of_str("abcdef");
    let mut copy = blit::sub(&src, 1, 3).unwrap();
    assert_eq!(src.len(), 6);
    assert_eq!(copy.len(), 3);
    copy.poke_be::<u8>(0, b'X').unwrap();
    // the copy has its own storage
    assert_eq!(src.peek_be::<u8>(1).unwrap(), b'b');

    let taken = blit::consume_sub(&mut src, 2).unwrap();
    assert_eq!(src.len(), 4);
    assert_eq!(taken.peek_to_vec(0, 2).unwrap(), b"ab");
}
