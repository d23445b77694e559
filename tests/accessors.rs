//! The accessor matrix: cursor reads and writes, positional reads and
//! writes, decimal, and the unchecked mirrors.

use monobuf::{Error, Iobuf, NoSeek, ReadWrite};

#[test]
fn peek_poke_round_trip_without_cursor_motion() {
    let mut t: Iobuf = Iobuf::new(16);
    t.poke_be::<u64>(0, 0x0102_0304_0506_0708).unwrap();
    t.poke_le::<u16>(8, 0xBEEF).unwrap();
    t.poke_le::<f64>(8, 2.5).unwrap();
    assert_eq!(t.len(), 16);
    assert_eq!(t.peek_be::<u64>(0).unwrap(), 0x0102_0304_0506_0708);
    assert_eq!(t.peek_le::<f64>(8).unwrap(), 2.5);
    assert_eq!(t.len(), 16);
}

#[test]
fn endianness_mismatch_byte_swaps() {
    let mut t: Iobuf = Iobuf::new(4);
    t.fill_le::<u32>(0x0102_0304).unwrap();
    t.flip_lo();
    assert_eq!(t.consume_be::<u32>().unwrap(), 0x0403_0201);
}

#[test]
fn signed_and_float_shapes() {
    let mut t: Iobuf = Iobuf::new(32);
    t.fill_be::<i8>(-5).unwrap();
    t.fill_be::<i64>(i64::MIN).unwrap();
    t.fill_le::<i16>(-300).unwrap();
    t.fill_be::<f32>(-0.25).unwrap();
    t.flip_lo();
    assert_eq!(t.consume_be::<i8>().unwrap(), -5);
    assert_eq!(t.consume_be::<i64>().unwrap(), i64::MIN);
    assert_eq!(t.consume_le::<i16>().unwrap(), -300);
    assert_eq!(t.consume_be::<f32>().unwrap(), -0.25);
    assert!(t.is_empty());
}

#[test]
fn bulk_bytes_and_strings() {
    let mut t: Iobuf = Iobuf::new(32);
    t.fill(b"hello ").unwrap();
    t.fill_str("iobuf").unwrap();
    t.flip_lo();
    let mut head = [0u8; 6];
    t.consume(&mut head).unwrap();
    assert_eq!(&head, b"hello ");
    assert_eq!(t.consume_to_string(5).unwrap(), "iobuf");
    assert!(t.is_empty());
}

#[test]
fn short_window_fails_before_moving_anything() {
    let mut t: Iobuf = Iobuf::new(3);
    assert!(t.fill_be::<u32>(1).is_err());
    assert_eq!(t.len(), 3);
    let mut dst = [0u8; 4];
    assert_eq!(
        t.consume(&mut dst),
        Err(Error::OutOfRange {
            pos: 0,
            len: 4,
            window: 3
        })
    );
    assert_eq!(t.len(), 3);
    assert!(t.consume_to_string(4).is_err());
    assert_eq!(t.len(), 3);
}

#[test]
fn invalid_utf8_leaves_the_cursor() {
    let mut t: Iobuf = Iobuf::of_slice(&[0xFF, 0xFE]);
    assert_eq!(t.consume_to_string(2), Err(Error::BadUtf8));
    assert_eq!(t.len(), 2);
    assert_eq!(t.consume_to_vec(2).unwrap(), vec![0xFF, 0xFE]);
}

#[test]
fn unsafe_mirrors_after_one_consolidated_check() {
    let mut t: Iobuf = Iobuf::of_slice(&[0x12, 0x34, 0x56, 0x78]);
    t.check_range(0, 4).unwrap();
    let (a, b) = unsafe { (t.unsafe_consume_be::<u16>(), t.unsafe_consume_be::<u16>()) };
    assert_eq!((a, b), (0x1234, 0x5678));
    assert!(t.is_empty());
}

#[test]
fn no_seek_view_still_peeks_and_pokes() {
    let t: Iobuf = Iobuf::new(8);
    let mut frozen: Iobuf<ReadWrite, NoSeek> = t.clone().no_seek();
    frozen.poke_be::<u32>(4, 77).unwrap();
    assert_eq!(frozen.peek_be::<u32>(4).unwrap(), 77);
    // and the parent sees the write
    assert_eq!(t.peek_be::<u32>(4).unwrap(), 77);
}

#[test]
fn read_only_view_reads() {
    let t: Iobuf = Iobuf::of_str("abc");
    let mut ro = t.read_only();
    assert_eq!(ro.peek_be::<u8>(2).unwrap(), b'c');
    assert_eq!(ro.consume_be::<u8>().unwrap(), b'a');
    assert_eq!(ro.len(), 2);
}

#[test]
fn decimal_fill_and_poke() {
    let mut t: Iobuf = Iobuf::new(8);
    t.fill_decimal(-1234).unwrap();
    assert_eq!(t.len(), 3);
    t.flip_lo();
    assert_eq!(t.consume_to_string(5).unwrap(), "-1234");

    let mut t: Iobuf = Iobuf::new(4);
    assert!(t.fill_decimal(123456).is_err());
    assert_eq!(t.len(), 4, "failed decimal fill must not advance");
    let n = t.poke_decimal(0, 42).unwrap();
    assert_eq!(n, 2);
    t.advance(n).unwrap();
    assert_eq!(t.len(), 2);
}

#[test]
fn decimal_peek_reports_width() {
    let t: Iobuf = Iobuf::of_str("00123;rest");
    assert_eq!(t.peek_decimal(0).unwrap(), (123, 5));
    assert_eq!(t.peek_decimal(5), Err(Error::BadDecimal));
}

#[test]
fn crc32_of_the_window() {
    // The standard CRC-32 check value.
    let mut t: Iobuf = Iobuf::of_str("123456789");
    assert_eq!(t.crc32(), 0xCBF4_3926);
    t.advance(9).unwrap();
    assert_eq!(t.crc32(), 0);
}

#[test]
fn peek_beyond_the_window_is_rejected() {
    let t: Iobuf = Iobuf::new(4);
    assert!(t.peek_be::<u8>(4).is_err());
    assert!(t.peek_to_vec(2, 3).is_err());
    assert!(t.check_range(usize::MAX, 2).is_err());
}
