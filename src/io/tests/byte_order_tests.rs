//! Tests for the byte order module

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use proptest::prelude::*;

use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
use crate::io::handle::DataHandle;

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_i64::<LittleEndian>(-2).unwrap();
    buffer.write_f64::<LittleEndian>(1.5).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    assert_eq!(handler.read_i64(&mut cursor).unwrap(), -2);
    assert_eq!(handler.read_f64(&mut cursor).unwrap(), 1.5);
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_i64::<BigEndian>(-2).unwrap();
    buffer.write_f32::<BigEndian>(-0.25).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    assert_eq!(handler.read_i64(&mut cursor).unwrap(), -2);
    assert_eq!(handler.read_f32(&mut cursor).unwrap(), -0.25);
}

#[test]
fn test_handle_order_switch_reinterprets_bytes() {
    let mut handle = DataHandle::from_bytes(vec![0x01, 0x02, 0x01, 0x02]);
    assert_eq!(handle.order(), ByteOrder::BigEndian);
    assert_eq!(handle.read_u16().unwrap(), 0x0102);

    handle.set_order(ByteOrder::LittleEndian);
    assert_eq!(handle.read_u16().unwrap(), 0x0201);
}

#[test]
fn test_short_is_signed() {
    let mut handle = DataHandle::from_bytes(vec![0x40, 0x9C]);
    handle.set_order(ByteOrder::LittleEndian);
    assert_eq!(handle.read_short().unwrap(), 40000u16 as i16);
    handle.seek(0).unwrap();
    assert_eq!(handle.read_u16().unwrap(), 40000);
}

#[test]
fn test_native_order_matches_target() {
    let expected = u16::from_ne_bytes([1, 0]) == 1;
    assert_eq!(ByteOrder::native().is_little_endian(), expected);
}

proptest! {
    #[test]
    fn prop_handle_reads_match_manual_decoding(bytes in any::<[u8; 8]>(), little in any::<bool>()) {
        let order = ByteOrder::from_little_endian(little);
        let mut handle = DataHandle::from_bytes(bytes.to_vec());
        handle.set_order(order);

        let short = [bytes[0], bytes[1]];
        let int = [bytes[2], bytes[3], bytes[4], bytes[5]];
        let (expected_u16, expected_u32) = if little {
            (u16::from_le_bytes(short), u32::from_le_bytes(int))
        } else {
            (u16::from_be_bytes(short), u32::from_be_bytes(int))
        };

        prop_assert_eq!(handle.read_u16().unwrap(), expected_u16);
        prop_assert_eq!(handle.read_u32().unwrap(), expected_u32);
        prop_assert_eq!(handle.offset(), 6);

        handle.seek(0).unwrap();
        prop_assert_eq!(handle.read_short().unwrap(), expected_u16 as i16);
    }
}
