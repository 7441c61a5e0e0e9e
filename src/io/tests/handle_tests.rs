//! Cursor, bounds and lifecycle behaviour of `DataHandle`

use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::config::DecodeConfig;
use crate::format::errors::FormatError;
use crate::io::handle::{AccessMode, DataHandle};
use crate::io::provider::{MemoryProvider, ReaderProvider};

fn counting(len: u8) -> Vec<u8> {
    (0..len).collect()
}

#[test]
fn test_seek_to_end_is_allowed() {
    let mut handle = DataHandle::from_bytes(counting(10));
    handle.seek(10).unwrap();
    assert_eq!(handle.offset(), 10);
    assert_eq!(handle.remaining().unwrap(), Some(0));
}

#[test]
fn test_seek_past_end_fails_for_read_only() {
    let mut handle = DataHandle::from_bytes(counting(10));
    handle.seek(3).unwrap();
    assert!(matches!(handle.seek(11), Err(FormatError::OutOfBounds(_))));
    assert_eq!(handle.offset(), 3);
}

#[test]
fn test_read_fully_short_leaves_cursor() {
    let mut handle = DataHandle::from_bytes(counting(10));
    handle.seek(6).unwrap();
    let mut out = [0u8; 8];
    match handle.read_fully(&mut out) {
        Err(FormatError::TruncatedRead { offset, requested }) => {
            assert_eq!(offset, 6);
            assert_eq!(requested, 8);
        }
        other => panic!("expected a truncated read, got {:?}", other),
    }
    assert_eq!(handle.offset(), 6);
}

#[test]
fn test_read_available_reports_short_count() {
    let mut handle = DataHandle::from_bytes(counting(10));
    handle.seek(6).unwrap();
    let mut out = [0u8; 8];
    assert_eq!(handle.read_available(&mut out).unwrap(), 4);
    assert_eq!(&out[..4], &[6, 7, 8, 9]);
    assert_eq!(handle.offset(), 10);
}

#[test]
fn test_multi_byte_read_at_end_is_truncated() {
    let mut handle = DataHandle::from_bytes(counting(3));
    handle.seek(2).unwrap();
    assert!(matches!(handle.read_int(), Err(FormatError::TruncatedRead { .. })));
    assert_eq!(handle.offset(), 2);
    assert_eq!(handle.read_byte().unwrap(), 2);
}

#[test]
fn test_reads_larger_than_window() {
    let data: Vec<u8> = (0..=255).collect();
    let config = DecodeConfig::default().with_buffer_size(7);
    let mut handle = DataHandle::new(Box::new(MemoryProvider::new(data.clone())), &config);

    handle.seek(3).unwrap();
    assert_eq!(handle.read_bytes(2).unwrap(), vec![3, 4]);
    let bulk = handle.read_bytes(100).unwrap();
    assert_eq!(bulk, data[5..105].to_vec());
    assert_eq!(handle.read_byte().unwrap(), 105);
}

#[test]
fn test_seek_back_does_not_serve_stale_bytes() {
    let config = DecodeConfig::default().with_buffer_size(4);
    let mut handle = DataHandle::new(Box::new(MemoryProvider::new(counting(20))), &config);

    handle.seek(12).unwrap();
    assert_eq!(handle.read_byte().unwrap(), 12);
    handle.seek(1).unwrap();
    assert_eq!(handle.read_bytes(3).unwrap(), vec![1, 2, 3]);
    handle.seek(13).unwrap();
    assert_eq!(handle.read_byte().unwrap(), 13);
}

#[test]
fn test_read_string_drops_padding() {
    let mut handle = DataHandle::from_bytes(b"KONTRON\0\0\0rest".to_vec());
    assert_eq!(handle.read_string(10).unwrap(), "KONTRON");
    assert_eq!(handle.offset(), 10);
}

#[test]
fn test_closed_handle_rejects_everything() {
    let mut handle = DataHandle::from_bytes(counting(4));
    handle.close().unwrap();

    assert!(handle.is_closed());
    assert!(matches!(handle.read_byte(), Err(FormatError::ClosedHandle)));
    assert!(matches!(handle.seek(0), Err(FormatError::ClosedHandle)));
    assert!(matches!(handle.read_line(), Err(FormatError::ClosedHandle)));
    assert!(matches!(handle.close(), Err(FormatError::ClosedHandle)));
}

#[test]
fn test_read_only_handle_rejects_writes() {
    let mut handle = DataHandle::from_bytes(counting(4));
    assert_eq!(handle.mode(), AccessMode::Read);
    assert!(handle.write_bytes(&[1]).is_err());
}

#[test]
fn test_writable_handle_grows() {
    let config = DecodeConfig::default();
    let mut handle = DataHandle::new(Box::new(MemoryProvider::writable(vec![9, 9])), &config);
    assert_eq!(handle.mode(), AccessMode::ReadWrite);

    // Cache the original bytes, then overwrite past the end
    assert_eq!(handle.read_byte().unwrap(), 9);
    handle.seek(4).unwrap();
    handle.write_u16(0xABCD).unwrap();

    assert_eq!(handle.length().unwrap(), Some(6));
    handle.seek(0).unwrap();
    assert_eq!(handle.read_bytes(6).unwrap(), vec![9, 9, 0, 0, 0xAB, 0xCD]);
}

#[test]
fn test_stream_length_unknown_until_exhausted() {
    let config = DecodeConfig::default().with_buffer_size(2);
    let mut handle = DataHandle::from_stream(Cursor::new(counting(6)), "stream", &config);

    assert_eq!(handle.length().unwrap(), None);
    // Unknown length: seeking ahead succeeds and the read reports the truncation
    handle.seek(50).unwrap();
    assert!(matches!(handle.read_byte(), Err(FormatError::TruncatedRead { .. })));

    handle.seek(5).unwrap();
    assert_eq!(handle.read_byte().unwrap(), 5);
    assert_eq!(handle.length().unwrap(), Some(6));
    assert!(matches!(handle.seek(7), Err(FormatError::OutOfBounds(_))));
}

#[test]
fn test_stream_seek_near_offset_limit_is_truncated() {
    let config = DecodeConfig::default().with_buffer_size(4);
    let mut handle = DataHandle::from_stream(Cursor::new(counting(6)), "stream", &config);

    handle.seek(u64::MAX - 1).unwrap();
    assert!(matches!(handle.read_byte(), Err(FormatError::TruncatedRead { .. })));
    let mut bulk = [0u8; 32];
    assert_eq!(handle.read_available(&mut bulk).unwrap(), 0);

    handle.seek(2).unwrap();
    assert_eq!(handle.read_byte().unwrap(), 2);
}

#[test]
fn test_memory_write_near_offset_limit_fails() {
    let mut handle = DataHandle::new(Box::new(MemoryProvider::writable(vec![1, 2])), &DecodeConfig::default());

    handle.seek(u64::MAX - 1).unwrap();
    assert!(handle.write_bytes(&[0u8; 4]).is_err());
    assert_eq!(handle.offset(), u64::MAX - 1);
    assert_eq!(handle.length().unwrap(), Some(2));
}

#[test]
fn test_std_read_and_seek() {
    let provider = ReaderProvider::new(Cursor::new(counting(10)), "cursor");
    let mut handle = DataHandle::new(Box::new(provider), &DecodeConfig::default());

    assert_eq!(Seek::seek(&mut handle, SeekFrom::End(-3)).unwrap(), 7);
    let mut rest = Vec::new();
    handle.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, vec![7, 8, 9]);

    assert_eq!(Seek::seek(&mut handle, SeekFrom::Current(-5)).unwrap(), 5);
    assert!(Seek::seek(&mut handle, SeekFrom::Current(-6)).is_err());
    assert_eq!(handle.offset(), 5);
}
