//! Tests for metadata construction and plane geometry

use crate::format::errors::FormatError;
use crate::format::metadata::{Axis, AxisType, ImageMetadata, PixelType};
use crate::io::byte_order::ByteOrder;

fn xy(width: u64, height: u64) -> Vec<Axis> {
    vec![Axis::new(AxisType::X, width), Axis::new(AxisType::Y, height)]
}

#[test]
fn test_two_dimensional_geometry() {
    let meta = ImageMetadata::builder("flat")
        .pixel_type(PixelType::Uint16)
        .little_endian(true)
        .axes(xy(10, 4))
        .build()
        .unwrap();

    assert_eq!(meta.width(), 10);
    assert_eq!(meta.height(), 4);
    assert_eq!(meta.bits_per_pixel(), 16);
    assert_eq!(meta.plane_count(), 1);
    assert_eq!(meta.samples_per_pixel(), 1);
    assert_eq!(meta.row_bytes(), 20);
    assert_eq!(meta.plane_bytes(), 80);
    assert_eq!(meta.byte_order(), ByteOrder::LittleEndian);
    assert!(!meta.is_order_certain());
}

#[test]
fn test_interleaved_and_planar_axes() {
    let mut axes = xy(3, 2);
    axes.push(Axis::new(AxisType::Channel, 3));
    axes.push(Axis::new(AxisType::Z, 5));
    axes.push(Axis::new(AxisType::Time, 2));

    let meta = ImageMetadata::builder("stack")
        .pixel_type(PixelType::Uint8)
        .planar_axis_count(2)
        .axes(axes)
        .build()
        .unwrap();

    assert_eq!(meta.interleaved_axes().len(), 1);
    assert_eq!(meta.samples_per_pixel(), 3);
    assert_eq!(meta.plane_count(), 10);
    assert_eq!(meta.row_bytes(), 9);
    assert_eq!(meta.plane_bytes(), 18);
    assert_eq!(meta.axis_length(&AxisType::Z), Some(5));
    assert_eq!(meta.axis_length(&AxisType::Lifetime), None);
}

#[test]
fn test_valid_bits_below_storage_width() {
    let meta = ImageMetadata::builder("12-bit")
        .pixel_type(PixelType::Uint16)
        .bits_per_pixel(12)
        .axes(xy(4, 4))
        .build()
        .unwrap();

    assert_eq!(meta.bits_per_pixel(), 12);
    assert_eq!(meta.row_bytes(), 8);
}

#[test]
fn test_packed_rows_round_up() {
    let meta = ImageMetadata::builder("mask")
        .pixel_type(PixelType::Bit)
        .axes(xy(10, 3))
        .build()
        .unwrap();

    assert_eq!(meta.row_bytes(), 2);
    assert_eq!(meta.plane_bytes(), 6);
}

#[test]
fn test_rejects_invalid_geometry() {
    let missing_type = ImageMetadata::builder("a").axes(xy(1, 1)).build();
    assert!(matches!(missing_type, Err(FormatError::InvalidHeader(_))));

    let one_axis = ImageMetadata::builder("b")
        .pixel_type(PixelType::Uint8)
        .axes(vec![Axis::new(AxisType::X, 4)])
        .build();
    assert!(one_axis.is_err());

    let swapped = ImageMetadata::builder("c")
        .pixel_type(PixelType::Uint8)
        .axes(vec![Axis::new(AxisType::Y, 4), Axis::new(AxisType::X, 4)])
        .build();
    assert!(swapped.is_err());

    let empty = ImageMetadata::builder("d").pixel_type(PixelType::Uint8).axes(xy(0, 4)).build();
    assert!(empty.is_err());

    let too_planar = ImageMetadata::builder("e")
        .pixel_type(PixelType::Uint8)
        .planar_axis_count(1)
        .axes(xy(2, 2))
        .build();
    assert!(too_planar.is_err());

    let too_many_bits = ImageMetadata::builder("f")
        .pixel_type(PixelType::Uint8)
        .bits_per_pixel(9)
        .axes(xy(2, 2))
        .build();
    assert!(too_many_bits.is_err());
}

#[test]
fn test_display_lists_axes() {
    let meta = ImageMetadata::builder("shown")
        .pixel_type(PixelType::Uint8)
        .axes(xy(4, 2))
        .build()
        .unwrap();

    let text = meta.to_string();
    assert!(text.contains("X=4, Y=2"));
    assert!(text.contains("uint8"));
}

#[test]
fn test_rejects_geometry_that_overflows() {
    let huge_row = ImageMetadata::builder("huge row")
        .pixel_type(PixelType::Uint32)
        .axes(xy(1 << 62, 1))
        .build();
    assert!(matches!(huge_row, Err(FormatError::InvalidHeader(_))));

    let huge_plane = ImageMetadata::builder("huge plane")
        .pixel_type(PixelType::Uint8)
        .axes(xy(1 << 32, 1 << 32))
        .build();
    assert!(matches!(huge_plane, Err(FormatError::InvalidHeader(_))));

    let mut axes = xy(1 << 20, 1 << 20);
    axes.push(Axis::new(AxisType::Time, 1 << 30));
    let huge_stack = ImageMetadata::builder("huge stack")
        .pixel_type(PixelType::Uint8)
        .planar_axis_count(1)
        .axes(axes)
        .build();
    assert!(matches!(huge_stack, Err(FormatError::InvalidHeader(_))));

    // Largest sizes still fit
    let wide = ImageMetadata::builder("wide")
        .pixel_type(PixelType::Uint32)
        .axes(xy(1 << 40, 1 << 20))
        .build()
        .unwrap();
    assert_eq!(wide.plane_bytes(), 1 << 62);
}
