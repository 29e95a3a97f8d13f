//! BigTIFF integration tests.
//!
//! Tests verify:
//! - The 16-byte header and its offset-size check
//! - 20-byte entries with 8-byte inline values
//! - A BigTIFF file decodes to the same structure as the classic file with
//!   the same logical content

use tiff_inspect::{
    ByteOrder, ErrorKind, IfdRef, ParserOptions, TiffDocument, TiffError, TiffTag, TiffValue,
};

use super::test_utils::{ByteOrderType, IfdBuilder, TiffBuilder};

fn parse(data: Vec<u8>) -> TiffDocument {
    TiffDocument::from_bytes(data, ParserOptions::default()).unwrap()
}

fn sample_tree() -> Vec<IfdBuilder> {
    vec![
        IfdBuilder::image(4096, 2048)
            .ascii(270, "pyramid level 0\0")
            .rational(282, &[(96, 1)])
            .sub_ifd(IfdBuilder::image(2048, 1024))
            .sub_ifd_chain(vec![
                IfdBuilder::image(1024, 512),
                IfdBuilder::image(512, 256),
            ]),
        IfdBuilder::image(256, 128).bytes(700, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    ]
}

fn build(is_bigtiff: bool, byte_order: ByteOrderType) -> Vec<u8> {
    sample_tree()
        .into_iter()
        .fold(
            TiffBuilder::new()
                .with_bigtiff(is_bigtiff)
                .with_byte_order(byte_order),
            |builder, ifd| builder.add_ifd(ifd),
        )
        .build()
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_bigtiff_header() {
    let data = build(true, ByteOrderType::LittleEndian);
    assert_eq!(
        &data[..16],
        &[0x49, 0x49, 0x2B, 0x00, 0x08, 0x00, 0x00, 0x00, 0x10, 0, 0, 0, 0, 0, 0, 0]
    );

    let doc = parse(data);
    assert_eq!(doc.byte_order(), ByteOrder::LittleEndian);
    assert_eq!(doc.version(), 43);
    assert!(doc.is_bigtiff());
    assert_eq!(doc.ifd0_offset(), 16);
    assert_eq!(doc.header_bytes().len(), 16);
    assert!(!doc.has_error());
}

#[test]
fn test_bigtiff_big_endian() {
    let doc = parse(build(true, ByteOrderType::BigEndian));
    assert_eq!(doc.byte_order(), ByteOrder::BigEndian);
    assert_eq!(doc.ifd0_offset(), 16);
    assert_eq!(
        doc.ifds().next().unwrap().dimensions(),
        Some((4096, 2048))
    );
}

#[test]
fn test_bigtiff_bad_offset_size() {
    let mut data = build(true, ByteOrderType::LittleEndian);
    data[4] = 4;

    let err = TiffDocument::from_bytes(data, ParserOptions::default()).unwrap_err();
    assert!(matches!(err, TiffError::InvalidBigTiffOffsetSize(4)));
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_bigtiff_reserved_bytes_ignored() {
    let mut data = build(true, ByteOrderType::LittleEndian);
    data[6] = 0xAB;
    data[7] = 0xCD;

    let doc = parse(data);
    assert_eq!(doc.total_ifd_count(), 5);
}

#[test]
fn test_bigtiff_truncated_header() {
    let data = build(true, ByteOrderType::LittleEndian);
    let err = TiffDocument::from_bytes(data[..12].to_vec(), ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

// =============================================================================
// Entry Tests
// =============================================================================

#[test]
fn test_bigtiff_inline_threshold() {
    let doc = parse(
        TiffBuilder::new()
            .with_bigtiff(true)
            .add_ifd(
                IfdBuilder::new()
                    .short(258, &[8, 8, 8, 8])
                    .long8(324, &[0x1_0000_0000])
                    .long8(325, &[10, 20]),
            )
            .build(),
    );
    let ifd = doc.ifds().next().unwrap();

    // 8 bytes fit inline in BigTIFF
    let bits = ifd.entry_by_id(258).unwrap();
    assert!(bits.is_inline);
    assert_eq!(bits.values, vec![TiffValue::Unsigned(8); 4]);

    let offsets = ifd.entry(TiffTag::TileOffsets).unwrap();
    assert!(offsets.is_inline);
    assert_eq!(offsets.values, vec![TiffValue::Unsigned64(0x1_0000_0000)]);

    let counts = ifd.entry(TiffTag::TileByteCounts).unwrap();
    assert!(!counts.is_inline);
    assert_eq!(
        counts.values,
        vec![TiffValue::Unsigned64(10), TiffValue::Unsigned64(20)]
    );
}

#[test]
fn test_bigtiff_sub_ifds_use_long8_values() {
    let doc = parse(build(true, ByteOrderType::LittleEndian));
    let ifd0 = doc.ifds().next().unwrap();
    let entry = ifd0.entry(TiffTag::SubIFDs).unwrap();

    assert_eq!(entry.count, 2);
    let children: Vec<u64> = ifd0.sub_ifds().map(|s| s.offset()).collect();
    assert_eq!(children.len(), 3);
    assert_eq!(
        entry.values,
        vec![
            TiffValue::Unsigned64(children[0]),
            TiffValue::Unsigned64(children[1])
        ]
    );
}

// =============================================================================
// Classic / BigTIFF Equivalence
// =============================================================================

/// Shape of an IFD tree with offsets and offset-valued tags left out.
#[derive(Debug, PartialEq)]
struct Shape {
    entries: Vec<(u16, u64, Vec<String>)>,
    sub_ifds: Vec<Shape>,
    has_next: bool,
}

fn shape(ifd: IfdRef<'_>) -> Shape {
    Shape {
        entries: ifd
            .entries()
            .iter()
            .filter(|e| e.tag_id != 330)
            .map(|e| (e.tag_id, e.count, e.display_values()))
            .collect(),
        sub_ifds: ifd.sub_ifds().map(shape).collect(),
        has_next: ifd.next_ifd_offset() != 0,
    }
}

#[test]
fn test_classic_and_bigtiff_same_structure() {
    for byte_order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let classic = parse(build(false, byte_order));
        let big = parse(build(true, byte_order));

        assert!(!classic.has_error());
        assert!(!big.has_error());
        assert_eq!(classic.ifd_count(), big.ifd_count());
        assert_eq!(classic.total_ifd_count(), big.total_ifd_count());

        let classic_shapes: Vec<_> = classic.ifds().map(shape).collect();
        let big_shapes: Vec<_> = big.ifds().map(shape).collect();
        assert_eq!(classic_shapes, big_shapes);
    }
}
