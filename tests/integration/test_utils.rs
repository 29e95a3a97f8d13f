//! Test utilities for integration tests.
//!
//! Provides a builder for synthetic TIFF and BigTIFF files with arbitrary
//! next-IFD chains, Sub-IFD trees and out-of-line values, plus a range
//! reader that records every request.

use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tiff_inspect::error::IoError;
use tiff_inspect::io::RangeReader;

// =============================================================================
// Field Type Codes
// =============================================================================

pub const BYTE: u16 = 1;
pub const ASCII: u16 = 2;
pub const SHORT: u16 = 3;
pub const LONG: u16 = 4;
pub const RATIONAL: u16 = 5;
pub const SRATIONAL: u16 = 10;
pub const DOUBLE: u16 = 12;
pub const LONG8: u16 = 16;

// =============================================================================
// Mock Range Reader with Request Tracking
// =============================================================================

/// A range reader over a buffer that tracks all read requests.
pub struct TrackingMockReader {
    data: Bytes,
    request_count: AtomicUsize,
    requests: Mutex<Vec<(u64, usize)>>,
}

impl TrackingMockReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(data),
            request_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn get_requests(&self) -> Vec<(u64, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

impl RangeReader for TrackingMockReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((offset, len));

        let end = offset.checked_add(len as u64);
        match end {
            Some(end) if end <= self.data.len() as u64 => {
                Ok(self.data.slice(offset as usize..end as usize))
            }
            _ => Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.data.len() as u64,
            }),
        }
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        "tracking-mock"
    }
}

// =============================================================================
// TIFF File Builders
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

/// Builder for creating test TIFF files.
///
/// IFDs are laid out depth-first right after the header: each directory
/// table, then its out-of-line values, then its Sub-IFD chains, then the
/// next directory of its own chain.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    is_bigtiff: bool,
    ifds: Vec<IfdBuilder>,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            is_bigtiff: false,
            ifds: Vec::new(),
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_bigtiff(mut self, is_bigtiff: bool) -> Self {
        self.is_bigtiff = is_bigtiff;
        self
    }

    /// Append an IFD to the top-level chain.
    pub fn add_ifd(mut self, ifd: IfdBuilder) -> Self {
        self.ifds.push(ifd);
        self
    }

    /// Build the TIFF file data.
    pub fn build(&self) -> Vec<u8> {
        let mut writer = Writer {
            data: Vec::new(),
            byte_order: self.byte_order,
            is_bigtiff: self.is_bigtiff,
        };

        match self.byte_order {
            ByteOrderType::LittleEndian => writer.data.extend(b"II"),
            ByteOrderType::BigEndian => writer.data.extend(b"MM"),
        }
        if self.is_bigtiff {
            writer.push_uint(43, 2);
            writer.push_uint(8, 2);
            writer.push_uint(0, 2);
        } else {
            writer.push_uint(42, 2);
        }

        let first_ifd_pos = writer.data.len();
        writer.push_uint(0, writer.offset_size());

        let first_ifd = writer.write_chain(&self.ifds);
        writer.patch_uint(first_ifd_pos, first_ifd, writer.offset_size());

        writer.data
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A value to store in an entry; encoded in the file's byte order at build time.
#[derive(Clone, Debug)]
enum EntryValue {
    Bytes(Vec<u8>),
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Long8(Vec<u64>),
    Rational(Vec<(u32, u32)>),
    SRational(Vec<(i32, i32)>),
    Double(Vec<f64>),
    /// Type code, count and value-or-offset field written as-is
    Raw { field_type: u16, count: u64, field: u64 },
}

#[derive(Clone, Debug)]
struct EntrySpec {
    tag: u16,
    value: EntryValue,
}

/// Builder for one IFD.
#[derive(Clone, Debug, Default)]
pub struct IfdBuilder {
    entries: Vec<EntrySpec>,
    sub_ifds: Vec<Vec<IfdBuilder>>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// An image IFD with width, length and a few common tags.
    pub fn image(width: u32, height: u32) -> Self {
        Self::new()
            .long(256, &[width])
            .long(257, &[height])
            .short(258, &[8, 8, 8])
            .short(259, &[1])
            .short(262, &[2])
            .short(277, &[3])
    }

    pub fn bytes(self, tag: u16, values: &[u8]) -> Self {
        self.entry(tag, EntryValue::Bytes(values.to_vec()))
    }

    /// ASCII entry; the text is stored verbatim, add `\0` terminators yourself.
    pub fn ascii(self, tag: u16, text: &str) -> Self {
        self.entry(tag, EntryValue::Ascii(text.as_bytes().to_vec()))
    }

    pub fn short(self, tag: u16, values: &[u16]) -> Self {
        self.entry(tag, EntryValue::Short(values.to_vec()))
    }

    pub fn long(self, tag: u16, values: &[u32]) -> Self {
        self.entry(tag, EntryValue::Long(values.to_vec()))
    }

    pub fn long8(self, tag: u16, values: &[u64]) -> Self {
        self.entry(tag, EntryValue::Long8(values.to_vec()))
    }

    pub fn rational(self, tag: u16, values: &[(u32, u32)]) -> Self {
        self.entry(tag, EntryValue::Rational(values.to_vec()))
    }

    pub fn srational(self, tag: u16, values: &[(i32, i32)]) -> Self {
        self.entry(tag, EntryValue::SRational(values.to_vec()))
    }

    pub fn double(self, tag: u16, values: &[f64]) -> Self {
        self.entry(tag, EntryValue::Double(values.to_vec()))
    }

    /// Entry written exactly as given, e.g. an unknown type or a dangling offset.
    pub fn raw(self, tag: u16, field_type: u16, count: u64, field: u64) -> Self {
        self.entry(
            tag,
            EntryValue::Raw {
                field_type,
                count,
                field,
            },
        )
    }

    /// Add a single Sub-IFD. A SubIFDs entry (tag 330) is emitted for all Sub-IFDs.
    pub fn sub_ifd(self, ifd: IfdBuilder) -> Self {
        self.sub_ifd_chain(vec![ifd])
    }

    /// Add a Sub-IFD that continues into a next-IFD chain of its own.
    pub fn sub_ifd_chain(mut self, chain: Vec<IfdBuilder>) -> Self {
        self.sub_ifds.push(chain);
        self
    }

    fn entry(mut self, tag: u16, value: EntryValue) -> Self {
        self.entries.push(EntrySpec { tag, value });
        self
    }
}

struct Writer {
    data: Vec<u8>,
    byte_order: ByteOrderType,
    is_bigtiff: bool,
}

impl Writer {
    fn offset_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            4
        }
    }

    fn entry_size(&self) -> usize {
        if self.is_bigtiff {
            20
        } else {
            12
        }
    }

    fn encode_uint(&self, value: u64, size: usize) -> Vec<u8> {
        let bytes = match self.byte_order {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        };
        match self.byte_order {
            ByteOrderType::LittleEndian => bytes[..size].to_vec(),
            ByteOrderType::BigEndian => bytes[8 - size..].to_vec(),
        }
    }

    fn push_uint(&mut self, value: u64, size: usize) {
        let bytes = self.encode_uint(value, size);
        self.data.extend(bytes);
    }

    fn patch_uint(&mut self, pos: usize, value: u64, size: usize) {
        let bytes = self.encode_uint(value, size);
        self.data[pos..pos + size].copy_from_slice(&bytes);
    }

    fn align(&mut self) {
        if self.data.len() % 2 == 1 {
            self.data.push(0);
        }
    }

    /// Type code, count and value bytes for an entry.
    fn encode_value(&self, value: &EntryValue) -> (u16, u64, Vec<u8>) {
        let mut out = Vec::new();
        match value {
            EntryValue::Bytes(v) => (BYTE, v.len() as u64, v.clone()),
            EntryValue::Ascii(v) => (ASCII, v.len() as u64, v.clone()),
            EntryValue::Short(v) => {
                v.iter().for_each(|&x| out.extend(self.encode_uint(x as u64, 2)));
                (SHORT, v.len() as u64, out)
            }
            EntryValue::Long(v) => {
                v.iter().for_each(|&x| out.extend(self.encode_uint(x as u64, 4)));
                (LONG, v.len() as u64, out)
            }
            EntryValue::Long8(v) => {
                v.iter().for_each(|&x| out.extend(self.encode_uint(x, 8)));
                (LONG8, v.len() as u64, out)
            }
            EntryValue::Rational(v) => {
                for &(n, d) in v {
                    out.extend(self.encode_uint(n as u64, 4));
                    out.extend(self.encode_uint(d as u64, 4));
                }
                (RATIONAL, v.len() as u64, out)
            }
            EntryValue::SRational(v) => {
                for &(n, d) in v {
                    out.extend(self.encode_uint(n as u32 as u64, 4));
                    out.extend(self.encode_uint(d as u32 as u64, 4));
                }
                (SRATIONAL, v.len() as u64, out)
            }
            EntryValue::Double(v) => {
                v.iter()
                    .for_each(|&x| out.extend(self.encode_uint(x.to_bits(), 8)));
                (DOUBLE, v.len() as u64, out)
            }
            EntryValue::Raw { .. } => unreachable!("raw entries are written directly"),
        }
    }

    /// Write a chain of IFDs and return the offset of the first one (0 if empty).
    fn write_chain(&mut self, chain: &[IfdBuilder]) -> u64 {
        let mut first = 0;
        let mut previous_next_pos: Option<usize> = None;

        for ifd in chain {
            let (offset, next_pos) = self.write_ifd(ifd);
            match previous_next_pos {
                Some(pos) => self.patch_uint(pos, offset, self.offset_size()),
                None => first = offset,
            }
            previous_next_pos = Some(next_pos);
        }
        first
    }

    /// Write one IFD with its values and Sub-IFDs.
    ///
    /// Returns the IFD offset and the position of its next-IFD field.
    fn write_ifd(&mut self, ifd: &IfdBuilder) -> (u64, usize) {
        self.align();
        let offset = self.data.len() as u64;
        let inline_size = self.offset_size();
        let has_sub_ifds = !ifd.sub_ifds.is_empty();
        let entry_count = ifd.entries.len() + usize::from(has_sub_ifds);

        let count_size = if self.is_bigtiff { 8 } else { 2 };
        self.push_uint(entry_count as u64, count_size);
        let table_pos = self.data.len();
        self.data
            .resize(table_pos + entry_count * self.entry_size() + inline_size, 0);
        let next_pos = table_pos + entry_count * self.entry_size();

        let sub_ifd_spec = EntrySpec {
            tag: 330,
            value: if self.is_bigtiff {
                EntryValue::Long8(vec![0; ifd.sub_ifds.len()])
            } else {
                EntryValue::Long(vec![0; ifd.sub_ifds.len()])
            },
        };
        let mut specs: Vec<&EntrySpec> = ifd.entries.iter().collect();
        if has_sub_ifds {
            specs.push(&sub_ifd_spec);
        }

        // Where the SubIFDs offsets go once the children are written
        let mut sub_ifd_values_pos = None;

        for (i, spec) in specs.iter().enumerate() {
            let pos = table_pos + i * self.entry_size();
            self.patch_uint(pos, spec.tag as u64, 2);

            let count_size = if self.is_bigtiff { 8 } else { 4 };
            let field_pos = pos + 4 + count_size;

            if let EntryValue::Raw {
                field_type,
                count,
                field,
            } = spec.value
            {
                self.patch_uint(pos + 2, field_type as u64, 2);
                self.patch_uint(pos + 4, count, count_size);
                self.patch_uint(field_pos, field, inline_size);
                continue;
            }

            let (field_type, count, bytes) = self.encode_value(&spec.value);
            self.patch_uint(pos + 2, field_type as u64, 2);
            self.patch_uint(pos + 4, count, count_size);

            let value_pos = if bytes.len() <= inline_size {
                self.data[field_pos..field_pos + bytes.len()].copy_from_slice(&bytes);
                field_pos
            } else {
                self.align();
                let value_offset = self.data.len();
                self.data.extend(&bytes);
                self.patch_uint(field_pos, value_offset as u64, inline_size);
                value_offset
            };
            if has_sub_ifds && i == ifd.entries.len() {
                sub_ifd_values_pos = Some(value_pos);
            }
        }

        if let Some(values_pos) = sub_ifd_values_pos {
            let width = inline_size;
            for (i, chain) in ifd.sub_ifds.iter().enumerate() {
                let child = self.write_chain(chain);
                self.patch_uint(values_pos + i * width, child, width);
            }
        }

        (offset, next_pos)
    }
}

// =============================================================================
// Patching Helpers
// =============================================================================

/// Overwrite a little-endian u32 at `pos`.
pub fn patch_u32_le(data: &mut [u8], pos: usize, value: u32) {
    data[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}

/// Position of the next-IFD field of a classic IFD at `ifd_offset` with `entries` entries.
pub fn classic_next_pos(ifd_offset: usize, entries: usize) -> usize {
    ifd_offset + 2 + entries * 12
}

/// Append a little-endian classic IFD with one inline SHORT entry; returns its offset.
pub fn append_classic_ifd(data: &mut Vec<u8>, tag: u16, value: u16) -> u64 {
    if data.len() % 2 == 1 {
        data.push(0);
    }
    let offset = data.len() as u64;
    data.extend(1u16.to_le_bytes());
    data.extend(tag.to_le_bytes());
    data.extend(SHORT.to_le_bytes());
    data.extend(1u32.to_le_bytes());
    data.extend(value.to_le_bytes());
    data.extend([0, 0]);
    data.extend(0u32.to_le_bytes());
    offset
}
