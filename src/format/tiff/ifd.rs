//! IFD (Image File Directory) reading and traversal.
//!
//! # IFD Structure
//!
//! ```text
//! Classic TIFF                     BigTIFF
//! u16  entry count                 u64  entry count
//! 12 * count entries               20 * count entries
//! u32  next IFD offset             u64  next IFD offset
//!
//! Entry: u16 tag, u16 type, u32/u64 count, 4/8 bytes value-or-offset
//! ```
//!
//! Values whose total size fits in the value-or-offset field are stored
//! inline; larger values live elsewhere and the field holds their offset.
//!
//! # Traversal
//!
//! Directories form a tree through the SubIFDs tag and sibling chains through
//! the next-IFD offset. The walk is depth-first: an IFD's Sub-IFDs (and their
//! own chains) are read before its next sibling. Offsets come straight from
//! the file, so every directory offset is visited at most once and both the
//! number of directories and the number of decoded values are capped.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use bytes::Bytes;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{IoError, TiffError};
use crate::io::RangeReader;

use super::document::ParserOptions;
use super::parser::TiffHeader;
use super::tags::{self, FieldType, TiffTag};
use super::values::{decode_values, TiffValue};

// =============================================================================
// IfdEntry
// =============================================================================

/// One directory entry, with its value decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct IfdEntry {
    /// Tag number
    pub tag_id: u16,

    /// Parsed field type, `None` for unknown type codes
    pub field_type: Option<FieldType>,

    /// Field type exactly as stored
    pub field_type_raw: u16,

    /// Number of elements (not bytes)
    pub count: u64,

    /// The raw value-or-offset field (4 bytes classic, 8 bytes BigTIFF)
    pub value_offset_bytes: Bytes,

    /// Whether the value is stored in `value_offset_bytes` itself
    pub is_inline: bool,

    /// Decoded values; empty for unknown types or unreadable values
    pub values: Vec<TiffValue>,
}

impl IfdEntry {
    /// Parse one entry record. `bytes` must hold `header.ifd_entry_size()` bytes.
    pub fn parse(bytes: &[u8], header: &TiffHeader) -> Self {
        let byte_order = header.byte_order;
        let tag_id = byte_order.read_u16(&bytes[0..2]);
        let field_type_raw = byte_order.read_u16(&bytes[2..4]);
        let field_type = FieldType::from_u16(field_type_raw);

        let (count, value_start) = if header.is_bigtiff() {
            (byte_order.read_u64(&bytes[4..12]), 12)
        } else {
            (byte_order.read_u32(&bytes[4..8]) as u64, 8)
        };
        let value_offset_bytes =
            Bytes::copy_from_slice(&bytes[value_start..value_start + header.value_offset_size()]);

        // Unknown types have no size, so there is nothing to fetch
        let is_inline = field_type
            .map(|t| t.fits_inline(count, header.is_bigtiff()))
            .unwrap_or(true);

        IfdEntry {
            tag_id,
            field_type,
            field_type_raw,
            count,
            value_offset_bytes,
            is_inline,
            values: Vec::new(),
        }
    }

    /// Number of values this entry decodes to, 0 for unknown types.
    ///
    /// ASCII counts bytes, not strings.
    pub fn decoded_len(&self) -> u64 {
        self.field_type
            .map_or(0, |t| self.count.saturating_mul(t.values_per_element()))
    }

    /// Total byte size of the value block.
    ///
    /// `Some(0)` for unknown types, `None` if the size overflows.
    pub fn value_byte_size(&self) -> Option<u64> {
        (tags::type_size(self.field_type_raw) as u64).checked_mul(self.count)
    }

    /// The value-or-offset field read as an offset.
    pub fn value_offset(&self, header: &TiffHeader) -> u64 {
        header.read_offset(&self.value_offset_bytes)
    }

    /// An entry with a zero count is unset.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.count != 0
    }

    /// The known tag, if any.
    pub fn tag(&self) -> Option<TiffTag> {
        TiffTag::from_u16(self.tag_id)
    }

    pub fn tag_name(&self) -> Cow<'static, str> {
        tags::tag_name(self.tag_id)
    }

    pub fn type_name(&self) -> Cow<'static, str> {
        tags::type_name(self.field_type_raw)
    }

    /// First value as an unsigned integer.
    pub fn first_u64(&self) -> Option<u64> {
        self.values.first().and_then(TiffValue::as_u64)
    }

    /// Names of enumerated values, e.g. `["JPEG"]` for Compression = 7.
    ///
    /// Empty if the tag is not enumerated. Values without a name are skipped.
    pub fn value_names(&self) -> Vec<&'static str> {
        self.values
            .iter()
            .filter_map(TiffValue::as_u64)
            .filter_map(|v| tags::value_name(self.tag_id, v))
            .collect()
    }

    /// Values rendered for display, control characters in strings escaped.
    pub fn display_values(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|value| match value {
                TiffValue::Ascii(s) => escape_control(s),
                other => other.to_string(),
            })
            .collect()
    }
}

fn escape_control(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{08}' => out.push_str("\\b"),
            c => out.push(c),
        }
    }
    out
}

impl Serialize for IfdEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("IfdEntry", 9)?;
        s.serialize_field("tag", &self.tag_id)?;
        s.serialize_field("tag_name", &self.tag_name())?;
        s.serialize_field("type", &self.field_type_raw)?;
        s.serialize_field("type_name", &self.type_name())?;
        s.serialize_field("count", &self.count)?;
        s.serialize_field("value_or_offset", &hex::encode(&self.value_offset_bytes))?;
        s.serialize_field("inline", &self.is_inline)?;
        s.serialize_field("values", &self.values)?;
        s.serialize_field("value_names", &self.value_names())?;
        s.end()
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// Index of an [`Ifd`] in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IfdId(pub(crate) usize);

impl IfdId {
    /// Position in visitation order.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A parsed Image File Directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Ifd {
    /// File offset this directory was read from
    pub offset: u64,

    /// Entries in on-disk order
    pub entries: Vec<IfdEntry>,

    /// Child directories reached through SubIFDs, in discovery order
    pub sub_ifds: Vec<IfdId>,

    /// Offset of the next IFD in the chain (0 = no more)
    pub next_ifd_offset: u64,

    /// Directory whose SubIFDs led here, `None` at the top level
    pub parent: Option<IfdId>,
}

impl Ifd {
    /// Byte size of a directory with `entry_count` entries, including the
    /// count field and the trailing next-IFD offset.
    ///
    /// Returns `None` if the size does not fit in memory.
    pub fn calculate_size(entry_count: u64, header: &TiffHeader) -> Option<usize> {
        let entries = entry_count.checked_mul(header.ifd_entry_size() as u64)?;
        let total = entries
            .checked_add(header.ifd_count_size() as u64)?
            .checked_add(header.ifd_next_offset_size() as u64)?;
        usize::try_from(total).ok()
    }

    /// Parse the directory table. Values are not resolved here.
    pub fn parse(bytes: &[u8], header: &TiffHeader, offset: u64) -> Result<Self, TiffError> {
        let truncated = || {
            TiffError::Io(IoError::RangeOutOfBounds {
                offset,
                requested: bytes.len() as u64 + 1,
                size: bytes.len() as u64,
            })
        };

        let count_size = header.ifd_count_size();
        if bytes.len() < count_size {
            return Err(truncated());
        }
        let entry_count = header.read_entry_count(&bytes[..count_size]);
        let size = Self::calculate_size(entry_count, header).ok_or_else(truncated)?;
        if bytes.len() < size {
            return Err(truncated());
        }

        let entry_size = header.ifd_entry_size();
        let table_end = size - header.ifd_next_offset_size();
        let entries = bytes[count_size..table_end]
            .chunks_exact(entry_size)
            .map(|record| IfdEntry::parse(record, header))
            .collect();
        let next_ifd_offset = header.read_offset(&bytes[table_end..size]);

        Ok(Ifd {
            offset,
            entries,
            sub_ifds: Vec::new(),
            next_ifd_offset,
            parent: None,
        })
    }

    /// An IFD without entries is invalid, though it stays in the tree.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.entries.is_empty()
    }

    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// First entry with the given tag.
    pub fn get_entry(&self, tag: TiffTag) -> Option<&IfdEntry> {
        self.get_entry_by_id(tag.as_u16())
    }

    /// First entry with the given raw tag number.
    pub fn get_entry_by_id(&self, tag_id: u16) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag_id == tag_id)
    }

    /// Image width and length, if both tags are present.
    pub fn dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_entry(TiffTag::ImageWidth)?.first_u64()?;
        let height = self.get_entry(TiffTag::ImageLength)?.first_u64()?;
        Some((width, height))
    }
}

// =============================================================================
// DirectoryError
// =============================================================================

/// A non-fatal failure recorded while walking the directory graph.
#[derive(Debug, Clone)]
pub struct DirectoryError {
    /// Offset of the directory being read
    pub offset: u64,

    /// Tag of the entry whose value could not be read, if the failure was entry-local
    pub tag: Option<u16>,

    pub error: TiffError,
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            Some(tag) => write!(
                f,
                "IFD at offset {}, entry {} ({}): {}",
                self.offset,
                tags::tag_name(tag),
                tag,
                self.error
            ),
            None => write!(f, "IFD at offset {}: {}", self.offset, self.error),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl Serialize for DirectoryError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DirectoryError", 4)?;
        s.serialize_field("offset", &self.offset)?;
        s.serialize_field("tag", &self.tag)?;
        s.serialize_field("kind", &self.error.kind())?;
        s.serialize_field("message", &self.error.to_string())?;
        s.end()
    }
}

// =============================================================================
// IfdReader
// =============================================================================

/// Result of walking every directory reachable from IFD0.
#[derive(Debug, Clone, Default)]
pub struct IfdForest {
    /// All directories, in visitation order
    pub ifds: Vec<Ifd>,

    /// Directories of the top-level next-IFD chain
    pub top_level: Vec<IfdId>,

    /// Non-fatal failures, in the order they happened
    pub errors: Vec<DirectoryError>,
}

/// Reads directories from a byte source.
pub struct IfdReader<'a, R: RangeReader + ?Sized> {
    reader: &'a R,
    header: &'a TiffHeader,
    options: &'a ParserOptions,
}

impl<'a, R: RangeReader + ?Sized> IfdReader<'a, R> {
    pub fn new(reader: &'a R, header: &'a TiffHeader, options: &'a ParserOptions) -> Self {
        Self {
            reader,
            header,
            options,
        }
    }

    /// Walk every directory reachable from the header's IFD0 offset.
    ///
    /// Never fails as a whole: directory and entry failures are collected in
    /// [`IfdForest::errors`] and the walk continues with what is left.
    pub fn read_all(&self) -> IfdForest {
        let mut forest = IfdForest::default();
        let mut visited = HashSet::new();
        let mut decoded_values: u64 = 0;

        // LIFO work list reproduces the recursive order without recursion
        let mut pending: Vec<(u64, Option<IfdId>)> = Vec::new();
        if self.header.first_ifd_offset != 0 {
            pending.push((self.header.first_ifd_offset, None));
        }

        while let Some((offset, parent)) = pending.pop() {
            if !visited.insert(offset) {
                warn!(offset, "IFD already visited, skipping branch");
                forest.errors.push(DirectoryError {
                    offset,
                    tag: None,
                    error: TiffError::CycleDetected(offset),
                });
                continue;
            }

            if forest.ifds.len() >= self.options.max_ifds {
                warn!(limit = self.options.max_ifds, "IFD limit reached, stopping");
                forest.errors.push(DirectoryError {
                    offset,
                    tag: None,
                    error: TiffError::TooManyIfds(self.options.max_ifds),
                });
                break;
            }

            let mut ifd = match self.read_directory(offset) {
                Ok(ifd) => ifd,
                Err(error) => {
                    warn!(offset, %error, "failed to read IFD");
                    forest.errors.push(DirectoryError {
                        offset,
                        tag: None,
                        error,
                    });
                    continue;
                }
            };

            for entry in &mut ifd.entries {
                let cost = entry.decoded_len();
                if decoded_values.saturating_add(cost) > self.options.max_decoded_values {
                    warn!(
                        offset,
                        tag = entry.tag_id,
                        count = entry.count,
                        "value limit reached, leaving entry undecoded"
                    );
                    forest.errors.push(DirectoryError {
                        offset,
                        tag: Some(entry.tag_id),
                        error: TiffError::TooManyValues(self.options.max_decoded_values),
                    });
                    continue;
                }

                match self.resolve_values(entry) {
                    Ok(()) => decoded_values += cost,
                    Err(error) => {
                        warn!(offset, tag = entry.tag_id, %error, "failed to read entry value");
                        forest.errors.push(DirectoryError {
                            offset,
                            tag: Some(entry.tag_id),
                            error,
                        });
                    }
                }
            }

            let id = IfdId(forest.ifds.len());
            ifd.parent = parent;

            let sub_ifd_offsets = if self.options.parse_sub_ifds {
                self.sub_ifd_offsets(&ifd)
            } else {
                Vec::new()
            };

            debug!(
                offset,
                entries = ifd.entries.len(),
                sub_ifds = sub_ifd_offsets.len(),
                next = ifd.next_ifd_offset,
                "read IFD"
            );

            if ifd.next_ifd_offset != 0 {
                pending.push((ifd.next_ifd_offset, parent));
            }
            for sub_offset in sub_ifd_offsets.into_iter().rev() {
                pending.push((sub_offset, Some(id)));
            }

            forest.ifds.push(ifd);
            match parent {
                None => forest.top_level.push(id),
                Some(parent) => forest.ifds[parent.0].sub_ifds.push(id),
            }
        }

        forest
    }

    /// Read the entry table and next-IFD offset at `offset`.
    ///
    /// Entry values are left unresolved.
    pub fn read_directory(&self, offset: u64) -> Result<Ifd, TiffError> {
        let count_bytes = self
            .reader
            .read_exact_at(offset, self.header.ifd_count_size())?;
        let entry_count = self.header.read_entry_count(&count_bytes);

        let size = Ifd::calculate_size(entry_count, self.header).ok_or(IoError::RangeOutOfBounds {
            offset,
            requested: u64::MAX,
            size: self.reader.size(),
        })?;
        let bytes = self.reader.read_exact_at(offset, size)?;

        Ifd::parse(&bytes, self.header, offset)
    }

    /// Locate and decode the value of one entry.
    ///
    /// Unknown types and zero counts are left without values.
    pub fn resolve_values(&self, entry: &mut IfdEntry) -> Result<(), TiffError> {
        let Some(field_type) = entry.field_type else {
            return Ok(());
        };

        let size = entry.value_byte_size().ok_or(IoError::RangeOutOfBounds {
            offset: entry.value_offset(self.header),
            requested: u64::MAX,
            size: self.reader.size(),
        })?;
        if size == 0 {
            return Ok(());
        }

        let bytes = if entry.is_inline {
            entry.value_offset_bytes.slice(..size as usize)
        } else {
            let offset = entry.value_offset(self.header);
            let len = usize::try_from(size).map_err(|_| IoError::RangeOutOfBounds {
                offset,
                requested: size,
                size: self.reader.size(),
            })?;
            self.reader.read_exact_at(offset, len)?
        };

        entry.values = decode_values(field_type, entry.count, &bytes, self.header.byte_order);
        Ok(())
    }

    /// Child directory offsets named by the last SubIFDs entry.
    fn sub_ifd_offsets(&self, ifd: &Ifd) -> Vec<u64> {
        let sub_ifds = TiffTag::SubIFDs.as_u16();
        let Some(entry) = ifd.entries.iter().rev().find(|e| e.tag_id == sub_ifds) else {
            return Vec::new();
        };

        match entry.field_type {
            Some(field_type) if field_type.is_offset_type(self.header.is_bigtiff()) => entry
                .values
                .iter()
                .filter_map(TiffValue::as_u64)
                .filter(|&offset| offset != 0)
                .collect(),
            _ => {
                warn!(
                    offset = ifd.offset,
                    field_type = entry.field_type_raw,
                    "invalid data type for SubIFDs, ignoring"
                );
                Vec::new()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
