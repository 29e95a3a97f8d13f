//! Parsed TIFF document: header plus the directory tree.
//!
//! The document owns every [`Ifd`] in a flat arena indexed by [`IfdId`].
//! Navigation goes through [`IfdRef`], a borrowed view that knows how to
//! reach children and siblings without holding references between nodes.

use std::path::Path;

use bytes::Bytes;
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::TiffError;
use crate::io::{FileRangeReader, RangeReader};

use super::ifd::{DirectoryError, Ifd, IfdEntry, IfdId, IfdReader};
use super::parser::{ByteOrder, TiffHeader};
use super::tags::TiffTag;

/// Default cap on the number of directories read from one file.
pub const DEFAULT_MAX_IFDS: usize = 4096;

/// Default cap on the number of values decoded from one file.
pub const DEFAULT_MAX_DECODED_VALUES: u64 = 1 << 22;

// =============================================================================
// ParserOptions
// =============================================================================

/// Options controlling directory traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Follow SubIFDs (tag 330) into child directories
    pub parse_sub_ifds: bool,

    /// Stop after this many directories
    pub max_ifds: usize,

    /// Total values decoded across all entries; entries past it stay empty
    pub max_decoded_values: u64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            parse_sub_ifds: true,
            max_ifds: DEFAULT_MAX_IFDS,
            max_decoded_values: DEFAULT_MAX_DECODED_VALUES,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse_sub_ifds(mut self, parse_sub_ifds: bool) -> Self {
        self.parse_sub_ifds = parse_sub_ifds;
        self
    }

    pub fn with_max_ifds(mut self, max_ifds: usize) -> Self {
        self.max_ifds = max_ifds;
        self
    }

    pub fn with_max_decoded_values(mut self, max_decoded_values: u64) -> Self {
        self.max_decoded_values = max_decoded_values;
        self
    }
}

// =============================================================================
// TiffDocument
// =============================================================================

/// A TIFF or BigTIFF file's structure.
///
/// Opening fails only if the header cannot be read or is malformed. Problems
/// further in (unreachable directories, unreadable values, cycles) are kept
/// in [`errors`](Self::errors) and whatever could be read stays available.
#[derive(Debug, Clone)]
pub struct TiffDocument {
    header: TiffHeader,
    ifds: Vec<Ifd>,
    top_level: Vec<IfdId>,
    errors: Vec<DirectoryError>,
    source: String,
}

impl TiffDocument {
    /// Open and parse a file from disk.
    pub fn open(path: impl AsRef<Path>, options: ParserOptions) -> Result<Self, TiffError> {
        let reader = FileRangeReader::open(path)?;
        Self::from_reader(&reader, options)
    }

    /// Parse an in-memory file.
    pub fn from_bytes(data: impl Into<Bytes>, options: ParserOptions) -> Result<Self, TiffError> {
        let data: Bytes = data.into();
        Self::from_reader(&data, options)
    }

    /// Parse from any byte source.
    pub fn from_reader<R: RangeReader + ?Sized>(
        reader: &R,
        options: ParserOptions,
    ) -> Result<Self, TiffError> {
        let header = TiffHeader::read(reader)?;
        debug!(
            source = reader.identifier(),
            byte_order = header.byte_order.name(),
            version = header.version,
            first_ifd = header.first_ifd_offset,
            "parsed TIFF header"
        );

        let forest = IfdReader::new(reader, &header, &options).read_all();
        info!(
            source = reader.identifier(),
            ifds = forest.ifds.len(),
            errors = forest.errors.len(),
            "parsed TIFF structure"
        );

        Ok(Self {
            header,
            ifds: forest.ifds,
            top_level: forest.top_level,
            errors: forest.errors,
            source: reader.identifier().to_string(),
        })
    }

    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    /// The header exactly as read (8 or 16 bytes).
    pub fn header_bytes(&self) -> &[u8] {
        &self.header.raw_bytes
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn is_bigtiff(&self) -> bool {
        self.header.is_bigtiff()
    }

    pub fn ifd0_offset(&self) -> u64 {
        self.header.first_ifd_offset
    }

    /// Where the bytes came from (file path or "memory").
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level directories, following the next-IFD chain from IFD0.
    pub fn ifds(&self) -> impl ExactSizeIterator<Item = IfdRef<'_>> + '_ {
        self.top_level.iter().map(move |&id| IfdRef {
            document: self,
            id,
        })
    }

    /// Every directory in the tree, in visitation order.
    pub fn all_ifds(&self) -> impl ExactSizeIterator<Item = IfdRef<'_>> + '_ {
        (0..self.ifds.len()).map(move |index| IfdRef {
            document: self,
            id: IfdId(index),
        })
    }

    pub fn ifd(&self, id: IfdId) -> Option<IfdRef<'_>> {
        (id.0 < self.ifds.len()).then_some(IfdRef { document: self, id })
    }

    /// Number of top-level directories.
    pub fn ifd_count(&self) -> usize {
        self.top_level.len()
    }

    /// Number of directories in the whole tree, Sub-IFDs included.
    pub fn total_ifd_count(&self) -> usize {
        self.ifds.len()
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All recorded failures joined into one line, or `None` if there were none.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        Some(messages.join("; "))
    }

    pub fn errors(&self) -> &[DirectoryError] {
        &self.errors
    }
}

impl Serialize for TiffDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TiffDocument", 8)?;
        s.serialize_field("source", &self.source)?;
        s.serialize_field("header", &hex::encode(self.header_bytes()))?;
        s.serialize_field("byte_order", &self.byte_order())?;
        s.serialize_field("version", &self.version())?;
        s.serialize_field("bigtiff", &self.is_bigtiff())?;
        s.serialize_field("ifd0_offset", &self.ifd0_offset())?;
        s.serialize_field("ifds", &IfdList(self.ifds().collect()))?;
        s.serialize_field("errors", &self.errors)?;
        s.end()
    }
}

struct IfdList<'a>(Vec<IfdRef<'a>>);

impl Serialize for IfdList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for ifd in &self.0 {
            seq.serialize_element(ifd)?;
        }
        seq.end()
    }
}

// =============================================================================
// IfdRef
// =============================================================================

/// Borrowed view of one directory inside a [`TiffDocument`].
#[derive(Debug, Clone, Copy)]
pub struct IfdRef<'a> {
    document: &'a TiffDocument,
    id: IfdId,
}

impl<'a> IfdRef<'a> {
    pub fn id(&self) -> IfdId {
        self.id
    }

    /// The underlying directory.
    pub fn ifd(&self) -> &'a Ifd {
        &self.document.ifds[self.id.0]
    }

    pub fn offset(&self) -> u64 {
        self.ifd().offset
    }

    pub fn entries(&self) -> &'a [IfdEntry] {
        &self.ifd().entries
    }

    pub fn entry_count(&self) -> usize {
        self.ifd().entry_count()
    }

    /// First entry with the given tag.
    pub fn entry(&self, tag: TiffTag) -> Option<&'a IfdEntry> {
        self.ifd().get_entry(tag)
    }

    pub fn entry_by_id(&self, tag_id: u16) -> Option<&'a IfdEntry> {
        self.ifd().get_entry_by_id(tag_id)
    }

    /// Child directories, in the order they were discovered.
    pub fn sub_ifds(&self) -> impl ExactSizeIterator<Item = IfdRef<'a>> + 'a {
        let document = self.document;
        self.ifd()
            .sub_ifds
            .iter()
            .map(move |&id| IfdRef { document, id })
    }

    pub fn parent(&self) -> Option<IfdRef<'a>> {
        self.ifd().parent.map(|id| IfdRef {
            document: self.document,
            id,
        })
    }

    pub fn next_ifd_offset(&self) -> u64 {
        self.ifd().next_ifd_offset
    }

    pub fn is_valid(&self) -> bool {
        self.ifd().is_valid()
    }

    /// Image width and length, if both tags are present.
    pub fn dimensions(&self) -> Option<(u64, u64)> {
        self.ifd().dimensions()
    }
}

impl Serialize for IfdRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Ifd", 6)?;
        s.serialize_field("offset", &self.offset())?;
        s.serialize_field(
            "dimensions",
            &self.dimensions().map(|(w, h)| [w, h]),
        )?;
        s.serialize_field("entry_count", &self.entry_count())?;
        s.serialize_field("entries", self.entries())?;
        s.serialize_field("sub_ifds", &IfdList(self.sub_ifds().collect()))?;
        s.serialize_field("next_ifd_offset", &self.next_ifd_offset())?;
        s.end()
    }
}
