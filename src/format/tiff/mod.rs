//! TIFF and BigTIFF structure parser.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian, MM = big-endian)
//!   in the header. All multi-byte values must be read respecting this order.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit counts and offsets,
//!   BigTIFF uses 64-bit ones and wider directory entries. Both are handled transparently.
//!
//! - **IFD (Image File Directory)**: A list of tagged entries plus the offset of the
//!   next IFD. The SubIFDs tag links an IFD to child IFDs, giving a tree.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD entry,
//!   larger values are stored at an offset pointed to by the entry.

mod document;
mod ifd;
mod parser;
mod tags;
mod values;

pub use document::{
    IfdRef, ParserOptions, TiffDocument, DEFAULT_MAX_DECODED_VALUES, DEFAULT_MAX_IFDS,
};
pub use ifd::{DirectoryError, Ifd, IfdEntry, IfdForest, IfdId, IfdReader};
pub use parser::{
    ByteOrder, TiffHeader, BIGTIFF_HEADER_SIZE, TIFF_HEADER_SIZE, VERSION_BIGTIFF, VERSION_TIFF,
};
pub use tags::{tag_name, type_name, type_size, value_name, Compression, FieldType, TiffTag};
pub use values::{decode_raw, decode_values, TiffValue};
