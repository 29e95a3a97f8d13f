//! # tiff-inspect
//!
//! A structural metadata parser for TIFF and BigTIFF files.
//!
//! Reads the file header, walks every Image File Directory reachable through
//! the next-IFD chain and the SubIFDs tag, and decodes each entry's value
//! into typed values. Pixel data is never decoded.
//!
//! ## Architecture
//!
//! - [`io`] - Positional byte sources (files and in-memory buffers)
//! - [`mod@format`] - Header, directory and value parsing, tag catalog
//! - [`dump`] - Text and JSON renderings of a parsed document
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use tiff_inspect::{ParserOptions, TiffDocument, TiffTag};
//!
//! let document = TiffDocument::open("image.tif", ParserOptions::default())?;
//! for ifd in document.ifds() {
//!     if let Some(entry) = ifd.entry(TiffTag::ImageDescription) {
//!         println!("{:?}", entry.display_values());
//!     }
//! }
//! if let Some(message) = document.error_message() {
//!     eprintln!("partial parse: {message}");
//! }
//! # Ok::<(), tiff_inspect::TiffError>(())
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{ErrorKind, IoError, TiffError};
pub use format::tiff::{
    decode_values, tag_name, type_name, type_size, value_name, ByteOrder, Compression,
    DirectoryError, FieldType, Ifd, IfdEntry, IfdId, IfdRef, ParserOptions, TiffDocument,
    TiffHeader, TiffTag, TiffValue, BIGTIFF_HEADER_SIZE, TIFF_HEADER_SIZE,
};
pub use io::{FileRangeReader, RangeReader};
