//! File format parsers.
//!
//! Currently TIFF and BigTIFF; see [`tiff`].

pub mod tiff;
