use serde::Serialize;
use thiserror::Error;

/// I/O errors that can occur when reading from a byte source
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The file could not be opened
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },

    /// A seek or read failed at the given offset
    #[error("Read failed at offset {offset}: {message}")]
    Read { offset: u64, message: String },

    /// Requested range exceeds resource bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },
}

/// Broad classification of a [`TiffError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Open, seek or read failure
    Io,
    /// Bad magic bytes or an unreadable header
    InvalidFormat,
    /// Version word is neither 42 nor 43
    UnsupportedVersion,
    /// A Sub-IFD or next-IFD link points back to an already visited directory
    CycleDetected,
    /// A configured directory or value limit was reached
    LimitExceeded,
}

/// Errors that can occur when parsing TIFF files
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Unsupported TIFF version: expected 42 (TIFF) or 43 (BigTIFF), got {0}")]
    UnsupportedVersion(u16),

    /// Invalid BigTIFF offset byte size (must be 8)
    #[error("Invalid BigTIFF offset byte size: expected 8, got {0}")]
    InvalidBigTiffOffsetSize(u16),

    /// File is too small to contain a valid TIFF header
    #[error("File too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// Directory offset already visited while walking the IFD graph
    #[error("IFD cycle detected: offset {0} was already visited")]
    CycleDetected(u64),

    /// Too many directories in one file
    #[error("IFD limit reached: refusing to read more than {0} directories")]
    TooManyIfds(usize),

    /// Decoding this value would exceed the per-document value budget
    #[error("Value limit reached: refusing to decode more than {0} values")]
    TooManyValues(u64),
}

impl TiffError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TiffError::Io(_) => ErrorKind::Io,
            TiffError::InvalidMagic(_)
            | TiffError::InvalidBigTiffOffsetSize(_)
            | TiffError::FileTooSmall { .. } => ErrorKind::InvalidFormat,
            TiffError::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            TiffError::CycleDetected(_) => ErrorKind::CycleDetected,
            TiffError::TooManyIfds(_) | TiffError::TooManyValues(_) => ErrorKind::LimitExceeded,
        }
    }
}
