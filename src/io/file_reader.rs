use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use super::range_reader::{check_range, RangeReader};
use crate::error::IoError;

/// Range reader over a local file opened read-only.
///
/// The handle is closed when the reader is dropped.
pub struct FileRangeReader {
    file: File,
    size: u64,
    identifier: String,
}

impl FileRangeReader {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let identifier = path.display().to_string();

        let open_error = |e: std::io::Error| IoError::Open {
            path: identifier.clone(),
            message: e.to_string(),
        };
        let file = File::open(path).map_err(open_error)?;
        let size = file.metadata().map_err(open_error)?.len();

        debug!(path = %identifier, size, "opened file");

        Ok(Self {
            file,
            size,
            identifier,
        })
    }
}

impl RangeReader for FileRangeReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        check_range(offset, len, self.size)?;

        let read_error = |e: std::io::Error| IoError::Read {
            offset,
            message: e.to_string(),
        };

        // `&File` implements Read and Seek, so no interior mutability is needed
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset)).map_err(read_error)?;

        let mut buf = vec![0u8; len];
        file.read_exact(&mut buf).map_err(read_error)?;
        Ok(Bytes::from(buf))
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
