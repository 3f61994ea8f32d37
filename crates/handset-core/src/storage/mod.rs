//! Read-only file access for the map raster
//!
//! Widgets only see the [`MapStorage`] trait. The device implements it on
//! top of a FAT formatted SD card ([`sd_card::SdMapStorage`]); the simulator
//! implements it on the host file system.

pub mod sd_card;

use thiserror_no_std::Error;

/// Default location of the world map raster on the SD card
pub const WORLD_MAP_PATH: &str = "ADSB/world_map.bin";

/// Width (u16 LE) followed by height (u16 LE)
pub const MAP_HEADER_SIZE: u32 = 4;

/// Deepest directory nesting accepted in a map path
pub const MAX_DIR_DEPTH: usize = 4;

/// Errors raised by [`MapStorage`] implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The file or one of its directories does not exist
    #[error("File not found")]
    NotFound,

    /// The underlying device failed
    #[error("I/O error")]
    Io,

    /// The path is empty, too deep, or not a valid 8.3 name
    #[error("Invalid path")]
    InvalidPath,

    /// Seek or read without an open file
    #[error("No file open")]
    NotOpen,
}

/// A single open file that can be positioned and read.
///
/// Opening a new path closes the previous file.
pub trait MapStorage {
    /// Open `path` (slash separated, relative to the root directory) for reading.
    fn open(&mut self, path: &str) -> Result<(), StorageError>;

    /// Position the read cursor `offset` bytes from the start of the file.
    fn seek(&mut self, offset: u32) -> Result<(), StorageError>;

    /// Read up to `buf.len()` bytes. Returns 0 at end of file.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Read until `buf` is full or the file ends. Returns the bytes read.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }
}

impl<T: MapStorage + ?Sized> MapStorage for &mut T {
    fn open(&mut self, path: &str) -> Result<(), StorageError> {
        (**self).open(path)
    }

    fn seek(&mut self, offset: u32) -> Result<(), StorageError> {
        (**self).seek(offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        (**self).read(buf)
    }
}

/// Split `path` into its directories and the file name.
///
/// Leading, trailing and repeated slashes are ignored.
pub fn split_map_path(
    path: &str,
) -> Result<(heapless::Vec<&str, MAX_DIR_DEPTH>, &str), StorageError> {
    let mut parts = path.split('/').filter(|part| !part.is_empty());
    let Some(file_name) = parts.next_back() else {
        return Err(StorageError::InvalidPath);
    };

    let mut dirs = heapless::Vec::new();
    for dir in parts {
        dirs.push(dir).map_err(|_| StorageError::InvalidPath)?;
    }

    Ok((dirs, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_default_map_path() {
        let (dirs, name) = split_map_path(WORLD_MAP_PATH).unwrap();
        assert_eq!(dirs.as_slice(), &["ADSB"]);
        assert_eq!(name, "world_map.bin");
    }

    #[test]
    fn test_split_ignores_extra_slashes() {
        let (dirs, name) = split_map_path("/MAPS//EU/map.bin").unwrap();
        assert_eq!(dirs.as_slice(), &["MAPS", "EU"]);
        assert_eq!(name, "map.bin");

        let (dirs, name) = split_map_path("map.bin").unwrap();
        assert!(dirs.is_empty());
        assert_eq!(name, "map.bin");
    }

    #[test]
    fn test_split_rejects_empty_and_deep_paths() {
        assert_eq!(split_map_path(""), Err(StorageError::InvalidPath));
        assert_eq!(split_map_path("///"), Err(StorageError::InvalidPath));
        assert_eq!(
            split_map_path("a/b/c/d/e/map.bin"),
            Err(StorageError::InvalidPath)
        );
    }
}
