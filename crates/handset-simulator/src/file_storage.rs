//! [`MapStorage`] over a host directory standing in for the SD card.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;

use handset_core::storage::{MapStorage, StorageError, split_map_path};
use log::{debug, warn};

pub struct FileMapStorage {
    root: PathBuf,
    file: Option<File>,
}

impl FileMapStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file: None,
        }
    }

    /// Host path of `path` below the card root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let (dirs, file_name) = split_map_path(path)?;
        let mut resolved = self.root.clone();
        resolved.extend(dirs.iter());
        resolved.push(file_name);
        Ok(resolved)
    }
}

fn map_io_error(e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        _ => {
            warn!("Host file error: {}", e);
            StorageError::Io
        }
    }
}

impl MapStorage for FileMapStorage {
    fn open(&mut self, path: &str) -> Result<(), StorageError> {
        self.file = None;
        let resolved = self.resolve(path)?;
        debug!("Opening {}", resolved.display());
        self.file = Some(File::open(&resolved).map_err(map_io_error)?);
        Ok(())
    }

    fn seek(&mut self, offset: u32) -> Result<(), StorageError> {
        let file = self.file.as_mut().ok_or(StorageError::NotOpen)?;
        file.seek(SeekFrom::Start(offset as u64))
            .map_err(map_io_error)?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let file = self.file.as_mut().ok_or(StorageError::NotOpen)?;
        file.read(buf).map_err(map_io_error)
    }
}
