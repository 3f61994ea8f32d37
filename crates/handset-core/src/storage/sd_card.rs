use embedded_sdmmc::{
    Mode, RawDirectory, RawFile, RawVolume, SdCard, TimeSource, VolumeIdx, VolumeManager,
};
use log::{error, info, warn};

use super::{MAX_DIR_DEPTH, MapStorage, StorageError, split_map_path};

/// Directories open at once: the root plus every level of the deepest path
const MAX_OPEN_DIRS: usize = MAX_DIR_DEPTH + 1;

/// Handles kept open while a map file is being streamed
struct OpenFile {
    volume: RawVolume,
    dirs: heapless::Vec<RawDirectory, MAX_OPEN_DIRS>,
    file: Option<RawFile>,
}

/// Map storage on the first FAT volume of an SD card.
///
/// The map is read row by row on every repaint, so unlike one-shot reads the
/// file, its directories and the volume stay open until another file is
/// opened or the storage is dropped, held as raw `embedded-sdmmc` handles.
///
/// SD card access is blocking and shares the SPI bus with the display; the UI
/// loop never streams a map while another page is drawing.
pub struct SdMapStorage<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    volume_mgr: VolumeManager<SdCard<S, D>, T, MAX_OPEN_DIRS, 4, 1>,
    open: Option<OpenFile>,
}

impl<S, D, T> SdMapStorage<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    pub fn new(sd_card: SdCard<S, D>, ts: T) -> Self {
        Self {
            volume_mgr: VolumeManager::new_with_limits(sd_card, ts, 5000),
            open: None,
        }
    }

    /// Build from the SPI device and delay the card is attached to.
    pub fn from_spi(spi: S, delay: D, ts: T) -> Self {
        Self::new(SdCard::new(spi, delay), ts)
    }

    /// Close the current file (if any) and everything opened to reach it.
    pub fn close(&mut self) {
        if let Some(handles) = self.open.take() {
            self.release(handles);
        }
    }

    fn release(&self, handles: OpenFile) {
        if let Some(file) = handles.file
            && let Err(e) = self.volume_mgr.close_file(file)
        {
            warn!("Failed to close map file: {:?}", e);
        }
        for dir in handles.dirs.iter().rev() {
            if let Err(e) = self.volume_mgr.close_dir(*dir) {
                warn!("Failed to close directory: {:?}", e);
            }
        }
        if let Err(e) = self.volume_mgr.close_volume(handles.volume) {
            warn!("Failed to close volume: {:?}", e);
        }
    }

    fn open_in(
        &self,
        handles: &mut OpenFile,
        dirs: &[&str],
        file_name: &str,
    ) -> Result<(), StorageError> {
        let root = self
            .volume_mgr
            .open_root_dir(handles.volume)
            .map_err(map_error)?;
        handles.dirs.push(root).map_err(|_| StorageError::InvalidPath)?;

        let mut current = root;
        for dir in dirs {
            current = self.volume_mgr.open_dir(current, *dir).map_err(map_error)?;
            handles
                .dirs
                .push(current)
                .map_err(|_| StorageError::InvalidPath)?;
        }

        let file = self
            .volume_mgr
            .open_file_in_dir(current, file_name, Mode::ReadOnly)
            .map_err(map_error)?;
        handles.file = Some(file);

        Ok(())
    }

    fn file(&self) -> Result<RawFile, StorageError> {
        self.open
            .as_ref()
            .and_then(|handles| handles.file)
            .ok_or(StorageError::NotOpen)
    }
}

impl<S, D, T> MapStorage for SdMapStorage<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    fn open(&mut self, path: &str) -> Result<(), StorageError> {
        self.close();

        let (dirs, file_name) = split_map_path(path)?;
        let volume = self
            .volume_mgr
            .open_raw_volume(VolumeIdx(0))
            .map_err(map_error)?;

        let mut handles = OpenFile {
            volume,
            dirs: heapless::Vec::new(),
            file: None,
        };

        match self.open_in(&mut handles, &dirs, file_name) {
            Ok(()) => {
                info!("Opened {} on SD card", path);
                self.open = Some(handles);
                Ok(())
            }
            Err(e) => {
                self.release(handles);
                Err(e)
            }
        }
    }

    fn seek(&mut self, offset: u32) -> Result<(), StorageError> {
        let file = self.file()?;
        self.volume_mgr
            .file_seek_from_start(file, offset)
            .map_err(map_error)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let file = self.file()?;
        self.volume_mgr.read(file, buf).map_err(map_error)
    }
}

impl<S, D, T> Drop for SdMapStorage<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    fn drop(&mut self) {
        self.close();
    }
}

fn map_error<E: core::fmt::Debug>(e: embedded_sdmmc::Error<E>) -> StorageError {
    match e {
        embedded_sdmmc::Error::NotFound => StorageError::NotFound,
        embedded_sdmmc::Error::FilenameError(_) => StorageError::InvalidPath,
        other => {
            error!("SD card error: {:?}", other);
            StorageError::Io
        }
    }
}
