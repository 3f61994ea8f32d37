//! Settings stored as a postcard blob on the SD card

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::storage::WORLD_MAP_PATH;
use crate::ui::components::MENU_ITEM_HEIGHT_PX;

/// File name of the settings blob in the SD card's root directory
pub const CONFIG_FILE_NAME: &str = "handset.cfg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Config decode failed")]
    Decode,
    #[error("Config encode failed")]
    Encode,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct Config<'a> {
    pub map: MapConfig<'a>,
    pub menu: MenuConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapConfig<'a> {
    /// Map raster path relative to the SD card root
    pub path: &'a str,
}

impl Default for MapConfig<'_> {
    fn default() -> Self {
        Self {
            path: WORLD_MAP_PATH,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MenuConfig {
    pub row_height_px: u32,
    /// Keep the highlighted row emphasised while the menu is not focused
    pub keep_highlight: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            row_height_px: MENU_ITEM_HEIGHT_PX,
            keep_highlight: false,
        }
    }
}

impl<'a> Config<'a> {
    /// Decode a config blob. String fields borrow from `bytes`.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|e| {
            log::warn!("Invalid config blob: {:?}", e);
            ConfigError::Decode
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.map.path, "ADSB/world_map.bin");
        assert_eq!(config.menu.row_height_px, 24);
        assert!(!config.menu.keep_highlight);
    }

    #[test]
    fn test_blob_borrows_map_path() {
        let config = Config {
            map: MapConfig {
                path: "MAPS/europe.bin",
            },
            menu: MenuConfig {
                row_height_px: 32,
                keep_highlight: true,
            },
        };
        let bytes = config.to_vec().unwrap();

        let decoded = Config::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let bytes = Config::default().to_vec().unwrap();
        assert_eq!(
            Config::from_bytes(&bytes[..bytes.len() - 2]),
            Err(ConfigError::Decode)
        );
    }
}
