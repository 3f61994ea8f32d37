//! Reusable widgets
//!
//! - [`menu`] - scrolling list of selectable entries
//! - [`geomap`] - world map viewport streamed from storage
//! - [`geopos`] - altitude and latitude/longitude entry in degrees, minutes and seconds
//! - [`number_field`], [`button`], [`bitmap`] - building blocks of the above

pub mod bitmap;
pub mod button;
pub mod geomap;
pub mod geopos;
pub mod menu;
pub mod number_field;

pub use bitmap::{Bitmap, ICON_CROSSHAIR, ICON_GLOBE};
pub use button::Button;
pub use geomap::{GeoMap, GeoMapError, GeoMapMode, PanDelta};
pub use geopos::{CoordinateFields, GeoPos, GeoPosInput, PositionChange, UpdateSource};
pub use menu::{MENU_ITEM_HEIGHT_PX, MenuItem, MenuItemView, MenuView};
pub use number_field::NumberField;
