//! Scrolling menu list and its entries

mod item;
mod view;

pub use item::{MenuItem, MenuItemView};
pub use view::{MENU_ITEM_HEIGHT_PX, MenuView};
