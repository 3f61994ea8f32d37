pub mod constants;
pub mod geomap;
pub mod menu;
pub mod modal;
pub mod page;
pub mod page_manager;

pub use geomap::{GeoMapView, NO_MAP_MODAL, PositionCallback};
pub use menu::MenuPage;
pub use modal::ModalPage;
pub use page::{Page, PageWrapper};
pub use page_manager::PageManager;
