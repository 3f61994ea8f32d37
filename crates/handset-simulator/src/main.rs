//! Desktop simulator for the handset menu and map UI.
//!
//! Renders handset-core pages in an SDL2 window via
//! `embedded-graphics-simulator`. A host directory stands in for the SD
//! card: the world map is read from `<root>/ADSB/world_map.bin` and the
//! settings blob from `<root>/handset.cfg`. The root defaults to `./sdcard`
//! and can be given as the first argument.
//!
//! # Key bindings
//!
//! | Key          | Action            |
//! |--------------|-------------------|
//! | Arrows       | Up/Down/Left/Right|
//! | Enter, Space | Select            |
//! | Backspace    | Left (back)       |
//! | Q, Esc       | Quit              |
//!
//! Mouse clicks are forwarded as touch events and the mouse wheel acts as
//! the rotary encoder.

mod file_storage;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use handset_core::config::{CONFIG_FILE_NAME, Config, MapConfig, MenuConfig};
use handset_core::pages::{GeoMapView, MenuPage, PageManager, PageWrapper};
use handset_core::tick::TICK_SECOND;
use handset_core::ui::{Action, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, KeyEvent, PageId, TouchEvent};

use crate::file_storage::FileMapStorage;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Interval of the blink tick.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_CARD_ROOT: &str = "./sdcard";

/// Tracked object shown on the display map page: Heathrow, heading east.
const DEMO_TAG: &str = "BAW12";
const DEMO_ALTITUDE_FT: i32 = 12500;
const DEMO_LAT: f64 = 51.4775;
const DEMO_LON: f64 = -0.4614;
const DEMO_BEARING_DEG: f32 = 90.0;

fn screen_bounds() -> Rectangle {
    Rectangle::new(
        Point::zero(),
        Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32),
    )
}

/// Build the page behind a navigation request.
fn create_page(
    page_id: PageId,
    card_root: &Path,
    map: &MapConfig<'_>,
    menu: &MenuConfig,
) -> Option<PageWrapper<FileMapStorage>> {
    let bounds = screen_bounds();

    match page_id {
        PageId::MainMenu => Some(MenuPage::main_menu(bounds, menu, &TICK_SECOND).into()),
        PageId::GeoMapDisplay => Some(
            GeoMapView::display(
                bounds,
                FileMapStorage::new(card_root),
                map.path,
                Some(DEMO_TAG),
                DEMO_ALTITUDE_FT,
                DEMO_LAT,
                DEMO_LON,
                DEMO_BEARING_DEG,
            )
            .into(),
        ),
        PageId::GeoMapPrompt => Some(
            GeoMapView::prompt(
                bounds,
                FileMapStorage::new(card_root),
                map.path,
                0,
                DEMO_LAT,
                DEMO_LON,
                Box::new(|altitude, lat, lon| {
                    info!("Picked position: {} ft {:.5} {:.5}", altitude, lat, lon);
                }),
            )
            .into(),
        ),
        // Modals are raised by the manager itself
        PageId::Modal => None,
    }
}

fn keycode_to_key(keycode: Keycode) -> Option<KeyEvent> {
    match keycode {
        Keycode::Up => Some(KeyEvent::Up),
        Keycode::Down => Some(KeyEvent::Down),
        Keycode::Left | Keycode::Backspace => Some(KeyEvent::Left),
        Keycode::Right => Some(KeyEvent::Right),
        Keycode::Return | Keycode::KpEnter | Keycode::Space => Some(KeyEvent::Select),
        _ => None,
    }
}

fn load_config_bytes(card_root: &Path) -> Option<Vec<u8>> {
    let path = card_root.join(CONFIG_FILE_NAME);
    match std::fs::read(&path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            info!("No config at {} ({}), using defaults", path.display(), e);
            None
        }
    }
}

fn main() {
    env_logger::init();

    let card_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CARD_ROOT));
    info!("Starting handset simulator, SD card at {}", card_root.display());
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: arrows=navigate  Enter=select  Backspace=back  wheel=encoder  Q=quit");

    let config_bytes = load_config_bytes(&card_root);
    let config = match config_bytes.as_deref().map(Config::from_bytes) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            warn!("Ignoring {}: {}", CONFIG_FILE_NAME, e);
            Config::default()
        }
        None => Config::default(),
    };

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Handset Simulator", &output_settings);

    let mut pages: PageManager<FileMapStorage> = PageManager::new(screen_bounds());
    let mut pending = create_page(PageId::MainMenu, &card_root, &config.map, &config.menu)
        .and_then(|root| pages.push(root));

    let mut last_tick = Instant::now();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(Rgb565::BLACK);
    window.update(&display);

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            let action = match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    keycode_to_key(keycode).and_then(|key| pages.handle_key(key))
                }

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    pages.handle_touch(TouchEvent::Press(point.into()))
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    pages.handle_touch(TouchEvent::Release(point.into()))
                }

                // Wheel up moves the highlight up
                SimulatorEvent::MouseWheel { scroll_delta, .. } if scroll_delta.y != 0 => {
                    pages.handle_encoder(-scroll_delta.y)
                }

                _ => None,
            };

            if action.is_some() {
                pending = action;
            }
        }

        // Navigation the manager hands back; pushing a page may raise more
        while let Some(action) = pending.take() {
            match action {
                Action::NavigateToPage(page_id) => {
                    info!("Navigate to {:?}", page_id);
                    pending = create_page(page_id, &card_root, &config.map, &config.menu)
                        .and_then(|page| pages.push(page));
                }
                other => info!("Unhandled action {:?}", other),
            }
        }

        if last_tick.elapsed() >= TICK_INTERVAL {
            TICK_SECOND.tick();
            last_tick = Instant::now();
        }

        pages.update();

        if let Err(e) = pages.draw(&mut display) {
            error!("Draw error: {:?}", e);
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
