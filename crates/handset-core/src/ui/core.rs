//! Core UI traits and event types for the handset UI

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

impl From<Point> for TouchPoint {
    fn from(point: Point) -> Self {
        Self::new(point.x.max(0) as u16, point.y.max(0) as u16)
    }
}

/// Touch events that can occur on the UI
#[derive(Debug, Clone, Copy)]
pub enum TouchEvent {
    /// Initial touch press at a point
    Press(TouchPoint),
    /// Touch drag to a new point
    Drag(TouchPoint),
    /// Finger lifted
    Release(TouchPoint),
}

/// Hardware keys of the handset's directional pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Left,
    Right,
    Select,
}

/// Rotary encoder movement in detents; positive is clockwise.
pub type EncoderEvent = i32;

/// Result from handling an input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventResult {
    /// Event was handled by this element
    Handled,
    /// Event was not handled, pass to next element
    NotHandled,
    /// Event triggered an action
    Action(Action),
}

impl EventResult {
    /// Collapse into the action (if any) the owner has to act upon.
    pub fn into_action(self) -> Option<Action> {
        match self {
            EventResult::Action(action) => Some(action),
            EventResult::Handled | EventResult::NotHandled => None,
        }
    }
}

/// Actions that UI elements can trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Open a new page on top of the current one
    NavigateToPage(PageId),
    /// Pop the current page
    GoBack,
    /// Pop the current page and the page below it
    Abort,
    /// Show a blocking modal dialog on top of the current page
    ShowModal(Modal),
    /// Application defined action with ID
    Custom(u16),
}

/// Page identifier for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    MainMenu,
    GeoMapDisplay,
    GeoMapPrompt,
    Modal,
}

/// Button set of a modal dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Single "OK" button, dismissing closes the dialog only
    Info,
    /// Single "Abort" button, dismissing also closes the page that raised it
    Abort,
}

/// A blocking dialog request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modal {
    pub title: &'static str,
    pub message: &'static str,
    pub kind: ModalKind,
}

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within its bounds
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element
    fn bounds(&self) -> Rectangle;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);
}

/// Trait for UI elements that respond to touch events
pub trait Touchable {
    /// Check if a point is within this element's bounds
    fn contains_point(&self, point: TouchPoint) -> bool;

    /// Handle a touch event, returns result indicating if handled and any action
    fn handle_touch(&mut self, event: TouchEvent) -> EventResult;
}

/// Trait for UI elements that can own the input focus
pub trait Focusable {
    fn on_focus(&mut self);

    fn on_blur(&mut self);

    fn has_focus(&self) -> bool;
}
