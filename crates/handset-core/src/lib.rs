//! Hardware-independent core library for the handset UI
//!
//! This crate contains the platform-agnostic widgets of the handset's
//! on-screen interface: the scrolling menu list, the world map viewer and
//! its degrees/minutes/seconds position entry, the pages that host them and
//! the small navigation stack that pushes and pops those pages.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod config;
pub mod pages;
pub mod storage;
pub mod tick;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;
