//! Terminal User Interface module.
//!
//! This module provides the TUI for browsing the article collection, including:
//! - Main event loop (`run`)
//! - Keyboard and mouse input for the grid, the detail overlay and search
//! - Rendering for the header, filter bar, card grid and overlays
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch, loading and error screens
//! - `helpers` - Shared utility functions
//! - `header` - Title and collection counters
//! - `filters` - Search line, category and sort selectors
//! - `cards` - Article card grid
//! - `detail` - Article detail overlay
//! - `help` - Keybinding overlay
//! - `stats` - Statistics panel
//! - `status` - Status bar widget

mod cards;
mod detail;
mod events;
mod filters;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod stats;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
