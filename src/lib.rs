//! Terminal browser for scraped blog article collections stored as JSON.
//!
//! The query layer (`query`, `format`) is pure and usable on its own; the
//! `ui` module drives it from a ratatui event loop.

pub mod app;
pub mod article;
pub mod config;
pub mod format;
pub mod keybindings;
pub mod loader;
pub mod query;
pub mod theme;
pub mod ui;
pub mod util;
