//! Utility functions for common operations.
//!
//! - **URL validation**: only absolute http(s) URLs are handed to the browser
//! - **Text processing**: Unicode-aware width calculation, truncation and
//!   control-character stripping for terminal output
//!
//! ```
//! use kiosque::util::{display_width, truncate_to_width};
//!
//! assert_eq!(display_width("Intelligence artificielle"), 25);
//! assert_eq!(truncate_to_width("Intelligence artificielle", 15), "Intelligence...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width, wrapped_height};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum search term length accepted from the input line.
pub const MAX_SEARCH_LENGTH: usize = 256;
