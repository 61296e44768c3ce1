//! # CLI UI Module
//!
//! Styling and formatting for entscore CLI output. Plain prefixes like
//! `[ok]` keep output readable without colors (`NO_COLOR` is respected),
//! and every command also has a `--json` form for scripts.
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection
//! - `style`: Message types, prefixes, and styling functions
//! - `format`: Number and text formatters
//! - `table`: Table rendering with comfy-table

pub mod color;
pub mod format;
pub mod style;
pub mod table;

pub use color::ColorMode;
pub use style::{MessageType, Style};
