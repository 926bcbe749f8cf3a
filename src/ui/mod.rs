//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Colors for entry text and bars

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{link_picker_content_top, link_picker_rect};
pub use render::{document_content_width, footer_rows, render};

pub const DOCUMENT_LEFT_PADDING: u16 = 2;
