// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. lookup::LookupError)
    clippy::module_name_repetitions
)]

//! # lexview
//!
//! A terminal dictionary viewer.
//!
//! lexview looks a word up against a Wiktionary-style definition service
//! and shows the entry grouped by language, with:
//! - Styled definitions rendered from their markup fragments
//! - Followable links between entries
//! - Browser-style back/forward history
//! - A configurable language order
//!
//! ## Architecture
//!
//! lexview uses The Elm Architecture (TEA) pattern:
//! - **Model**: Viewer state, including history
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Markup rendering, entry aggregation, composition and layout
//! - [`history`]: Back/forward navigation
//! - [`lookup`]: Definition source and HTTP client
//! - [`config`]: Flag files and defaults
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod history;
pub mod lookup;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, LanguageOrdering, LinkTarget, WordEntry};
    pub use crate::history::History;
    pub use crate::lookup::{DefinitionSource, LookupError, RawLookupResult};
    pub use crate::ui::viewport::Viewport;
}
