//! Dictionary entry documents.
//!
//! This module handles:
//! - Rendering definition markup fragments to styled spans
//! - Grouping raw records into language-ordered word entries
//! - Composing an entry into spans and laying those out as display lines

mod compose;
mod entry;
mod layout;
mod markup;
mod types;

pub use compose::{EXAMPLE_BULLET, compose};
pub use entry::{
    LanguageGroup, LanguageOrdering, Sense, UNSPECIFIED_LANGUAGE, UNSPECIFIED_PART_OF_SPEECH,
    WordEntry, aggregate, order,
};
pub use markup::{MarkupError, MarkupNode, Tag, parse_fragment, render, render_nodes};
pub use types::{
    Document, InlineSpan, InlineStyle, LineType, LinkRef, LinkTarget, RenderedLine, SpanRole,
};
