//! Core document types.

use std::fmt;
use std::ops::Range;

/// Destination of a link span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// The entry already on screen (a self-link in the source markup).
    CurrentPage,
    /// Another headword to look up.
    Word(String),
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentPage => f.write_str("(this page)"),
            Self::Word(word) => f.write_str(word),
        }
    }
}

/// Structural role of a span inside a composed entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpanRole {
    /// Definition and example text
    #[default]
    Body,
    /// The looked-up word
    Title,
    /// Language section heading
    Language,
    /// Sense number label, e.g. `"1. "`
    Ordinal,
    /// Part of speech label
    PartOfSpeech,
    /// Parenthesized grammatical gender
    Gender,
    /// Example bullet marker
    Bullet,
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub link: bool,
    pub role: SpanRole,
}

impl InlineStyle {
    /// Plain style carrying only a structural role.
    pub fn with_role(role: SpanRole) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }
}

/// A styled inline span.
///
/// `style().link` is set exactly when `target()` is `Some`; the two
/// constructors are the only way to build a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
    target: Option<LinkTarget>,
}

impl InlineSpan {
    /// Create an unlinked span.
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle {
                link: false,
                ..style
            },
            target: None,
        }
    }

    /// Create a span that activates `target`.
    pub fn linked(text: impl Into<String>, style: InlineStyle, target: LinkTarget) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle { link: true, ..style },
            target: Some(target),
        }
    }

    /// Explicit line break between composed lines.
    pub fn line_break() -> Self {
        Self::new("\n", InlineStyle::default())
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }

    pub const fn target(&self) -> Option<&LinkTarget> {
        self.target.as_ref()
    }

    /// Same style and target, different text.
    pub(crate) fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: self.style,
            target: self.target.clone(),
        }
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Heading: level 1 is the word, level 2 a language section
    Heading(u8),
    /// Numbered sense line (or its wrapped continuation)
    Sense,
    /// Bulleted example line (or its wrapped continuation)
    Example,
    /// Free text, e.g. a notice
    Paragraph,
    /// Empty line
    Empty,
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The text content of the line
    content: String,
    /// The type of line (for styling)
    line_type: LineType,
    /// Inline-styled spans for rendering
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Reference to a link in the laid-out document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Link text as displayed
    pub text: String,
    /// Where the link leads
    pub target: LinkTarget,
    /// Line number in rendered document
    pub line: usize,
    /// Display columns occupied on that line
    pub columns: Range<usize>,
}

/// A composed entry laid out into display lines.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Headword the document was composed for
    word: Option<String>,
    /// Rendered lines for display
    lines: Vec<RenderedLine>,
    /// Link references, in reading order
    links: Vec<LinkRef>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) const fn from_parts(
        word: Option<String>,
        lines: Vec<RenderedLine>,
        links: Vec<LinkRef>,
    ) -> Self {
        Self { word, lines, links }
    }

    /// Headword shown by this document, if any.
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get all link references.
    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    /// Links whose line falls inside `range`, with their index into
    /// [`links`](Self::links), in reading order.
    pub fn links_in_range(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (usize, &LinkRef)> {
        self.links
            .iter()
            .enumerate()
            .filter(move |(_, link)| range.contains(&link.line))
    }

    /// The link covering display column `column` on `line`, if any.
    pub fn link_at(&self, line: usize, column: usize) -> Option<&LinkRef> {
        self.links
            .iter()
            .find(|link| link.line == line && link.columns.contains(&column))
    }

    /// Get visible lines for rendering.
    ///
    /// Returns lines from `offset` to `offset + count`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    /// Get a specific rendered line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// Plain text of the whole document, one line per rendered line.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.content().trim_end());
            out.push('\n');
        }
        out
    }
}
