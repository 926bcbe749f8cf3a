//! Definition markup parsing and span rendering.
//!
//! Definition and example text arrives as small HTML fragments. They are
//! tokenized leniently with quick-xml into a [`MarkupNode`] tree, then
//! walked depth-first to produce [`InlineSpan`]s. Only a handful of
//! elements carry meaning; everything else is transparent.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::types::{InlineSpan, InlineStyle, LinkTarget};

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Anchor classes that mark a link to the page itself.
const SELF_LINK_CLASSES: &[&str] = &["selflink", "mw-selflink"];

/// Element kinds the renderer distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Anchor,
    Bold,
    Italic,
    Underline,
    Comment,
    Other(String),
}

impl Tag {
    fn from_name(name: &str) -> Self {
        match name {
            "a" => Self::Anchor,
            "b" | "strong" => Self::Bold,
            "i" | "em" => Self::Italic,
            "u" | "ins" => Self::Underline,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A node of a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element {
        tag: Tag,
        attributes: Vec<(String, String)>,
        children: Vec<MarkupNode>,
    },
}

impl MarkupNode {
    /// Attribute value by name, for elements.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
        }
    }
}

/// Fragment could not be tokenized.
#[derive(Debug, Error)]
#[error("markup tokenizer failed at byte {position}: {message}")]
pub struct MarkupError {
    pub position: u64,
    pub message: String,
}

struct OpenElement {
    name: String,
    tag: Tag,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupNode>,
}

impl OpenElement {
    fn close(self) -> MarkupNode {
        MarkupNode::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

/// Builds the node tree while tolerating HTML's loose nesting.
#[derive(Default)]
struct TreeBuilder {
    root: Vec<MarkupNode>,
    open: Vec<OpenElement>,
}

impl TreeBuilder {
    fn siblings(&mut self) -> &mut Vec<MarkupNode> {
        match self.open.last_mut() {
            Some(top) => &mut top.children,
            None => &mut self.root,
        }
    }

    fn push_node(&mut self, node: MarkupNode) {
        self.siblings().push(node);
    }

    /// Append text, merging with a preceding text sibling.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let siblings = self.siblings();
        if let Some(MarkupNode::Text(previous)) = siblings.last_mut() {
            previous.push_str(text);
        } else {
            siblings.push(MarkupNode::Text(text.to_string()));
        }
    }

    fn open(&mut self, start: &BytesStart<'_>) {
        let name = element_name(start);
        let attributes = element_attributes(start);
        let tag = Tag::from_name(&name);
        if VOID_ELEMENTS.contains(&name.as_str()) {
            self.push_node(MarkupNode::Element {
                tag,
                attributes,
                children: Vec::new(),
            });
        } else {
            self.open.push(OpenElement {
                name,
                tag,
                attributes,
                children: Vec::new(),
            });
        }
    }

    fn empty(&mut self, start: &BytesStart<'_>) {
        let name = element_name(start);
        self.push_node(MarkupNode::Element {
            tag: Tag::from_name(&name),
            attributes: element_attributes(start),
            children: Vec::new(),
        });
    }

    /// Close the nearest open element named `name`, and anything opened inside it.
    fn close(&mut self, name: &str) {
        let Some(pos) = self.open.iter().rposition(|el| el.name == name) else {
            return;
        };
        while self.open.len() > pos {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(top) = self.open.pop() {
            let node = top.close();
            self.push_node(node);
        }
    }

    fn finish(mut self) -> Vec<MarkupNode> {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.root
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase()
}

fn element_attributes(start: &BytesStart<'_>) -> Vec<(String, String)> {
    start
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape_with(&raw, resolve_html5_entity)
                .map_or_else(|_| raw.to_string(), Cow::into_owned);
            (key, value)
        })
        .collect()
}

fn resolve_reference(name: &str) -> String {
    let raw = format!("&{name};");
    unescape_with(&raw, resolve_html5_entity).map_or_else(|_| raw.clone(), Cow::into_owned)
}

/// Parse a fragment into its top-level nodes.
///
/// Tokenizer errors are recovered from the way an HTML reader would: the
/// character that could not start markup (a bare `&` or `<`) is kept as
/// text and tokenizing resumes after it. An unterminated comment runs to
/// the end of the fragment.
///
/// # Errors
///
/// Returns [`MarkupError`] only when tokenizing failed and nothing at all
/// could be recovered.
pub fn parse_fragment(fragment: &str) -> Result<Vec<MarkupNode>, MarkupError> {
    let mut tree = TreeBuilder::default();
    let mut offset = 0;
    let mut first_error: Option<MarkupError> = None;
    while let Err(err) = tokenize(&fragment[offset..], &mut tree) {
        tracing::debug!(%err, offset, "recovering from markup tokenizer error");
        let failed_at = offset + err.position;
        first_error.get_or_insert_with(|| MarkupError {
            position: u64::try_from(failed_at).unwrap_or(u64::MAX),
            message: err.message,
        });
        let rest = &fragment[failed_at..];
        let Some(ch) = rest.chars().next() else {
            break;
        };
        if rest.starts_with("<!--") {
            break;
        }
        tree.push_text(&rest[..ch.len_utf8()]);
        offset = failed_at + ch.len_utf8();
    }
    let nodes = tree.finish();
    match first_error {
        Some(err) if nodes.is_empty() => Err(err),
        _ => Ok(nodes),
    }
}

/// Where a tokenizer run stopped, relative to its input.
struct TokenizeError {
    position: usize,
    message: String,
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at byte {}: {}", self.position, self.message)
    }
}

/// Feed `input` into `tree` until end of input or the first error.
///
/// The error position is the start of the event that failed.
fn tokenize(input: &str, tree: &mut TreeBuilder) -> Result<(), TokenizeError> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    loop {
        let event_start = usize::try_from(reader.buffer_position()).unwrap_or(input.len());
        let event = reader.read_event().map_err(|err| TokenizeError {
            position: event_start.min(input.len()),
            message: err.to_string(),
        })?;
        match event {
            Event::Start(start) => tree.open(&start),
            Event::Empty(start) => tree.empty(&start),
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                tree.close(&name);
            }
            Event::Text(text) => tree.push_text(&String::from_utf8_lossy(&text)),
            Event::CData(data) => tree.push_text(&String::from_utf8_lossy(&data)),
            Event::GeneralRef(reference) => {
                if let Ok(name) = reference.decode() {
                    tree.push_text(&resolve_reference(&name));
                }
            }
            Event::Comment(comment) => tree.push_node(MarkupNode::Element {
                tag: Tag::Comment,
                attributes: Vec::new(),
                children: vec![MarkupNode::Text(
                    String::from_utf8_lossy(&comment).into_owned(),
                )],
            }),
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

/// Whitespace that collapses during rendering.
pub(crate) const fn is_collapsible_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Formatting inherited by a subtree. Each level gets its own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StyleContext {
    bold: bool,
    italic: bool,
    underline: bool,
    target: Option<LinkTarget>,
}

impl StyleContext {
    fn for_element(&self, tag: &Tag, node: &MarkupNode) -> Self {
        let mut next = self.clone();
        match tag {
            Tag::Bold => next.bold = true,
            Tag::Italic => next.italic = true,
            Tag::Underline => next.underline = true,
            Tag::Anchor => {
                if let Some(target) = anchor_target(node) {
                    next.target = Some(target);
                }
            }
            Tag::Comment | Tag::Other(_) => {}
        }
        next
    }

    fn span(&self, text: String) -> InlineSpan {
        let style = InlineStyle {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            ..InlineStyle::default()
        };
        match &self.target {
            Some(target) => InlineSpan::linked(text, style, target.clone()),
            None => InlineSpan::new(text, style),
        }
    }
}

fn anchor_target(node: &MarkupNode) -> Option<LinkTarget> {
    let is_self_link = node.attribute("class").is_some_and(|classes| {
        classes
            .split_whitespace()
            .any(|class| SELF_LINK_CLASSES.contains(&class))
    });
    if is_self_link {
        return Some(LinkTarget::CurrentPage);
    }
    node.attribute("title")
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(|title| LinkTarget::Word(title.to_string()))
}

/// Depth-first span emitter with whitespace state carried across text nodes.
struct SpanRenderer {
    spans: Vec<InlineSpan>,
    /// True at the start of output and right after emitted whitespace.
    at_space: bool,
}

impl SpanRenderer {
    const fn new() -> Self {
        Self {
            spans: Vec::new(),
            at_space: true,
        }
    }

    fn visit(&mut self, node: &MarkupNode, context: &StyleContext) {
        match node {
            MarkupNode::Text(text) => {
                let normalized = self.normalize(text);
                if !normalized.is_empty() {
                    self.spans.push(context.span(normalized));
                }
            }
            MarkupNode::Element {
                tag: Tag::Comment, ..
            } => {}
            MarkupNode::Element { tag, children, .. } => {
                let inner = context.for_element(tag, node);
                for child in children {
                    self.visit(child, &inner);
                }
            }
        }
    }

    fn normalize(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if is_collapsible_space(ch) {
                if !self.at_space {
                    out.push(' ');
                    self.at_space = true;
                }
            } else {
                out.push(ch);
                self.at_space = false;
            }
        }
        out
    }
}

/// Render parsed nodes into spans.
pub fn render_nodes(nodes: &[MarkupNode]) -> Vec<InlineSpan> {
    let mut renderer = SpanRenderer::new();
    let context = StyleContext::default();
    for node in nodes {
        renderer.visit(node, &context);
    }
    renderer.spans
}

/// Render a definition or example fragment into spans.
///
/// Unparseable markup yields no spans so the rest of an entry still renders.
pub fn render(fragment: &str) -> Vec<InlineSpan> {
    match parse_fragment(fragment) {
        Ok(nodes) => render_nodes(&nodes),
        Err(err) => {
            tracing::debug!(%err, "dropping unparseable markup fragment");
            Vec::new()
        }
    }
}
