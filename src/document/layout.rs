//! Lay composed spans out into wrapped display lines.

use unicode_width::UnicodeWidthStr;

use super::compose::compose;
use super::entry::WordEntry;
use super::markup::is_collapsible_space;
use super::types::{
    Document, InlineSpan, InlineStyle, LineType, LinkRef, RenderedLine, SpanRole,
};

impl Document {
    /// Lay out composed spans for `word` at `width` display columns.
    ///
    /// A width of 0 disables wrapping.
    pub fn from_spans(word: &str, spans: &[InlineSpan], width: usize) -> Self {
        let mut lines = Vec::new();
        let mut links: Vec<LinkRef> = Vec::new();

        for logical in spans.split(InlineSpan::is_line_break) {
            let line_type = line_type_for(logical);
            if line_type == LineType::Empty {
                lines.push(RenderedLine::new(String::new(), LineType::Empty));
                continue;
            }
            for wrapped in wrap_logical_line(logical, width) {
                collect_links(&wrapped, lines.len(), &mut links);
                let content = spans_to_string(&wrapped);
                lines.push(RenderedLine::with_spans(content, line_type, wrapped));
            }
        }

        // The trailing break of the last line leaves one empty slice behind.
        if lines.last().is_some_and(|l| *l.line_type() == LineType::Empty) {
            lines.pop();
        }

        Self::from_parts(Some(word.to_string()), lines, links)
    }

    /// Compose and lay out `entry`.
    pub fn for_entry(entry: &WordEntry, width: usize) -> Self {
        Self::from_spans(&entry.word, &compose(entry), width)
    }
}

fn line_type_for(spans: &[InlineSpan]) -> LineType {
    let Some(first) = spans.iter().find(|s| !s.text().is_empty()) else {
        return LineType::Empty;
    };
    match first.style().role {
        SpanRole::Title => LineType::Heading(1),
        SpanRole::Language => LineType::Heading(2),
        SpanRole::Ordinal => LineType::Sense,
        SpanRole::Bullet => LineType::Example,
        _ => LineType::Paragraph,
    }
}

fn wrap_logical_line(spans: &[InlineSpan], width: usize) -> Vec<Vec<InlineSpan>> {
    let width = if width == 0 { usize::MAX } else { width };
    match spans.first() {
        Some(first) if first.style().role == SpanRole::Bullet => {
            let indent = first.text().width();
            wrap_spans(&spans[1..], width, Some(first), indent)
        }
        Some(first) if first.style().role == SpanRole::Ordinal => {
            wrap_spans(spans, width, None, first.text().width())
        }
        _ => wrap_spans(spans, width, None, 0),
    }
}

/// Greedy word wrap.
///
/// `prefix` starts the first line verbatim; continuation lines are
/// indented by `indent` columns. Whitespace at the start of a wrapped
/// line is dropped. A word wider than the line stays whole.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix: Option<&InlineSpan>,
    indent: usize,
) -> Vec<Vec<InlineSpan>> {
    let tokens = spans.iter().flat_map(split_inline_tokens);

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    if let Some(prefix) = prefix {
        current_len = prefix.text().width();
        current.push(prefix.clone());
    }

    for token in tokens {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(is_collapsible_space);

        if has_word && current_len.saturating_add(token_len) > width {
            lines.push(coalesce(std::mem::take(&mut current)));
            has_word = false;
            current_len = indent;
            if indent > 0 {
                current.push(InlineSpan::new(" ".repeat(indent), InlineStyle::default()));
            }
        }

        if token_is_ws && !has_word && !lines.is_empty() {
            continue;
        }

        current_len += token_len;
        current.push(token);
        if !token_is_ws {
            has_word = true;
        }
    }

    lines.push(coalesce(current));
    lines
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = is_collapsible_space(ch);
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(span.with_text(std::mem::take(&mut buf)));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(span.with_text(buf));
    }
    out
}

/// Merge neighbouring tokens that share style and target.
fn coalesce(tokens: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let mut out: Vec<InlineSpan> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match out.last_mut() {
            Some(last) if last.style() == token.style() && last.target() == token.target() => {
                let merged = format!("{}{}", last.text(), token.text());
                *last = last.with_text(merged);
            }
            _ => out.push(token),
        }
    }
    out
}

fn collect_links(spans: &[InlineSpan], line: usize, links: &mut Vec<LinkRef>) {
    let mut column = 0usize;
    for span in spans {
        let width = span.text().width();
        if let Some(target) = span.target() {
            let text = span.text().trim_end_matches(is_collapsible_space);
            let end = column + text.width();
            match links.last_mut() {
                Some(last)
                    if last.line == line
                        && last.columns.end == column
                        && last.target == *target =>
                {
                    last.text.push_str(text);
                    last.columns.end = end;
                }
                _ if !text.is_empty() => links.push(LinkRef {
                    text: text.to_string(),
                    target: target.clone(),
                    line,
                    columns: column..end,
                }),
                _ => {}
            }
        }
        column += width;
    }
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}
