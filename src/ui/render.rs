use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::document::RenderedLine;

use super::style::{focused_link_style, style_for_inline, style_for_line_type};
use super::{DOCUMENT_LEFT_PADDING, overlays, status};

/// Columns available to entry text in a terminal `total_width` wide.
pub fn document_content_width(total_width: u16) -> u16 {
    total_width.saturating_sub(DOCUMENT_LEFT_PADDING).max(1)
}

/// Rows taken by the status bar and whichever optional bars are showing.
pub fn footer_rows(model: &Model) -> u16 {
    1 + u16::from(model.prompt_active())
        + u16::from(model.active_toast().is_some())
        + u16::from(model.hovered_link.is_some())
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    render_document(model, frame, area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.link_picker_active() {
        overlays::render_link_picker_overlay(model, frame, area);
    }
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let prompt_active = model.prompt_active();
    let toast_active = model.active_toast().is_some();
    let hover_active = model.hovered_link.is_some();
    let doc_outer_area = Rect {
        height: area.height.saturating_sub(footer_rows(model)),
        ..area
    };

    // Bars stack upward from the status line: prompt, toast, hover.
    let mut next_bar_row = area.y + area.height.saturating_sub(1);
    let status_area = Rect {
        y: next_bar_row,
        height: 1,
        ..area
    };
    let mut bar_above = |active: bool| {
        active.then(|| {
            next_bar_row = next_bar_row.saturating_sub(1);
            Rect {
                y: next_bar_row,
                height: 1,
                ..area
            }
        })
    };
    let prompt_area = bar_above(prompt_active);
    let toast_area = bar_above(toast_active);
    let hover_area = bar_above(hover_active);

    let focused = model
        .focused_link()
        .map(|link| (link.line, link.columns.clone()));
    let offset = model.viewport.offset();
    let content: Vec<Line> = model
        .document
        .visible_lines(offset, model.viewport.height() as usize)
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let focus = focused
                .as_ref()
                .filter(|(focus_line, _)| *focus_line == offset + idx)
                .map(|(_, columns)| columns.clone());
            styled_line(line, model.light_background, focus)
        })
        .collect();

    let doc_block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::left(DOCUMENT_LEFT_PADDING));
    frame.render_widget(Clear, doc_outer_area);
    frame.render_widget(Paragraph::new(content).block(doc_block), doc_outer_area);

    if let Some(hover_area) = hover_area {
        status::render_hover_link_bar(model, frame, hover_area);
    }
    if let Some(toast_area) = toast_area {
        status::render_toast_bar(model, frame, toast_area);
    }
    if let Some(prompt_area) = prompt_area {
        status::render_prompt_bar(model, frame, prompt_area);
    }
    status::render_status_bar(model, frame, status_area);
}

fn styled_line(line: &RenderedLine, light_bg: bool, focus: Option<Range<usize>>) -> Line<'static> {
    let line_style = style_for_line_type(line.line_type(), light_bg);
    let Some(spans) = line.spans() else {
        return Line::styled(line.content().to_string(), line_style);
    };
    let styled: Vec<Span<'static>> = spans
        .iter()
        .map(|span| {
            Span::styled(
                span.text().to_string(),
                style_for_inline(line_style, span.style(), light_bg),
            )
        })
        .collect();
    match focus {
        Some(columns) => Line::from(highlight_columns(styled, &columns)),
        None => Line::from(styled),
    }
}

/// Apply the focus highlight to the cells in `columns`, splitting spans
/// at the boundaries.
fn highlight_columns(spans: Vec<Span<'static>>, columns: &Range<usize>) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len() + 2);
    let mut column = 0usize;
    for span in spans {
        let mut pieces: Vec<(bool, String)> = Vec::new();
        for ch in span.content.chars() {
            let inside = columns.contains(&column);
            column += ch.width().unwrap_or(0);
            match pieces.last_mut() {
                Some((was_inside, text)) if *was_inside == inside => text.push(ch),
                _ => pieces.push((inside, ch.to_string())),
            }
        }
        for (inside, text) in pieces {
            let style = if inside {
                focused_link_style(span.style)
            } else {
                span.style
            };
            out.push(Span::styled(text, style));
        }
    }
    out
}
