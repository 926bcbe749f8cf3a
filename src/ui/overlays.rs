use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

pub fn link_picker_rect(area: Rect, items_len: usize) -> Rect {
    let popup_width = area.width.saturating_sub(16).max(44);
    // At most nine items.
    let needed_rows = u16::try_from(items_len)
        .unwrap_or(u16::MAX)
        .saturating_mul(2)
        .saturating_add(4);
    let popup_height = needed_rows.min(area.height.saturating_sub(4).max(8));
    centered_popup_rect(popup_width, popup_height, area)
}

pub const fn link_picker_content_top(popup: Rect) -> u16 {
    // Border row plus padding row.
    popup.y + 2
}

pub fn render_link_picker_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let items = &model.link_picker_items;
    if items.is_empty() {
        return;
    }
    let popup = link_picker_rect(area, items.len());

    let mut lines: Vec<Line> = Vec::new();
    for (idx, link) in items.iter().enumerate() {
        let title = if link.text.trim().is_empty() {
            "(untitled link)"
        } else {
            link.text.as_str()
        };
        let left_margin = "   ";
        lines.push(Line::from(vec![
            Span::raw(left_margin),
            Span::styled(
                format!("{}: ", idx + 1),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw(left_margin),
            Span::raw("   "),
            Span::styled(link.target.to_string(), Style::default().fg(Color::Cyan)),
        ]));
    }
    lines.push(Line::raw(" "));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(
            "1-9 look up · any key or click outside cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ]));

    let block = Block::default()
        .title("Follow Link")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::styled("Scrolling", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  Space/PageDown      Page down"),
        Line::raw("  b/PageUp            Page up"),
        Line::raw("  Ctrl-d / Ctrl-u     Half page"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw(""),
        Line::styled("History", section_style),
        Line::raw("  h/Left/Backspace    Back"),
        Line::raw("  l/Right             Forward"),
        Line::raw(""),
        Line::styled("Links", section_style),
        Line::raw("  Tab / Shift-Tab     Focus next / previous"),
        Line::raw("  Enter               Follow focused link"),
        Line::raw("  o                   Pick visible link (1-9)"),
        Line::raw("  Click               Follow link"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  / or s              Look up a word"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw("  ? / F1              Toggle help"),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ];

    let block = Block::default()
        .title("Help")
        .title_bottom(Line::styled(
            " any key closes ",
            Style::default().fg(Color::Indexed(245)),
        ))
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
