use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style::status_bar_style;

pub fn render_hover_link_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(target) = model.hovered_link.as_ref() else {
        return;
    };
    let bar = Paragraph::new(format!("link: {target}"))
        .style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_prompt_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let text = model.prompt.as_deref().unwrap_or_default();
    let bar = Paragraph::new(format!("Look up: {text}  Enter: search  Esc: cancel"))
        .style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let word = model.current_word().unwrap_or("lexview");
    let percent = model.viewport.scroll_percent();
    let line_info = format!(
        "Line {}/{}",
        (model.viewport.offset() + 1).min(model.viewport.total_lines().max(1)),
        model.viewport.total_lines()
    );
    let history_info = format!(
        "back:{} fwd:{}",
        model.history.back_len(),
        model.history.forward_len()
    );

    let status = format!(" {word}  [{percent}%]  {line_info}  {history_info}  ?:help");
    frame.render_widget(Paragraph::new(status).style(status_bar_style()), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => ("[info]", status_bar_style()),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
