use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Resize(w, h) => {
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        let _ = self;
        if model.help_visible || model.prompt_active() {
            return None;
        }

        if model.link_picker_active() {
            return picker_mouse(mouse, model);
        }

        let doc_area = document_mouse_area(model);
        let position = doc_position(model, doc_area, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Up(MouseButton::Left) => {
                let (line, column) = position?;
                model
                    .document
                    .link_at(line, column)
                    .map(|_| Message::FollowLinkAt(line, column))
            }
            MouseEventKind::Moved => {
                let hovered = position
                    .and_then(|(line, column)| model.document.link_at(line, column))
                    .map(|link| link.target.clone());
                (hovered != model.hovered_link).then_some(Message::HoverLink(hovered))
            }
            MouseEventKind::ScrollDown => model
                .viewport
                .can_scroll_down()
                .then_some(Message::ScrollDown(3)),
            MouseEventKind::ScrollUp => model
                .viewport
                .can_scroll_up()
                .then_some(Message::ScrollUp(3)),
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        let _ = self;
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if model.link_picker_active() {
            return match key.code {
                KeyCode::Char(c @ '1'..='9') => {
                    u8::try_from(u32::from(c) - u32::from('0'))
                        .ok()
                        .map(Message::SelectVisibleLink)
                }
                _ => Some(Message::CancelVisibleLinkPicker),
            };
        }

        if let Some(text) = model.prompt.as_ref() {
            return prompt_key(key, text);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Scrolling
            KeyCode::Char('j') | KeyCode::Down => model
                .viewport
                .can_scroll_down()
                .then_some(Message::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => model
                .viewport
                .can_scroll_up()
                .then_some(Message::ScrollUp(1)),
            KeyCode::Char('d') if ctrl => model
                .viewport
                .can_scroll_down()
                .then_some(Message::HalfPageDown),
            KeyCode::Char('u') if ctrl => model
                .viewport
                .can_scroll_up()
                .then_some(Message::HalfPageUp),
            KeyCode::Char('c') if ctrl => Some(Message::Quit),
            KeyCode::Char(' ') | KeyCode::PageDown => model
                .viewport
                .can_scroll_down()
                .then_some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp => model
                .viewport
                .can_scroll_up()
                .then_some(Message::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // History
            KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => Some(Message::Back),
            KeyCode::Char('l') | KeyCode::Right => Some(Message::Forward),

            // Links
            KeyCode::Tab => Some(Message::NextLink),
            KeyCode::BackTab => Some(Message::PrevLink),
            KeyCode::Enter if model.focused_link.is_some() => Some(Message::FollowFocusedLink),
            KeyCode::Char('o') => Some(Message::OpenVisibleLinks),

            KeyCode::Char('/' | 's') => Some(Message::StartLookup),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn view(&self, model: &Model, frame: &mut Frame) {
        let _ = self;
        crate::ui::render(model, frame);
    }
}

fn prompt_key(key: KeyEvent, text: &str) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::CancelLookup),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Message::CancelLookup)
        }
        KeyCode::Enter => Some(Message::SubmitLookup(text.to_string())),
        KeyCode::Backspace => {
            let mut next = text.to_string();
            next.pop();
            Some(Message::LookupInput(next))
        }
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            let mut next = text.to_string();
            next.push(c);
            Some(Message::LookupInput(next))
        }
        _ => None,
    }
}

fn picker_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if !matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
        return None;
    }
    let popup = crate::ui::link_picker_rect(screen_area(model), model.link_picker_items.len());
    if point_in_rect(mouse.column, mouse.row, popup) {
        let content_top = crate::ui::link_picker_content_top(popup);
        if mouse.row >= content_top {
            let idx = usize::from((mouse.row - content_top) / 2);
            if idx < model.link_picker_items.len() {
                return u8::try_from(idx + 1).ok().map(Message::SelectVisibleLink);
            }
        }
    }
    Some(Message::CancelVisibleLinkPicker)
}

const fn screen_area(model: &Model) -> Rect {
    Rect::new(
        0,
        0,
        model.viewport.width(),
        model.viewport.height().saturating_add(1),
    )
}

fn document_mouse_area(model: &Model) -> Rect {
    let area = screen_area(model);
    Rect {
        height: area
            .height
            .saturating_sub(crate::ui::footer_rows(model)),
        ..area
    }
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Map a screen cell to (document line, display column), if it is on text.
fn doc_position(model: &Model, doc_area: Rect, col: u16, row: u16) -> Option<(usize, usize)> {
    if !point_in_rect(col, row, doc_area) {
        return None;
    }
    let line = model.viewport.offset() + usize::from(row - doc_area.y);
    if line >= model.document.line_count() {
        return None;
    }
    let column = col.checked_sub(doc_area.x + crate::ui::DOCUMENT_LEFT_PADDING)?;
    Some((line, usize::from(column)))
}
