use crate::app::{Model, ToastLevel};
use crate::document::LinkTarget;

/// All possible events and actions in the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Scrolling
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    GoToTop,
    GoToBottom,

    // History
    /// Show the previous entry
    Back,
    /// Show the next entry
    Forward,

    // Links
    /// Move keyboard focus to the next visible link
    NextLink,
    /// Move keyboard focus to the previous visible link
    PrevLink,
    /// Follow the focused link
    FollowFocusedLink,
    /// Open visible-link picker (or follow directly when single link)
    OpenVisibleLinks,
    /// Follow numbered link in the picker
    SelectVisibleLink(u8),
    /// Close visible-link picker
    CancelVisibleLinkPicker,
    /// Follow the link at a rendered line and display column
    FollowLinkAt(usize, usize),
    /// Update hovered link target (or clear when none)
    HoverLink(Option<LinkTarget>),

    // Lookup prompt
    /// Open the lookup prompt
    StartLookup,
    /// Replace the prompt text
    LookupInput(String),
    /// Look up a word typed into the prompt
    SubmitLookup(String),
    /// Close the prompt without looking anything up
    CancelLookup,

    ToggleHelp,
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    Redraw,

    Quit,
}

/// Pure state transition.
///
/// Anything that needs the definition source (following links, prompt
/// lookups) is left to `App::handle_message_side_effects`; history steps
/// never consult it and are handled here.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        Message::Back => match model.history.back() {
            Ok(entry) => {
                tracing::debug!(word = %entry.word, "history back");
                model.show_current();
            }
            Err(err) => model.show_toast(ToastLevel::Info, err.to_string()),
        },
        Message::Forward => match model.history.forward() {
            Ok(entry) => {
                tracing::debug!(word = %entry.word, "history forward");
                model.show_current();
            }
            Err(err) => model.show_toast(ToastLevel::Info, err.to_string()),
        },

        Message::NextLink => move_focus(&mut model, true),
        Message::PrevLink => move_focus(&mut model, false),
        Message::CancelVisibleLinkPicker => model.link_picker_items.clear(),
        Message::HoverLink(target) => model.hovered_link = target,
        // Handled as side effects.
        Message::FollowFocusedLink
        | Message::OpenVisibleLinks
        | Message::SelectVisibleLink(_)
        | Message::FollowLinkAt(_, _)
        | Message::Redraw => {}

        Message::StartLookup => {
            model.prompt = Some(String::new());
            model.link_picker_items.clear();
        }
        Message::LookupInput(text) => model.prompt = Some(text),
        Message::SubmitLookup(_) | Message::CancelLookup => model.prompt = None,

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        Message::Resize(width, height) => {
            let reflow = width != model.viewport.width();
            model.viewport.resize(width, height.saturating_sub(1));
            if reflow {
                model.reflow_layout();
            }
        }
        Message::Quit => model.should_quit = true,
    }
    model.clamp_focus();
    model
}

/// Cycle keyboard focus through the links on screen.
fn move_focus(model: &mut Model, forward: bool) {
    let visible = model.visible_link_indices();
    if visible.is_empty() {
        model.focused_link = None;
        return;
    }
    let position = model
        .focused_link
        .and_then(|focused| visible.iter().position(|&idx| idx == focused));
    let next = match (position, forward) {
        (None, true) => 0,
        (None, false) => visible.len() - 1,
        (Some(pos), true) => (pos + 1) % visible.len(),
        (Some(pos), false) => pos.checked_sub(1).unwrap_or(visible.len() - 1),
    };
    model.focused_link = visible.get(next).copied();
    if let Some(link) = model.focused_link() {
        let target = link.target.clone();
        model.hovered_link = Some(target);
    }
}
