use crate::app::{App, Message, Model, ToastLevel};
use crate::document::LinkTarget;

/// Most links the picker offers; keys 1-9 select them.
const LINK_PICKER_LIMIT: usize = 9;

impl App {
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: &Message) {
        match msg {
            Message::FollowFocusedLink => {
                if let Some(target) = model.focused_link().map(|link| link.target.clone()) {
                    self.follow_target(model, &target);
                }
            }
            Message::OpenVisibleLinks => self.open_visible_links(model),
            Message::SelectVisibleLink(index) => self.follow_link_picker_index(model, *index),
            Message::FollowLinkAt(line, column) => {
                if let Some(target) = model
                    .document
                    .link_at(*line, *column)
                    .map(|link| link.target.clone())
                {
                    self.follow_target(model, &target);
                }
            }
            Message::SubmitLookup(word) => {
                let word = word.trim();
                if !word.is_empty() {
                    self.follow_target(model, &LinkTarget::Word(word.to_string()));
                }
            }
            _ => {}
        }
    }

    fn open_visible_links(&self, model: &mut Model) {
        let mut visible: Vec<_> = model
            .document
            .links_in_range(model.viewport.visible_range())
            .map(|(_, link)| link.clone())
            .collect();
        visible.truncate(LINK_PICKER_LIMIT);

        match visible.len() {
            0 => model.show_toast(ToastLevel::Info, "No visible links"),
            1 => self.follow_target(model, &visible[0].target),
            _ => {
                model.link_picker_items = visible;
                model.show_toast(ToastLevel::Info, "Select link: 1-9 (Esc to cancel)");
            }
        }
    }

    fn follow_link_picker_index(&self, model: &mut Model, index: u8) {
        let Some(idx) = usize::from(index).checked_sub(1) else {
            return;
        };
        let Some(link) = model.link_picker_items.get(idx) else {
            return;
        };
        let target = link.target.clone();
        model.link_picker_items.clear();
        self.follow_target(model, &target);
    }

    /// Navigate to `target` and show the result, or report why not.
    ///
    /// A failed lookup leaves history and display as they were.
    pub(super) fn follow_target(&self, model: &mut Model, target: &LinkTarget) {
        tracing::debug!(%target, "following link");
        let result = model
            .history
            .navigate(target, self.source.as_ref(), &model.ordering)
            .map(|entry| entry.word.clone());
        match result {
            Ok(word) => {
                model.show_current();
                if matches!(target, LinkTarget::CurrentPage) {
                    model.show_toast(ToastLevel::Info, format!("Already showing \"{word}\""));
                }
            }
            Err(err) => {
                tracing::warn!(%target, %err, "navigation failed");
                model.show_toast(ToastLevel::Error, err.to_string());
            }
        }
    }
}
