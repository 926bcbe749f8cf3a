use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::document::{Document, LanguageOrdering, LinkRef, LinkTarget};
use crate::history::History;
use crate::ui::viewport::Viewport;

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Severity of a transient status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete viewer state.
///
/// The history owns every entry that has been shown; `document` is only
/// the current entry laid out for the present terminal width.
#[derive(Debug)]
pub struct Model {
    /// Current entry laid out for display
    pub document: Document,
    /// Scroll state of the entry pane
    pub viewport: Viewport,
    /// Back/forward navigation
    pub history: History,
    /// Language filter and order applied to every lookup
    pub ordering: LanguageOrdering,
    /// Use darker colors for light terminal backgrounds
    pub light_background: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    /// Target of the link under the mouse pointer
    pub hovered_link: Option<LinkTarget>,
    /// Index into `document.links()` of the keyboard-focused link
    pub focused_link: Option<usize>,
    /// Pending visible-link picker items (`o`)
    pub link_picker_items: Vec<LinkRef>,
    /// Text typed into the lookup prompt, when open
    pub prompt: Option<String>,
    toast: Option<Toast>,
    pub should_quit: bool,
}

impl Model {
    /// Create an empty model for a terminal of `terminal_size` (columns, rows).
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            document: Document::empty(),
            // Last row is the status bar.
            viewport: Viewport::new(terminal_size.0, terminal_size.1.saturating_sub(1), 0),
            history: History::new(),
            ordering: LanguageOrdering::default(),
            light_background: false,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            hovered_link: None,
            focused_link: None,
            link_picker_items: Vec::new(),
            prompt: None,
            toast: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: LanguageOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub(super) fn layout_width(&self) -> usize {
        usize::from(crate::ui::document_content_width(self.viewport.width()))
    }

    fn layout_current(&mut self) {
        let width = self.layout_width();
        self.document = self
            .history
            .current()
            .map_or_else(Document::empty, |entry| Document::for_entry(entry, width));
        self.viewport.set_total_lines(self.document.line_count());
    }

    /// Lay out the current history entry from the top.
    ///
    /// Called after every history transition; link focus, hover and the
    /// picker refer to the old layout and are dropped.
    pub fn show_current(&mut self) {
        self.layout_current();
        self.viewport.go_to_top();
        self.focused_link = None;
        self.hovered_link = None;
        self.link_picker_items.clear();
    }

    /// Re-wrap the current entry after a width change, keeping the scroll
    /// position where possible.
    pub(super) fn reflow_layout(&mut self) {
        let focused = self.focused_link().map(|link| link.target.clone());
        self.layout_current();
        let range = self.viewport.visible_range();
        self.focused_link = focused.and_then(|target| {
            self.document
                .links()
                .iter()
                .position(|link| link.target == target && range.contains(&link.line))
        });
        self.link_picker_items.clear();
    }

    /// The word currently shown, if any.
    pub fn current_word(&self) -> Option<&str> {
        self.history.current().map(|entry| entry.word.as_str())
    }

    /// Indices into `document.links()` of links on screen, in reading order.
    pub fn visible_link_indices(&self) -> Vec<usize> {
        self.document
            .links_in_range(self.viewport.visible_range())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn focused_link(&self) -> Option<&LinkRef> {
        self.focused_link
            .and_then(|idx| self.document.links().get(idx))
    }

    /// Drop keyboard focus when its link scrolled off screen.
    pub(super) fn clamp_focus(&mut self) {
        let range = self.viewport.visible_range();
        if self
            .focused_link()
            .is_some_and(|link| !range.contains(&link.line))
        {
            self.focused_link = None;
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub const fn link_picker_active(&self) -> bool {
        !self.link_picker_items.is_empty()
    }

    pub const fn prompt_active(&self) -> bool {
        self.prompt.is_some()
    }
}

// Needed for std::mem::take in the event loop.
impl Default for Model {
    fn default() -> Self {
        Self::new((80, 25))
    }
}
