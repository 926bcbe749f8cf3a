//! Viewer state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete viewer state, including history
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::document::{LanguageOrdering, WordEntry};
use crate::lookup::{DefinitionSource, LookupError, lookup_entry};

/// Owns the definition source and runs the viewer.
pub struct App {
    source: Box<dyn DefinitionSource>,
    ordering: LanguageOrdering,
    initial_word: Option<String>,
    light_background: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("ordering", &self.ordering)
            .field("initial_word", &self.initial_word)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create a viewer that looks words up through `source`.
    pub fn new(source: Box<dyn DefinitionSource>) -> Self {
        Self {
            source,
            ordering: LanguageOrdering::default(),
            initial_word: None,
            light_background: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Word to look up before the first frame.
    #[must_use]
    pub fn with_initial_word(mut self, word: Option<String>) -> Self {
        self.initial_word = word;
        self
    }

    /// Language filter and order for every lookup.
    #[must_use]
    pub fn with_ordering(mut self, ordering: LanguageOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    #[must_use]
    pub const fn with_light_background(mut self, light: bool) -> Self {
        self.light_background = light;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Look `word` up with this viewer's source and ordering.
    ///
    /// # Errors
    ///
    /// Returns the source's [`LookupError`].
    pub fn lookup(&self, word: &str) -> Result<WordEntry, LookupError> {
        lookup_entry(self.source.as_ref(), word, &self.ordering)
    }

    /// Build the starting model for a terminal of `size`.
    ///
    /// `entry`, when given, becomes the first history entry.
    pub fn initial_model(&self, size: (u16, u16), entry: Option<WordEntry>) -> Model {
        let mut model = Model::new(size).with_ordering(self.ordering.clone());
        model.light_background = self.light_background;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        match entry {
            Some(entry) => {
                model.history.load(entry);
                model.show_current();
            }
            None => model.prompt = Some(String::new()),
        }
        model
    }
}

#[cfg(test)]
mod tests;
