//! Back/forward navigation over looked-up entries.

use std::fmt;

use thiserror::Error;

use crate::document::{LanguageOrdering, LinkTarget, WordEntry};
use crate::lookup::{DefinitionSource, LookupError, lookup_entry};

/// Which way a history step goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Back => f.write_str("back"),
            Self::Forward => f.write_str("forward"),
        }
    }
}

/// A back or forward step with nothing to step to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no {direction} history")]
pub struct NoHistoryError {
    pub direction: Direction,
}

/// Why following a link did not change the current entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigateError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// A self-link was followed before anything was loaded.
    #[error("nothing is loaded yet")]
    NothingLoaded,
}

/// Coarse history state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Empty,
    Loaded,
}

/// Browser-style history: a current entry between a back and a forward stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    current: Option<WordEntry>,
    back: Vec<WordEntry>,
    forward: Vec<WordEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> HistoryStatus {
        if self.current.is_some() {
            HistoryStatus::Loaded
        } else {
            HistoryStatus::Empty
        }
    }

    pub const fn current(&self) -> Option<&WordEntry> {
        self.current.as_ref()
    }

    /// Make `entry` current. The previous entry moves to the back stack
    /// and the forward stack is discarded.
    pub fn load(&mut self, entry: WordEntry) -> &WordEntry {
        if let Some(previous) = self.current.take() {
            self.back.push(previous);
        }
        self.forward.clear();
        tracing::debug!(word = %entry.word, back = self.back.len(), "loaded entry");
        self.current.insert(entry)
    }

    /// Step back one entry.
    ///
    /// # Errors
    ///
    /// Returns [`NoHistoryError`] if the back stack is empty; nothing changes.
    pub fn back(&mut self) -> Result<&WordEntry, NoHistoryError> {
        Self::step(
            &mut self.current,
            &mut self.back,
            &mut self.forward,
            Direction::Back,
        )
    }

    /// Step forward one entry.
    ///
    /// # Errors
    ///
    /// Returns [`NoHistoryError`] if the forward stack is empty; nothing changes.
    pub fn forward(&mut self) -> Result<&WordEntry, NoHistoryError> {
        Self::step(
            &mut self.current,
            &mut self.forward,
            &mut self.back,
            Direction::Forward,
        )
    }

    fn step<'a>(
        current: &'a mut Option<WordEntry>,
        from: &mut Vec<WordEntry>,
        to: &mut Vec<WordEntry>,
        direction: Direction,
    ) -> Result<&'a WordEntry, NoHistoryError> {
        let Some(next) = from.pop() else {
            return Err(NoHistoryError { direction });
        };
        if let Some(previous) = current.take() {
            to.push(previous);
        }
        Ok(current.insert(next))
    }

    /// Follow a link.
    ///
    /// A [`LinkTarget::CurrentPage`] target reloads the current entry
    /// without consulting `source`; a word target is looked up and loaded.
    ///
    /// # Errors
    ///
    /// Returns [`NavigateError::Lookup`] when the lookup fails and
    /// [`NavigateError::NothingLoaded`] for a self-link on an empty
    /// history. History is unchanged in both cases.
    pub fn navigate<S>(
        &mut self,
        target: &LinkTarget,
        source: &S,
        ordering: &LanguageOrdering,
    ) -> Result<&WordEntry, NavigateError>
    where
        S: DefinitionSource + ?Sized,
    {
        let entry = match target {
            LinkTarget::CurrentPage => self
                .current
                .clone()
                .ok_or(NavigateError::NothingLoaded)?,
            LinkTarget::Word(word) => lookup_entry(source, word, ordering)?,
        };
        Ok(self.load(entry))
    }

    pub const fn back_len(&self) -> usize {
        self.back.len()
    }

    pub const fn forward_len(&self) -> usize {
        self.forward.len()
    }
}
