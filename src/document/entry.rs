//! Word entries: raw records grouped by language, and language ordering.

use std::cmp::Ordering;

use crate::lookup::RawRecord;

/// Language used when a record does not name one.
pub const UNSPECIFIED_LANGUAGE: &str = "unspecified language";

/// Part of speech used when a record does not name one.
pub const UNSPECIFIED_PART_OF_SPEECH: &str = "unspecified part of speech";

/// One part-of-speech scoped meaning of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sense {
    pub part_of_speech: String,
    pub gender: Option<String>,
    /// Raw definition markup fragment
    pub definition: String,
    /// Raw example markup fragments
    pub examples: Vec<String>,
}

/// Senses of one language, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageGroup {
    pub language: String,
    pub senses: Vec<Sense>,
}

/// Everything known about a word; the unit kept in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub groups: Vec<LanguageGroup>,
}

impl WordEntry {
    /// Total number of senses across all languages.
    pub fn sense_count(&self) -> usize {
        self.groups.iter().map(|group| group.senses.len()).sum()
    }
}

/// Group raw records by language.
///
/// Senses are collected newest-first per language and reversed once at
/// the end, which restores arrival order; senses with a blank definition
/// are dropped during that reversal. Languages keep first-seen order.
pub fn aggregate(word: &str, records: &[RawRecord]) -> WordEntry {
    let mut collected: Vec<(String, Vec<Sense>)> = Vec::new();

    for record in records {
        let language = record
            .language
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_LANGUAGE.to_string());
        let part_of_speech = record
            .part_of_speech
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_PART_OF_SPEECH.to_string());

        let index = match collected.iter().position(|(name, _)| *name == language) {
            Some(index) => index,
            None => {
                collected.push((language, Vec::new()));
                collected.len() - 1
            }
        };
        let pending = &mut collected[index].1;
        for raw in &record.definitions {
            pending.insert(
                0,
                Sense {
                    part_of_speech: part_of_speech.clone(),
                    gender: record.gender.clone(),
                    definition: raw.definition.clone(),
                    examples: raw.examples.clone(),
                },
            );
        }
    }

    let groups = collected
        .into_iter()
        .map(|(language, pending)| LanguageGroup {
            language,
            senses: pending
                .into_iter()
                .rev()
                .filter(|sense| !sense.definition.trim().is_empty())
                .collect(),
        })
        .collect();

    WordEntry {
        word: word.to_string(),
        groups,
    }
}

/// User preference for which languages to show, and in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOrdering {
    /// Languages listed first, in this order
    pub priority: Vec<String>,
    /// Whether languages missing from `priority` are shown at all
    pub show_unlisted: bool,
}

impl Default for LanguageOrdering {
    fn default() -> Self {
        Self {
            priority: Vec::new(),
            show_unlisted: true,
        }
    }
}

impl LanguageOrdering {
    pub const fn new(priority: Vec<String>, show_unlisted: bool) -> Self {
        Self {
            priority,
            show_unlisted,
        }
    }

    /// Filter and sort language groups.
    pub fn order(&self, groups: Vec<LanguageGroup>) -> Vec<LanguageGroup> {
        order(groups, &self.priority, self.show_unlisted)
    }

    /// Reorder the groups of an entry.
    pub fn apply(&self, entry: WordEntry) -> WordEntry {
        WordEntry {
            groups: self.order(entry.groups),
            ..entry
        }
    }
}

fn rank_in(priority: &[String], language: &str) -> Option<usize> {
    priority.iter().position(|listed| listed == language)
}

/// Filter and sort language groups by a priority list.
///
/// Listed languages come first in list order; unlisted ones follow in
/// byte-wise order of their names, or are dropped when `show_unlisted`
/// is false.
pub fn order(
    groups: Vec<LanguageGroup>,
    priority: &[String],
    show_unlisted: bool,
) -> Vec<LanguageGroup> {
    let mut kept: Vec<LanguageGroup> = groups
        .into_iter()
        .filter(|group| show_unlisted || rank_in(priority, &group.language).is_some())
        .collect();
    kept.sort_by(|a, b| {
        match (
            rank_in(priority, &a.language),
            rank_in(priority, &b.language),
        ) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.language.cmp(&b.language),
        }
    });
    kept
}
