//! Definition lookups over HTTP.
//!
//! [`DefinitionSource`] is the seam between the viewer and the network:
//! [`WiktionaryClient`] talks to a Wiktionary-style REST endpoint, and any
//! `Fn(&str) -> Result<RawLookupResult, LookupError>` works as a stand-in.

mod raw;

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use thiserror::Error;

use crate::document::{LanguageOrdering, WordEntry, aggregate};

pub use raw::{RawLookupResult, RawRecord, RawSense};

/// Default definition endpoint; the URL-escaped word is appended as a path segment.
pub const DEFAULT_ENDPOINT: &str = "https://en.wiktionary.org/api/rest_v1/page/definition";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A failed lookup. History and display state are left as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The service answered with something other than 200.
    #[error("no definition for \"{word}\" (HTTP {status})")]
    Status { word: String, status: u16 },
    /// The request never completed.
    #[error("lookup of \"{word}\" failed: {message}")]
    Transport { word: String, message: String },
    /// The body was not a definition response.
    #[error("unreadable definition for \"{word}\": {message}")]
    Decode { word: String, message: String },
}

impl LookupError {
    /// The word whose lookup failed.
    pub fn word(&self) -> &str {
        match self {
            Self::Status { word, .. } | Self::Transport { word, .. } | Self::Decode { word, .. } => {
                word
            }
        }
    }
}

/// Something that can fetch raw definition records for a word.
pub trait DefinitionSource {
    /// Fetch the raw records for `word`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on non-200 responses, transport failures,
    /// or undecodable bodies.
    fn fetch_definition(&self, word: &str) -> Result<RawLookupResult, LookupError>;
}

impl<F> DefinitionSource for F
where
    F: Fn(&str) -> Result<RawLookupResult, LookupError>,
{
    fn fetch_definition(&self, word: &str) -> Result<RawLookupResult, LookupError> {
        self(word)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking client for a Wiktionary-style definition endpoint.
#[derive(Debug, Clone)]
pub struct WiktionaryClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl WiktionaryClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized
    /// (for example when no TLS backend is available).
    pub fn new(config: &ClientConfig) -> reqwest::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Request URL for `word`.
    pub fn url_for(&self, word: &str) -> String {
        definition_url(&self.endpoint, word)
    }
}

fn definition_url(endpoint: &str, word: &str) -> String {
    format!("{endpoint}/{}", utf8_percent_encode(word, NON_ALPHANUMERIC))
}

impl DefinitionSource for WiktionaryClient {
    fn fetch_definition(&self, word: &str) -> Result<RawLookupResult, LookupError> {
        let url = self.url_for(word);
        tracing::debug!(%url, "fetching definition");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|err| LookupError::Transport {
                word: word.to_string(),
                message: err.to_string(),
            })?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(%url, status = status.as_u16(), "definition lookup rejected");
            return Err(LookupError::Status {
                word: word.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(|err| LookupError::Transport {
            word: word.to_string(),
            message: err.to_string(),
        })?;
        serde_json::from_str::<RawLookupResult>(&body).map_err(|err| {
            tracing::debug!(%url, %err, "undecodable definition body");
            LookupError::Decode {
                word: word.to_string(),
                message: err.to_string(),
            }
        })
    }
}

/// Fetch, aggregate, and order the entry for `word`.
///
/// # Errors
///
/// Propagates the source's [`LookupError`].
pub fn lookup_entry<S>(
    source: &S,
    word: &str,
    ordering: &LanguageOrdering,
) -> Result<WordEntry, LookupError>
where
    S: DefinitionSource + ?Sized,
{
    let raw = source.fetch_definition(word)?;
    let entry = aggregate(word, &raw.records);
    tracing::debug!(
        word,
        records = raw.records.len(),
        languages = entry.groups.len(),
        "aggregated definition"
    );
    Ok(ordering.apply(entry))
}
