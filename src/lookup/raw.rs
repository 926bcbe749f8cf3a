//! Wire types for definition responses.
//!
//! The service answers with a JSON object keyed by source language code,
//! each value an array of per-language, per-part-of-speech records:
//!
//! ```json
//! { "en": [ { "language": "English", "partOfSpeech": "Noun",
//!             "definitions": [ { "definition": "<b>...</b>", "examples": ["..."] } ] } ] }
//! ```

use std::fmt;

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// One language/part-of-speech chunk of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub definitions: Vec<RawSense>,
}

/// One definition inside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSense {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// All records of a response, flattened in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLookupResult {
    pub records: Vec<RawRecord>,
}

impl From<Vec<RawRecord>> for RawLookupResult {
    fn from(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

struct LookupResultVisitor;

impl<'de> Visitor<'de> for LookupResultVisitor {
    type Value = RawLookupResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of record arrays or an array of records")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut records = Vec::new();
        while let Some((source, chunk)) = map.next_entry::<String, Vec<RawRecord>>()? {
            tracing::trace!(%source, records = chunk.len(), "decoded definition source");
            records.extend(chunk);
        }
        Ok(RawLookupResult { records })
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut records = Vec::new();
        while let Some(record) = seq.next_element::<RawRecord>()? {
            records.push(record);
        }
        Ok(RawLookupResult { records })
    }
}

impl<'de> Deserialize<'de> for RawLookupResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LookupResultVisitor)
    }
}
