// src/story.rs
//! Story entities: the raw record as produced by a source, and the immutable
//! normalized form shared across company windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::normalize::normalize;

/// A story as delivered by a source, before normalization. Field extraction
/// and format concerns live in `source`; by the time a `RawStory` exists it
/// is structurally complete (id and timestamp present).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStory {
    /// Opaque identifier, unique within the source system
    /// (accession number for Dow Jones newswires).
    pub id: String,
    /// Timezone-normalized publication instant; the stream arrives
    /// non-decreasing in this field.
    pub timestamp: DateTime<Utc>,
    /// Company/ticker tags; may be empty.
    pub companies: Vec<String>,
    /// Body text.
    pub text: String,
}

/// Immutable normalized representation of one story.
///
/// Constructed once per story and shared read-only (via `Arc`) across every
/// company window it belongs to; it is inserted once per window but never
/// copied or mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedStory {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub companies: Vec<String>,
    /// Original body text, kept only for the merged-neighbor comparison.
    pub raw_text: String,
    /// Normalized token set derived from `raw_text` (set semantics).
    pub tokens: BTreeSet<String>,
}

impl TokenizedStory {
    pub fn from_raw(raw: RawStory) -> Arc<Self> {
        let tokens = normalize(&raw.text);
        Arc::new(Self {
            id: raw.id,
            timestamp: raw.timestamp,
            companies: raw.companies,
            raw_text: raw.text,
            tokens,
        })
    }
}

/// A company tag containing a separator denotes an alternate listing
/// (e.g. `ABC.O`), not an eligible primary company.
pub fn is_primary_company(tag: &str) -> bool {
    !tag.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_raw_normalizes_body() {
        let raw = RawStory {
            id: "A1".into(),
            timestamp: Utc.with_ymd_and_hms(2001, 10, 4, 12, 0, 0).unwrap(),
            companies: vec!["ACME".into()],
            text: "Acme announces record earnings".into(),
        };
        let story = TokenizedStory::from_raw(raw);
        assert!(story.tokens.contains("acme"));
        assert!(story.tokens.contains("earn"));
        assert_eq!(story.raw_text, "Acme announces record earnings");
    }

    #[test]
    fn alternate_listings_are_not_primary() {
        assert!(is_primary_company("ABC"));
        assert!(!is_primary_company("ABC.O"));
        assert!(!is_primary_company("XYZ.L"));
    }
}
