// src/similarity.rs
//! Asymmetric token-overlap scorer.
//!
//! `score(origin, other) = |tokens(origin) ∩ tokens(other)| / |tokens(origin)|`.
//! The denominator is always the origin's token count, so the measure answers
//! "how much of THIS story has been seen before", not "how similar are these
//! two stories". A zero-token origin is a defined error, not a silent zero:
//! it means normalization upstream produced nothing to compare.

use std::collections::BTreeSet;

use crate::error::ScreenError;
use crate::story::TokenizedStory;

/// Overlap of `other` against `origin`, in `[0, 1]`.
pub fn score(origin: &TokenizedStory, other: &BTreeSet<String>) -> Result<f64, ScreenError> {
    if origin.tokens.is_empty() {
        return Err(ScreenError::EmptyTokenSet {
            story_id: origin.id.clone(),
        });
    }
    let shared = origin.tokens.intersection(other).count();
    Ok(shared as f64 / origin.tokens.len() as f64)
}
