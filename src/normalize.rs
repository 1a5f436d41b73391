// src/normalize.rs
//! Text normalization: lowercase tokenization, stopword removal, and a light
//! suffix stemmer. Pure and deterministic; the same function is used for
//! story bodies and for the merged-neighbor synthetic text, so both sides of
//! every comparison share one token alphabet.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").expect("token regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
        "because", "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
        "has", "have", "he", "her", "his", "i", "if", "in", "into", "is", "it", "its", "may",
        "more", "most", "no", "not", "of", "on", "or", "our", "said", "she", "should", "so",
        "some", "such", "than", "that", "the", "their", "them", "then", "there", "these", "they",
        "this", "to", "up", "was", "we", "were", "which", "while", "who", "will", "with", "would",
        "you",
    ]
    .into_iter()
    .collect()
});

/// Normalize raw body text into a comparable token set.
///
/// Set semantics: duplicates collapse, order is irrelevant. `BTreeSet` keeps
/// iteration deterministic for tests and debugging.
pub fn normalize(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let mut out = BTreeSet::new();
    for m in TOKEN_RE.find_iter(&lower) {
        let word = m.as_str();
        if word.len() < 2 || STOPWORDS.contains(word) {
            continue;
        }
        let stemmed = stem(word);
        if stemmed.len() >= 2 {
            out.insert(stemmed);
        }
    }
    out
}

/// Light suffix stripping, roughly Porter step 1. Plural handling runs
/// before participle handling so chains like earnings → earning → earn
/// resolve the same way from any starting form.
fn stem(word: &str) -> String {
    let mut w = word.strip_suffix("'s").unwrap_or(word).to_string();

    // Plurals.
    if w.len() > 4 && w.ends_with("ies") {
        w.truncate(w.len() - 3);
        w.push('y');
    } else if w.len() > 3 && w.ends_with('s') && !w.ends_with("ss") {
        w.truncate(w.len() - 1);
    }

    // Participles.
    if w.len() > 5 && w.ends_with("ing") {
        w.truncate(w.len() - 3);
    } else if w.len() > 4 && w.ends_with("ied") {
        w.truncate(w.len() - 3);
        w.push('y');
    } else if w.len() > 4 && w.ends_with("ed") {
        w.truncate(w.len() - 2);
    }
    w
}
