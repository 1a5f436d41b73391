// src/classify.rs
//! # Staleness classification
//! Two-level decision over the top-k neighbors. First: is this old news at
//! all (aggregate overlap against the merged neighbor text)? Second, only if
//! so: is it a near-copy of one source (reprint) or a blend of several
//! (recombination)? The two flags are mutually exclusive and only meaningful
//! when `is_old` holds.

use crate::config::ScreenerConfig;
use crate::error::ScreenError;
use crate::neighbors::Neighbor;
use crate::normalize::normalize;
use crate::similarity;
use crate::story::TokenizedStory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub is_old: bool,
    pub is_reprint: bool,
    pub is_recomb: bool,
    pub total_overlap: f64,
}

impl Classification {
    fn fresh() -> Self {
        Self {
            is_old: false,
            is_reprint: false,
            is_recomb: false,
            total_overlap: 0.0,
        }
    }
}

/// Classify `story` against its already-selected neighbors.
///
/// The merged neighbor is synthesized by concatenating the neighbors' raw
/// text and normalizing it exactly as a standalone story body would be;
/// with set semantics the neighbor order cannot affect the result.
/// `closest_score` is read from `neighbors[0]`, never recomputed.
pub fn classify(
    story: &TokenizedStory,
    neighbors: &[Neighbor],
    cfg: &ScreenerConfig,
) -> Result<Classification, ScreenError> {
    if neighbors.is_empty() {
        return Ok(Classification::fresh());
    }

    let merged_text = neighbors
        .iter()
        .map(|n| n.story.raw_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let merged_tokens = normalize(&merged_text);

    let total_overlap = similarity::score(story, &merged_tokens)?;
    let closest_score = neighbors[0].score;

    let is_old = total_overlap >= cfg.stale_threshold;
    let is_reprint = is_old && closest_score >= cfg.reprint_threshold;
    let is_recomb = is_old && !is_reprint;

    Ok(Classification {
        is_old,
        is_reprint,
        is_recomb,
        total_overlap,
    })
}
