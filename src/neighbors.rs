// src/neighbors.rs
//! Top-k nearest-neighbor selection over a company's history window.
//!
//! The traversal doubles as the pruning pass: walking newest to oldest, the
//! first entry past the look-back horizon truncates the tail right there and
//! stops the walk. That is the only pruning trigger anywhere in the crate.

use metrics::counter;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::ScreenerConfig;
use crate::error::ScreenError;
use crate::similarity;
use crate::story::TokenizedStory;
use crate::window::HistoryWindow;

/// One scored prior story. The score is computed once here and reused by the
/// classifier (closest_score is never recomputed).
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub score: f64,
    pub story: Arc<TokenizedStory>,
}

/// Score `story` against every in-horizon entry of its company's window,
/// prune the tail past the horizon, and return the `top_k` best matches,
/// highest score first.
///
/// Tie-break is normative: among equal scores, the entry encountered first
/// during the newest-to-oldest walk wins (the more recent story).
pub fn select_neighbors(
    story: &TokenizedStory,
    window: &mut HistoryWindow,
    cfg: &ScreenerConfig,
) -> Result<Vec<Neighbor>, ScreenError> {
    if window.is_empty() {
        return Ok(Vec::new());
    }

    let horizon = cfg.lookback();
    let mut scored: Vec<(f64, usize)> = Vec::with_capacity(window.len());

    let mut cut_at: Option<usize> = None;
    let mut idx = 0;
    while let Some(entry) = window.get(idx) {
        if story.timestamp - entry.timestamp > horizon {
            cut_at = Some(idx);
            break;
        }
        let sim = similarity::score(story, &entry.tokens)?;
        scored.push((sim, idx));
        idx += 1;
    }

    if let Some(at) = cut_at {
        let pruned = window.truncate_tail(at);
        counter!("screen_pruned_entries_total").increment(pruned as u64);
    }

    // Highest score first; on ties the smaller index (more recent entry)
    // wins. Scores are finite in [0,1], so partial_cmp cannot fail.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    Ok(scored
        .into_iter()
        .take(cfg.top_k)
        .map(|(score, idx)| Neighbor {
            score,
            story: Arc::clone(window.get(idx).expect("scored index within window")),
        })
        .collect())
}
