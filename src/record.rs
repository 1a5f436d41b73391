// src/record.rs
//! Output record shape: one row per screened (story, company) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Similarity/classification result for one (story, company) pair, in the
/// column order of the reference export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    /// Publication instant of the screened story (UTC).
    pub timestamp: DateTime<Utc>,
    pub story_id: String,
    /// Primary company/ticker this row was screened under.
    pub company: String,
    /// Closest in-horizon prior story, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest_score: Option<f64>,
    /// Overlap against the merged top-k neighbor text.
    pub total_overlap: f64,
    pub is_old: bool,
    pub is_reprint: bool,
    pub is_recomb: bool,
}
