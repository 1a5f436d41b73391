// src/error.rs
//! Typed errors for the screening core.
//!
//! Per-story failures (`EmptyTokenSet`, `MalformedStory`) are local: the
//! affected story or (story, company) pair is logged and counted, and the
//! stream continues. `OutOfOrderInput` is stream-fatal, because the 72-hour
//! pruning invariant cannot be locally repaired once it is violated.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    /// A story with zero normalized tokens was presented as the origin of a
    /// similarity comparison. Signals an upstream normalization defect.
    #[error("story {story_id} has no tokens after normalization")]
    EmptyTokenSet { story_id: String },

    /// A story is missing a required field or could not be parsed at all.
    /// The whole story is skipped (all its company associations).
    #[error("malformed story: {reason}")]
    MalformedStory { reason: String },

    /// The global non-decreasing timestamp precondition was violated.
    #[error("out-of-order input: story at {got} arrived after {prev}")]
    OutOfOrderInput {
        prev: DateTime<Utc>,
        got: DateTime<Utc>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScreenError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedStory {
            reason: reason.into(),
        }
    }

    /// Local failures skip a story (or pair) and let the stream continue;
    /// everything else aborts the run.
    pub fn is_stream_fatal(&self) -> bool {
        matches!(
            self,
            Self::OutOfOrderInput { .. } | Self::Io(_)
        )
    }
}
