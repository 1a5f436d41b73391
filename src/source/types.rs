// src/source/types.rs
//! Story source contract: a lazy, non-restartable sequence of raw stories in
//! non-decreasing timestamp order. Ordering is the caller's obligation; the
//! processor enforces it defensively and aborts on violation.

use std::collections::VecDeque;

use crate::error::ScreenError;
use crate::story::RawStory;

/// Pull-based story supply. `next_story` yields `None` when the stream is
/// exhausted; a `MalformedStory` item is a per-story failure and does not
/// end the stream.
pub trait StorySource {
    fn next_story(&mut self) -> Option<Result<RawStory, ScreenError>>;
}

/// In-memory source over a fixed list of stories. Used by tests and by the
/// partitioned runner's synthetic inputs.
#[derive(Debug, Default)]
pub struct StaticSource {
    queue: VecDeque<Result<RawStory, ScreenError>>,
}

impl StaticSource {
    pub fn new(stories: impl IntoIterator<Item = RawStory>) -> Self {
        Self {
            queue: stories.into_iter().map(Ok).collect(),
        }
    }

    /// Build a source that also yields failures, for error-path tests.
    pub fn from_results(items: impl IntoIterator<Item = Result<RawStory, ScreenError>>) -> Self {
        Self {
            queue: items.into_iter().collect(),
        }
    }
}

impl StorySource for StaticSource {
    fn next_story(&mut self) -> Option<Result<RawStory, ScreenError>> {
        self.queue.pop_front()
    }
}
