// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod classify;
pub mod concurrent;
pub mod config;
pub mod error;
pub mod neighbors;
pub mod normalize;
pub mod processor;
pub mod record;
pub mod similarity;
pub mod sink;
pub mod source;
pub mod story;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::config::ScreenerConfig;
pub use crate::error::ScreenError;
pub use crate::processor::{RunSummary, StreamProcessor};
pub use crate::record::SimilarityRecord;
pub use crate::sink::{CsvSink, JsonlSink, MemorySink, RecordSink};
pub use crate::source::{NmlFileSource, StaticSource, StorySource};
pub use crate::story::{RawStory, TokenizedStory};
