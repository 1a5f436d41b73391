// src/processor.rs
//! # Stream processor
//! Drives the screening pipeline: consumes stories in chronological order,
//! fans out per company, runs neighbor selection and staleness
//! classification, emits one record per (story, company) pair, and then
//! inserts the story into that company's window.
//!
//! Error policy: malformed stories and empty-token scoring failures are
//! local (logged, counted, stream continues); an out-of-order timestamp is
//! stream-fatal, because the lazy 72-hour pruning cannot be repaired once
//! its precondition is violated.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::classify;
use crate::config::ScreenerConfig;
use crate::error::ScreenError;
use crate::neighbors;
use crate::record::SimilarityRecord;
use crate::sink::RecordSink;
use crate::source::StorySource;
use crate::story::{is_primary_company, RawStory, TokenizedStory};
use crate::window::{HistoryWindow, WindowRegistry};

/// One-time metrics registration (so series show up on an exporter).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("screen_stories_total", "Stories consumed from the source.");
        describe_counter!("screen_records_total", "Similarity records emitted.");
        describe_counter!(
            "screen_skipped_no_companies_total",
            "Stories skipped for carrying no company tags."
        );
        describe_counter!(
            "screen_malformed_total",
            "Stories rejected as malformed before entering any window."
        );
        describe_counter!(
            "screen_empty_tokens_total",
            "(story, company) pairs failed on an empty origin token set."
        );
        describe_counter!(
            "screen_pruned_entries_total",
            "Window entries dropped past the look-back horizon."
        );
    });
}

/// Screen one (story, company) pair against the company's window and insert
/// the story afterwards. Shared by the sequential processor and the
/// per-company workers of the partitioned runner.
pub(crate) fn screen_one(
    story: &Arc<TokenizedStory>,
    company: &str,
    window: &mut HistoryWindow,
    cfg: &ScreenerConfig,
) -> Result<SimilarityRecord, ScreenError> {
    let top = neighbors::select_neighbors(story, window, cfg)?;
    let classification = classify::classify(story, &top, cfg)?;

    let record = SimilarityRecord {
        timestamp: story.timestamp,
        story_id: story.id.clone(),
        company: company.to_string(),
        closest_id: top.first().map(|n| n.story.id.clone()),
        closest_score: top.first().map(|n| n.score),
        total_overlap: classification.total_overlap,
        is_old: classification.is_old,
        is_reprint: classification.is_reprint,
        is_recomb: classification.is_recomb,
    };

    // After classification, so the story never sees itself as a neighbor.
    window.push_front(Arc::clone(story));
    Ok(record)
}

/// Totals for one run, echoed in the final log line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stories: u64,
    pub records: u64,
    pub skipped_no_companies: u64,
    pub malformed: u64,
    pub empty_token_failures: u64,
}

/// Sequential screening over a chronological story stream.
pub struct StreamProcessor {
    registry: WindowRegistry,
    cfg: ScreenerConfig,
    last_timestamp: Option<DateTime<Utc>>,
}

impl StreamProcessor {
    pub fn new(cfg: ScreenerConfig) -> Self {
        ensure_metrics_described();
        Self {
            registry: WindowRegistry::new(),
            cfg,
            last_timestamp: None,
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Process one story: returns the records for its primary companies.
    ///
    /// An `Err` here is stream-fatal (ordering violation); per-pair
    /// empty-token failures are counted in `summary` and do not fail the
    /// call.
    pub fn process_story(
        &mut self,
        raw: RawStory,
        summary: &mut RunSummary,
    ) -> Result<Vec<SimilarityRecord>, ScreenError> {
        counter!("screen_stories_total").increment(1);
        summary.stories += 1;

        if let Some(prev) = self.last_timestamp {
            if raw.timestamp < prev {
                return Err(ScreenError::OutOfOrderInput {
                    prev,
                    got: raw.timestamp,
                });
            }
        }
        self.last_timestamp = Some(raw.timestamp);

        if raw.companies.is_empty() {
            counter!("screen_skipped_no_companies_total").increment(1);
            summary.skipped_no_companies += 1;
            return Ok(Vec::new());
        }

        let story = TokenizedStory::from_raw(raw);
        let mut records = Vec::new();

        for company in story
            .companies
            .iter()
            .filter(|c| is_primary_company(c.as_str()))
        {
            let window = self.registry.window_mut(company);
            match screen_one(&story, company, window, &self.cfg) {
                Ok(record) => {
                    debug!(
                        story = %story.id,
                        company = %company,
                        total_overlap = record.total_overlap,
                        is_old = record.is_old,
                        "screened"
                    );
                    counter!("screen_records_total").increment(1);
                    summary.records += 1;
                    records.push(record);
                }
                Err(e @ ScreenError::EmptyTokenSet { .. }) => {
                    // Recorded as a failure, not silently skipped: it points
                    // at an upstream normalization defect.
                    warn!(story = %story.id, company = %company, error = %e, "scoring failed");
                    counter!("screen_empty_tokens_total").increment(1);
                    summary.empty_token_failures += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }

    /// Drain `source` into `sink`. Per-story failures are logged and
    /// skipped; ordering violations and sink/I/O errors abort the run.
    pub fn run(
        &mut self,
        source: &mut dyn StorySource,
        sink: &mut dyn RecordSink,
    ) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();

        while let Some(item) = source.next_story() {
            let raw = match item {
                Ok(raw) => raw,
                Err(e @ ScreenError::MalformedStory { .. }) => {
                    warn!(error = %e, "skipping malformed story");
                    counter!("screen_malformed_total").increment(1);
                    summary.malformed += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            for record in self.process_story(raw, &mut summary)? {
                sink.write(&record)?;
            }
        }

        sink.flush()?;
        info!(
            stories = summary.stories,
            records = summary.records,
            skipped_no_companies = summary.skipped_no_companies,
            malformed = summary.malformed,
            empty_token_failures = summary.empty_token_failures,
            companies = self.registry.company_count(),
            "screening run finished"
        );
        Ok(summary)
    }
}
