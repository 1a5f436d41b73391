// src/concurrent.rs
//! Per-company partitioned runner.
//!
//! A company's window is only ever touched while screening stories tagged
//! with that company, so companies can proceed in parallel as long as each
//! company's stories keep their global arrival order. The dispatcher
//! consumes the stream sequentially (enforcing the ordering precondition)
//! and routes each story to a per-company worker over an mpsc channel;
//! every worker owns its window exclusively and drains its queue strictly
//! in order.
//!
//! Per-company record order matches the sequential processor exactly;
//! cross-company interleaving in the returned vector is unspecified.

use chrono::{DateTime, Utc};
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::warn;

use crate::config::ScreenerConfig;
use crate::error::ScreenError;
use crate::processor::screen_one;
use crate::record::SimilarityRecord;
use crate::story::{is_primary_company, RawStory, TokenizedStory};
use crate::window::HistoryWindow;

async fn company_worker(
    company: String,
    cfg: ScreenerConfig,
    mut rx: mpsc::UnboundedReceiver<Arc<TokenizedStory>>,
    out: mpsc::UnboundedSender<SimilarityRecord>,
) {
    let mut window = HistoryWindow::new();
    while let Some(story) = rx.recv().await {
        match screen_one(&story, &company, &mut window, &cfg) {
            Ok(record) => {
                if out.send(record).is_err() {
                    return; // collector gone, nothing left to do
                }
            }
            Err(e @ ScreenError::EmptyTokenSet { .. }) => {
                warn!(story = %story.id, company = %company, error = %e, "scoring failed");
                counter!("screen_empty_tokens_total").increment(1);
            }
            // screen_one only fails on scoring; the arms above are complete,
            // but keep the stream alive if that ever changes.
            Err(e) => warn!(company = %company, error = %e, "worker error"),
        }
    }
}

/// Screen a chronological batch with one worker per company.
pub async fn run_partitioned(
    stories: Vec<RawStory>,
    cfg: ScreenerConfig,
) -> Result<Vec<SimilarityRecord>, ScreenError> {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let mut workers: HashMap<String, mpsc::UnboundedSender<Arc<TokenizedStory>>> = HashMap::new();
    let mut tasks = JoinSet::new();

    let mut last_timestamp: Option<DateTime<Utc>> = None;

    for raw in stories {
        if let Some(prev) = last_timestamp {
            if raw.timestamp < prev {
                return Err(ScreenError::OutOfOrderInput {
                    prev,
                    got: raw.timestamp,
                });
            }
        }
        last_timestamp = Some(raw.timestamp);

        if raw.companies.is_empty() {
            continue;
        }
        let story = TokenizedStory::from_raw(raw);

        for company in story
            .companies
            .iter()
            .filter(|c| is_primary_company(c.as_str()))
        {
            let tx = workers.entry(company.clone()).or_insert_with(|| {
                let (tx, rx) = mpsc::unbounded_channel();
                tasks.spawn(company_worker(
                    company.clone(),
                    cfg.clone(),
                    rx,
                    out_tx.clone(),
                ));
                tx
            });
            // A worker only exits when its sender side is dropped below.
            let _ = tx.send(Arc::clone(&story));
        }
    }

    // Close all queues; workers drain them in order and exit.
    drop(workers);
    drop(out_tx);
    while tasks.join_next().await.is_some() {}

    let mut records = Vec::new();
    while let Ok(record) = out_rx.try_recv() {
        records.push(record);
    }
    Ok(records)
}
