// src/sink.rs
//! Output sinks. The core only promises field presence and order; what the
//! bytes look like on disk is the sink's business. `CsvSink` reproduces the
//! reference export's column order, `JsonlSink` emits one JSON object per
//! record, and `MemorySink` collects records for tests.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::record::SimilarityRecord;

pub trait RecordSink {
    fn write(&mut self, record: &SimilarityRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

pub const CSV_HEADER: &str =
    "DATE_UTC,STORY_ID,TICKER,CLOSEST_ID,CLOSEST_SCORE,TOTAL_OVERLAP,IS_OLD,IS_REPRINT,IS_RECOMB";

/// Plain comma-separated export. Identifiers and tickers never contain
/// commas or quotes, so no escaping layer is needed.
pub struct CsvSink<W: Write> {
    w: W,
}

impl CsvSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("creating csv {}", path.display()))?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(mut w: W) -> Result<Self> {
        writeln!(w, "{CSV_HEADER}").context("writing csv header")?;
        Ok(Self { w })
    }
}

fn opt_score(v: Option<f64>) -> String {
    v.map(|s| format!("{s:.6}")).unwrap_or_default()
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write(&mut self, r: &SimilarityRecord) -> Result<()> {
        writeln!(
            self.w,
            "{},{},{},{},{},{:.6},{},{},{}",
            r.timestamp.to_rfc3339(),
            r.story_id,
            r.company,
            r.closest_id.as_deref().unwrap_or_default(),
            opt_score(r.closest_score),
            r.total_overlap,
            r.is_old,
            r.is_reprint,
            r.is_recomb,
        )
        .context("writing csv row")
    }

    fn flush(&mut self) -> Result<()> {
        self.w.flush().context("flushing csv")
    }
}

/// One JSON object per line, for downstream tooling that prefers structure
/// over columns.
pub struct JsonlSink<W: Write> {
    w: W,
}

impl JsonlSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("creating jsonl {}", path.display()))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlSink<W> {
    pub fn from_writer(w: W) -> Self {
        Self { w }
    }
}

impl<W: Write> RecordSink for JsonlSink<W> {
    fn write(&mut self, r: &SimilarityRecord) -> Result<()> {
        serde_json::to_writer(&mut self.w, r).context("serializing record")?;
        writeln!(self.w).context("writing jsonl newline")
    }

    fn flush(&mut self) -> Result<()> {
        self.w.flush().context("flushing jsonl")
    }
}

/// Collects records in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<SimilarityRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, record: &SimilarityRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
