//! Stale News Screener — Binary Entrypoint
//! Batch mode: screen a directory of `.nml` newswire archives into a CSV of
//! per-(story, company) similarity records.
//!
//! Usage: `stale-news-screener <nml-dir> <out.csv>`

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stale_news_screener::{CsvSink, NmlFileSource, ScreenerConfig, StreamProcessor};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stale_news_screener=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op where none exists. Enables
    // SCREENER_CONFIG_PATH from .env so config.rs can pick it up.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        bail!("usage: {} <nml-dir> <out.csv>", args[0]);
    }
    let data_dir = PathBuf::from(&args[1]);
    let out_path = PathBuf::from(&args[2]);

    let cfg = ScreenerConfig::load_default()?;
    let mut source = NmlFileSource::from_dir(&data_dir)?;
    let mut sink = CsvSink::create(&out_path)?;

    let mut processor = StreamProcessor::new(cfg);
    let summary = processor.run(&mut source, &mut sink)?;

    tracing::info!(
        records = summary.records,
        out = %out_path.display(),
        "export written"
    );
    Ok(())
}
