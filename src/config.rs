// src/config.rs
//! Screener configuration: look-back horizon, neighbor count, and the two
//! staleness thresholds. Defaults mirror the reference procedure (72h, top 5,
//! 0.6 old, 0.8 reprint); a TOML file can override them.

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/screener.toml";
pub const ENV_CONFIG_PATH: &str = "SCREENER_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Look-back horizon in hours; prior stories older than this are pruned.
    pub lookback_hours: i64,
    /// How many nearest neighbors feed the staleness decision.
    pub top_k: usize,
    /// `total_overlap` at or above this marks a story as old.
    pub stale_threshold: f64,
    /// `closest_score` at or above this marks an old story as a reprint.
    pub reprint_threshold: f64,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            lookback_hours: 72,
            top_k: 5,
            stale_threshold: 0.6,
            reprint_threshold: 0.8,
        }
    }
}

impl ScreenerConfig {
    pub fn lookback(&self) -> Duration {
        Duration::hours(self.lookback_hours)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading screener config from {}", path.display()))?;
        let mut cfg: ScreenerConfig = toml::from_str(&content)
            .with_context(|| format!("parsing screener config {}", path.display()))?;
        cfg.stale_threshold = cfg.stale_threshold.clamp(0.0, 1.0);
        cfg.reprint_threshold = cfg.reprint_threshold.clamp(0.0, 1.0);
        Ok(cfg)
    }

    /// Resolution order:
    /// 1) $SCREENER_CONFIG_PATH
    /// 2) config/screener.toml (if present)
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            return Self::from_toml_path(&pb)
                .with_context(|| format!("{ENV_CONFIG_PATH} set but unusable"));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::from_toml_path(&default);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_procedure() {
        let cfg = ScreenerConfig::default();
        assert_eq!(cfg.lookback_hours, 72);
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.stale_threshold, 0.6);
        assert_eq!(cfg.reprint_threshold, 0.8);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let cfg: ScreenerConfig = toml::from_str("lookback_hours = 48").unwrap();
        assert_eq!(cfg.lookback_hours, 48);
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.stale_threshold, 0.6);
    }
}
