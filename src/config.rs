use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum aggregate buy value for a company to appear in the combined summary.
pub const DEFAULT_MATERIALITY_THRESHOLD: f64 = 9_000_000.0;

/// Substring a `TYPE OF SECURITY (PRIOR)` cell must contain (after lowercasing).
pub const DEFAULT_EQUITY_MARKER: &str = "equity share";

pub const THRESHOLD_ENV: &str = "INSIDER_MATERIALITY_THRESHOLD";
pub const EQUITY_MARKER_ENV: &str = "INSIDER_EQUITY_MARKER";

/// Tunable business constants of the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub materiality_threshold: f64,
    pub equity_marker: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            materiality_threshold: DEFAULT_MATERIALITY_THRESHOLD,
            equity_marker: DEFAULT_EQUITY_MARKER.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `INSIDER_MATERIALITY_THRESHOLD` / `INSIDER_EQUITY_MARKER`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(THRESHOLD_ENV) {
            config.materiality_threshold = raw.trim().parse::<f64>().map_err(|e| {
                PipelineError::Config(format!("{} must be a number, got '{}': {}", THRESHOLD_ENV, raw, e))
            })?;
            debug!("Materiality threshold from environment: {}", config.materiality_threshold);
        }

        if let Some(raw) = lookup(EQUITY_MARKER_ENV) {
            let marker = raw.trim().to_lowercase();
            if marker.is_empty() {
                return Err(PipelineError::Config(format!("{} must not be empty", EQUITY_MARKER_ENV)));
            }
            config.equity_marker = marker;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_materiality_threshold(mut self, threshold: f64) -> Self {
        self.materiality_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.materiality_threshold.is_finite() {
            return Err(PipelineError::Config(format!(
                "materiality threshold must be finite, got {}",
                self.materiality_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.materiality_threshold, 9_000_000.0);
        assert_eq!(config.equity_marker, "equity share");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (THRESHOLD_ENV, " 2500000 "),
            (EQUITY_MARKER_ENV, "Equity"),
        ]))
        .unwrap();
        assert_eq!(config.materiality_threshold, 2_500_000.0);
        assert_eq!(config.equity_marker, "equity");
    }

    #[test]
    fn test_bad_threshold_is_config_error() {
        let err = PipelineConfig::from_lookup(lookup_from(&[(THRESHOLD_ENV, "nine million")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));

        let err = PipelineConfig::from_lookup(lookup_from(&[(THRESHOLD_ENV, "inf")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
