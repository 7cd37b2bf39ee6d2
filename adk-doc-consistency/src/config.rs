//! Checker configuration.
//!
//! Configuration can be built in code with [`CheckConfig::builder`] or read
//! from a TOML file with [`CheckConfig::load`]:
//!
//! ```toml
//! suggest_naming_drift = true
//! strict = false
//! concurrency = 8
//! output_format = "json"
//! ```

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format of the CLI report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text summary for terminals and CI logs
    #[default]
    Console,
    /// Full report as pretty-printed JSON
    Json,
}

/// Settings for a checking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Attach "did you mean" hints for paths that only differ in naming convention
    #[serde(default = "default_true")]
    pub suggest_naming_drift: bool,
    /// Treat unverifiable claims as failures as well
    #[serde(default)]
    pub strict: bool,
    /// Maximum number of documents evaluated at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Report format
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            suggest_naming_drift: true,
            strict: false,
            concurrency: default_concurrency(),
            output_format: OutputFormat::default(),
        }
    }
}

impl CheckConfig {
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder::default()
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: CheckConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(CheckError::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Fluent builder for [`CheckConfig`].
#[derive(Debug, Clone, Default)]
pub struct CheckConfigBuilder {
    base: Option<CheckConfig>,
    suggest_naming_drift: Option<bool>,
    strict: Option<bool>,
    concurrency: Option<usize>,
    output_format: Option<OutputFormat>,
}

impl CheckConfigBuilder {
    /// Start from an existing configuration (e.g. one loaded from disk).
    pub fn base(mut self, config: CheckConfig) -> Self {
        self.base = Some(config);
        self
    }

    pub fn suggest_naming_drift(mut self, enabled: bool) -> Self {
        self.suggest_naming_drift = Some(enabled);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn build(self) -> Result<CheckConfig> {
        let base = self.base.unwrap_or_default();
        let config = CheckConfig {
            suggest_naming_drift: self.suggest_naming_drift.unwrap_or(base.suggest_naming_drift),
            strict: self.strict.unwrap_or(base.strict),
            concurrency: self.concurrency.unwrap_or(base.concurrency),
            output_format: self.output_format.unwrap_or(base.output_format),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let config = CheckConfig::builder().build().unwrap();
        assert_eq!(config, CheckConfig::default());
        assert!(config.suggest_naming_drift);
        assert!(!config.strict);
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn test_builder_overrides_base() {
        let base = CheckConfig { strict: true, concurrency: 2, ..Default::default() };
        let config = CheckConfig::builder()
            .base(base)
            .concurrency(16)
            .output_format(OutputFormat::Json)
            .build()
            .unwrap();
        assert!(config.strict);
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = CheckConfig::builder().concurrency(0).build();
        assert!(matches!(result, Err(CheckError::Config(_))));
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc-consistency.toml");
        std::fs::write(&path, "strict = true\noutput_format = \"json\"\n").unwrap();

        let config = CheckConfig::load(&path).unwrap();
        assert!(config.strict);
        assert!(config.suggest_naming_drift);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "concurrency = 0\n").unwrap();
        assert!(matches!(CheckConfig::load(&path), Err(CheckError::Config(_))));

        std::fs::write(&path, "output_format = \"markdown\"\n").unwrap();
        assert!(matches!(CheckConfig::load(&path), Err(CheckError::Toml(_))));
    }
}
