//! Run configuration management.
//!
//! Loads the `settleforge.toml` run configuration with environment
//! variable override support. Command-line flags take precedence over
//! both inside the command modules.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use adapter_regulatory::LiquidityStepPolicy;
use forge_core::Currency;

use crate::error::CliError;

/// Default run-configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "settleforge.toml";

/// Output format of the generated batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Record-oriented JSON array.
    Json,
    /// Flattened CSV table.
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Json
    }
}

/// Calibration-stage settings.
#[derive(Clone, Debug, Deserialize)]
pub struct CalibrationSection {
    /// Directory of equity fails-to-deliver files.
    #[serde(default = "default_equity_dir")]
    pub equity_dir: PathBuf,

    /// Bond trading-volume report.
    #[serde(default = "default_bond_file")]
    pub bond_file: PathBuf,

    /// Named market regime (`optimal`, `normal`, `stressed`, `crisis`).
    #[serde(default = "default_regime")]
    pub regime: String,

    /// Report text files to scan for efficiency tokens instead of the
    /// regime table. Empty means use the regime.
    #[serde(default)]
    pub report_paths: Vec<PathBuf>,

    /// Bond liquidity step policy.
    #[serde(default)]
    pub step_policy: LiquidityStepPolicy,

    /// Synthetic sub-instruments per bond product.
    #[serde(default = "default_expansion_count")]
    pub expansion_count: usize,

    /// Source-year tag stamped into the snapshot metadata.
    pub source_year: Option<String>,
}

fn default_equity_dir() -> PathBuf {
    PathBuf::from("data/ftd")
}

fn default_bond_file() -> PathBuf {
    PathBuf::from("data/bond_volume.csv")
}

fn default_regime() -> String {
    "normal".to_string()
}

fn default_expansion_count() -> usize {
    adapter_regulatory::bond::DEFAULT_EXPANSION_COUNT
}

impl Default for CalibrationSection {
    fn default() -> Self {
        Self {
            equity_dir: default_equity_dir(),
            bond_file: default_bond_file(),
            regime: default_regime(),
            report_paths: Vec::new(),
            step_policy: LiquidityStepPolicy::default(),
            expansion_count: default_expansion_count(),
            source_year: None,
        }
    }
}

/// Synthesis-stage settings.
#[derive(Clone, Debug, Deserialize)]
pub struct SynthesisSection {
    /// Trades per business day.
    #[serde(default = "default_trades_per_day")]
    pub trades_per_day: usize,

    /// Business days per batch.
    #[serde(default = "default_business_days")]
    pub business_days: usize,

    /// Equity share of the class mix.
    #[serde(default = "default_equity_mix")]
    pub equity_mix: f64,

    /// Reproducibility seed; absent means draw one per run.
    pub seed: Option<u64>,

    /// Skip the live volatility fetch and use the documented fallback.
    #[serde(default)]
    pub offline: bool,

    /// Volatility index symbol for the live fetch.
    #[serde(default = "default_index_symbol")]
    pub index_symbol: String,

    /// Settlement currency stamped on every instruction.
    #[serde(default)]
    pub currency: Currency,
}

fn default_trades_per_day() -> usize {
    forge_engine::config::DEFAULT_TRADES_PER_DAY
}

fn default_business_days() -> usize {
    forge_engine::config::DEFAULT_BUSINESS_DAYS
}

fn default_equity_mix() -> f64 {
    forge_engine::config::DEFAULT_EQUITY_MIX
}

fn default_index_symbol() -> String {
    forge_market::provider::DEFAULT_INDEX_SYMBOL.to_string()
}

impl Default for SynthesisSection {
    fn default() -> Self {
        Self {
            trades_per_day: default_trades_per_day(),
            business_days: default_business_days(),
            equity_mix: default_equity_mix(),
            seed: None,
            offline: false,
            index_symbol: default_index_symbol(),
            currency: Currency::default(),
        }
    }
}

/// Output settings.
#[derive(Clone, Debug, Deserialize)]
pub struct OutputSection {
    /// Batch format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Batch destination path.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Strip outcome labels from JSON output (relay payload shape).
    #[serde(default)]
    pub masked: bool,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("settlement_instructions.json")
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: default_output_path(),
            masked: false,
        }
    }
}

/// Full run configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    /// Calibration snapshot location, shared by both stages.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Calibration-stage settings.
    #[serde(default)]
    pub calibration: CalibrationSection,

    /// Synthesis-stage settings.
    #[serde(default)]
    pub synthesis: SynthesisSection,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSection,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("seed_data.json")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            calibration: CalibrationSection::default(),
            synthesis: SynthesisSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl RunConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Loads from `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, CliError> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies environment variable overrides.
    pub fn with_env_override(mut self) -> Self {
        if let Ok(path) = std::env::var("SETTLEFORGE_SNAPSHOT") {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Ok(seed) = std::env::var("SETTLEFORGE_SEED") {
            self.synthesis.seed = seed.parse().ok();
        }
        if let Ok(offline) = std::env::var("SETTLEFORGE_OFFLINE") {
            self.synthesis.offline = matches!(offline.as_str(), "1" | "true" | "yes");
        }
        if let Ok(path) = std::env::var("SETTLEFORGE_OUTPUT") {
            self.output.path = PathBuf::from(path);
        }
        self
    }

    /// Validates the configuration.
    ///
    /// Schedule and mix bounds are re-checked by the synthesis builder;
    /// this pass catches everything that would otherwise surface halfway
    /// through a run.
    pub fn validate(&self) -> Result<(), CliError> {
        let mut errors = Vec::new();

        if self.synthesis.trades_per_day == 0 {
            errors.push("synthesis.trades_per_day must be at least 1".to_string());
        }
        if self.synthesis.business_days == 0 {
            errors.push("synthesis.business_days must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.synthesis.equity_mix) {
            errors.push(format!(
                "synthesis.equity_mix {} outside [0, 1]",
                self.synthesis.equity_mix
            ));
        }
        if self.calibration.expansion_count == 0 {
            errors.push("calibration.expansion_count must be at least 1".to_string());
        }
        if self.calibration.expansion_count > adapter_regulatory::bond::MAX_EXPANSION_COUNT {
            errors.push(format!(
                "calibration.expansion_count {} exceeds the per-product id space of {}",
                self.calibration.expansion_count,
                adapter_regulatory::bond::MAX_EXPANSION_COUNT
            ));
        }
        if self.output.masked && self.output.format == OutputFormat::Csv {
            errors.push("output.masked applies to JSON output only".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CliError::Config(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.snapshot_path, PathBuf::from("seed_data.json"));
        assert_eq!(config.synthesis.trades_per_day, 2_000);
        assert_eq!(config.synthesis.business_days, 5);
        assert_eq!(config.calibration.expansion_count, 680);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: RunConfig = toml::from_str(
            r#"
            snapshot_path = "out/snapshot.json"

            [synthesis]
            trades_per_day = 500
            seed = 42

            [output]
            format = "csv"
            path = "out/batch.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("out/snapshot.json"));
        assert_eq!(config.synthesis.trades_per_day, 500);
        assert_eq!(config.synthesis.seed, Some(42));
        assert_eq!(config.synthesis.business_days, 5);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_validation_rejects_masked_csv() {
        let mut config = RunConfig::default();
        config.output.masked = true;
        config.output.format = OutputFormat::Csv;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_oversized_expansion() {
        let mut config = RunConfig::default();
        config.calibration.expansion_count =
            adapter_regulatory::bond::MAX_EXPANSION_COUNT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_schedule() {
        let mut config = RunConfig::default();
        config.synthesis.trades_per_day = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_falls_back_to_defaults() {
        let config = RunConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.synthesis.trades_per_day, 2_000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settleforge.toml");
        std::fs::write(&path, "[calibration]\nregime = \"stressed\"\n").unwrap();
        let config = RunConfig::load_or_default(&path).unwrap();
        assert_eq!(config.calibration.regime, "stressed");
    }
}
