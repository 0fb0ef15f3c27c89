//! Systemic clearing-efficiency sources.
//!
//! Two strategies provide the market-wide efficiency fraction:
//!
//! 1. **Regime table** (canonical): a closed enumeration of named
//!    systemic-health regimes, each mapping to a fixed constant.
//! 2. **Report scan**: unstructured clearing-report text scanned for
//!    percentage tokens (`DD.DDD%`); the maximum matching value across all
//!    supplied files is the efficiency estimate, with a documented
//!    fallback when nothing matches.
//!
//! Either way, `1 − efficiency` becomes the additive systemic fail
//! baseline of the composite probability.

use std::path::PathBuf;

use regex::Regex;
use tracing::{info, warn};

/// Fallback efficiency when a report scan finds no percentage token.
pub const REPORT_FALLBACK_EFFICIENCY: f64 = 0.985;

/// Alternative fallback observed in stressed-configuration runs.
pub const STRESSED_FALLBACK_EFFICIENCY: f64 = 0.7416;

/// Named systemic-health regime.
///
/// # Examples
///
/// ```
/// use adapter_regulatory::Regime;
///
/// assert_eq!(Regime::Normal.efficiency(), 0.9669);
/// // Unrecognised names resolve to NORMAL.
/// assert_eq!(Regime::parse_lenient("sideways"), Regime::Normal);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Best observed clearing conditions.
    Optimal,
    /// Long-run average conditions.
    #[default]
    Normal,
    /// Elevated market stress.
    Stressed,
    /// Systemic crisis.
    Crisis,
}

impl Regime {
    /// Clearing-efficiency constant for this regime.
    pub fn efficiency(&self) -> f64 {
        match self {
            Regime::Optimal => 0.9788,
            Regime::Normal => 0.9669,
            Regime::Stressed => 0.9500,
            Regime::Crisis => 0.8500,
        }
    }

    /// Derived systemic fail baseline, `1 − efficiency`.
    #[inline]
    pub fn fail_baseline(&self) -> f64 {
        1.0 - self.efficiency()
    }

    /// Parses a regime name; unrecognised names resolve to `Normal`.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "OPTIMAL" => Regime::Optimal,
            "NORMAL" => Regime::Normal,
            "STRESSED" => Regime::Stressed,
            "CRISIS" => Regime::Crisis,
            other => {
                if !other.is_empty() {
                    warn!("Unknown regime '{}', using NORMAL", other);
                }
                Regime::Normal
            }
        }
    }
}

/// Where the systemic efficiency comes from.
#[derive(Clone, Debug)]
pub enum EfficiencySource {
    /// The canonical regime table.
    Regime(Regime),
    /// Scan unstructured report text for percentage tokens.
    ReportScan {
        /// Text files (e.g. extracted from paginated documents).
        paths: Vec<PathBuf>,
        /// Efficiency used when no token matches in any file.
        fallback: f64,
    },
}

impl Default for EfficiencySource {
    fn default() -> Self {
        EfficiencySource::Regime(Regime::Normal)
    }
}

impl EfficiencySource {
    /// Resolves the source to an efficiency fraction in (0, 1].
    ///
    /// The report-scan path never fails: unreadable files are logged and
    /// skipped, and an empty scan yields the configured fallback.
    pub fn resolve(&self) -> f64 {
        match self {
            EfficiencySource::Regime(regime) => {
                info!("Regime {:?}: efficiency {}", regime, regime.efficiency());
                regime.efficiency()
            }
            EfficiencySource::ReportScan { paths, fallback } => {
                match scan_reports(paths) {
                    Some(efficiency) => {
                        info!("Report scan efficiency: {}", efficiency);
                        efficiency
                    }
                    None => {
                        warn!("No efficiency token found, using fallback {}", fallback);
                        *fallback
                    }
                }
            }
        }
    }
}

/// Scans report files for `DD.DDD%` tokens and returns the maximum
/// matching percentage as a fraction.
pub fn scan_reports(paths: &[PathBuf]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for path in paths {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping efficiency report {}: {}", path.display(), e);
                continue;
            }
        };
        if let Some(value) = scan_report_text(&text) {
            best = Some(best.map_or(value, |b: f64| b.max(value)));
        }
    }
    best
}

/// Scans one report's text for the maximum `DD.DDD%` token.
pub fn scan_report_text(text: &str) -> Option<f64> {
    // Two integer digits, a decimal point, trailing percent sign.
    let pattern = Regex::new(r"(\d{2}\.\d+)%").expect("valid literal pattern");
    pattern
        .captures_iter(text)
        .filter_map(|cap| cap[1].parse::<f64>().ok())
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        })
        .map(|pct| pct / 100.0)
}
