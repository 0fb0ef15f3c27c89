//! Bond trading-volume ingestion and universe expansion.
//!
//! The volume report is a semicolon-delimited UTF-8 table keyed by
//! `(Product, Month)`, ordered most-recent month first. The `CORP`
//! product's average daily par value seeds the market-wide context; every
//! product row is then expanded into a fixed number of synthetic
//! sub-instruments so the fixed-income universe has enough diversity for
//! the synthesiser to draw from.

use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use tracing::{info, warn};

use forge_core::types::{AssetClass, LiquidityProfile};
use forge_core::{InstrumentRecord, MarketContext};

use crate::error::IngestError;

/// Source tag attached to bond instrument records.
pub const BOND_SOURCE: &str = "finra_trace";

/// Canonical per-product sub-instrument expansion count.
pub const DEFAULT_EXPANSION_COUNT: usize = 680;

/// Hard limit on the expansion count: the six-digit suffix space of one
/// product. Anything above it cannot yield unique ids.
pub const MAX_EXPANSION_COUNT: usize = 1_000_000;

/// Cap on synthesised bond priors.
const BOND_PRIOR_CAP: f64 = 0.75;

/// Volume threshold (millions) below which a product is bucketed `Low`.
const LOW_LIQUIDITY_VOLUME_M: f64 = 2_000.0;

/// Liquidity-multiplier step policy.
///
/// Two observed variants exist; the policy is explicit configuration
/// rather than a silent choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiquidityStepPolicy {
    /// 2.8 below 45,000(M), 1.6 below 50,000(M), else 1.0.
    #[default]
    TwoTier,
    /// 2.8 below 50,000(M), else 1.0.
    SingleStep,
}

impl LiquidityStepPolicy {
    /// Maps the corporate-bond ADV (millions) to the liquidity multiplier.
    pub fn multiplier(&self, adv_m: f64) -> f64 {
        match self {
            LiquidityStepPolicy::TwoTier => {
                if adv_m < 45_000.0 {
                    2.8
                } else if adv_m < 50_000.0 {
                    1.6
                } else {
                    1.0
                }
            }
            LiquidityStepPolicy::SingleStep => {
                if adv_m < 50_000.0 {
                    2.8
                } else {
                    1.0
                }
            }
        }
    }
}

/// Result of the bond ingestion branch.
#[derive(Clone, Debug, Default)]
pub struct BondMarketCalibration {
    /// Market-wide context derived from the `CORP` product.
    pub context: MarketContext,
    /// Expanded synthetic sub-instrument universe.
    pub instruments: Vec<InstrumentRecord>,
}

/// Parser and expander for the bond trading-volume report.
#[derive(Clone, Copy, Debug)]
pub struct BondVolumeIngester {
    policy: LiquidityStepPolicy,
    expansion_count: usize,
}

impl Default for BondVolumeIngester {
    fn default() -> Self {
        Self {
            policy: LiquidityStepPolicy::default(),
            expansion_count: DEFAULT_EXPANSION_COUNT,
        }
    }
}

impl BondVolumeIngester {
    /// Creates an ingester with an explicit step policy and expansion count.
    pub fn new(policy: LiquidityStepPolicy, expansion_count: usize) -> Self {
        Self {
            policy,
            expansion_count,
        }
    }

    /// Ingests the volume report, degrading to the documented defaults
    /// (ADV 45,000(M), multiplier 1.0, empty universe) on any failure.
    pub fn ingest_or_default<R: Rng>(&self, path: &Path, rng: &mut R) -> BondMarketCalibration {
        match self.ingest_file(path, rng) {
            Ok(calibration) => calibration,
            Err(e) => {
                warn!("Bond ingestion degraded to defaults: {}", e);
                BondMarketCalibration::default()
            }
        }
    }

    /// Ingests the volume report.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] when the file is missing, the required
    /// columns are absent, or the `CORP` product has no row. Malformed
    /// data rows are skipped with a warning, never fatal.
    pub fn ingest_file<R: Rng>(
        &self,
        path: &Path,
        rng: &mut R,
    ) -> Result<BondMarketCalibration, IngestError> {
        if self.expansion_count > MAX_EXPANSION_COUNT {
            return Err(IngestError::ExpansionTooLarge {
                requested: self.expansion_count,
                max: MAX_EXPANSION_COUNT,
            });
        }
        if !path.is_file() {
            return Err(IngestError::SourceNotFound(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let product_idx = require_column(&headers, "Product", path)?;
        let _month_idx = require_column(&headers, "Month", path)?;
        let adv_idx = require_column(&headers, "Total Average Daily Par Value", path)?;

        // Rows are ordered most-recent month first; the first row seen per
        // product is that product's latest month.
        let mut latest: Vec<(String, f64)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!("{}: malformed row skipped: {}", path.display(), e);
                    continue;
                }
            };
            let product = record.get(product_idx).unwrap_or("").trim().to_string();
            if product.is_empty() || seen.contains(&product) {
                continue;
            }
            let volume = match record
                .get(adv_idx)
                .and_then(|v| v.trim().replace(',', "").parse::<f64>().ok())
            {
                Some(v) if v >= 0.0 => v,
                _ => {
                    warn!("{}: unusable volume for product {}", path.display(), product);
                    continue;
                }
            };
            seen.insert(product.clone());
            latest.push((product, volume));
        }

        let corp_adv = latest
            .iter()
            .find(|(p, _)| p == "CORP")
            .map(|(_, v)| *v)
            .ok_or_else(|| IngestError::MissingProduct("CORP".to_string()))?;

        let multiplier = self.policy.multiplier(corp_adv);
        let context = MarketContext::new(corp_adv, multiplier);
        info!(
            "Latest CORP ADV: {}M (multiplier {})",
            corp_adv, multiplier
        );

        let mut instruments = Vec::with_capacity(latest.len() * self.expansion_count);
        let mut used_ids: HashSet<String> = HashSet::new();
        for (product, volume) in &latest {
            self.expand_product(product, *volume, multiplier, &mut used_ids, &mut instruments, rng);
        }

        Ok(BondMarketCalibration {
            context,
            instruments,
        })
    }

    /// Synthesises the per-product sub-instrument block.
    ///
    /// Each prior is `min(0.04 × (1 / log10(volume + 1.1)) × multiplier ×
    /// U(0.6, 1.4), 0.75)`: thinner trading and a stressed market both
    /// push risk up, with ±40% multiplicative jitter for diversity.
    fn expand_product<R: Rng>(
        &self,
        product: &str,
        volume_m: f64,
        multiplier: f64,
        used_ids: &mut HashSet<String>,
        out: &mut Vec<InstrumentRecord>,
        rng: &mut R,
    ) {
        let asset_class = if product == "CORP" {
            AssetClass::CorporateBond
        } else {
            AssetClass::FixedIncome
        };
        let profile = if volume_m < LOW_LIQUIDITY_VOLUME_M {
            LiquidityProfile::Low
        } else {
            LiquidityProfile::Medium
        };
        let volume_risk = 1.0 / (volume_m + 1.1).log10();

        for _ in 0..self.expansion_count {
            let ticker = loop {
                let candidate = format!("{}-{:06}", product, rng.gen_range(0..1_000_000u32));
                if used_ids.insert(candidate.clone()) {
                    break candidate;
                }
            };
            let jitter = rng.gen_range(0.6..1.4);
            let prior = (0.04 * volume_risk * multiplier * jitter).min(BOND_PRIOR_CAP);
            match InstrumentRecord::new(ticker, asset_class, prior, profile, BOND_SOURCE) {
                Ok(record) => out.push(record),
                Err(e) => warn!("Dropping bond record: {}", e),
            }
        }
    }
}

fn require_column(
    headers: &[String],
    column: &'static str,
    path: &Path,
) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
}
