//! Equity fails-to-deliver ingestion.
//!
//! The disclosure files are pipe-delimited with two trailing footer rows
//! and a legacy 8-bit encoding. Each file contributes per-symbol fail
//! quantities; the branch aggregates a per-symbol mean across every row of
//! every file, then normalises against the market-wide mean so that 1.0
//! represents an average-risk instrument.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use forge_core::types::{AssetClass, LiquidityProfile};
use forge_core::InstrumentRecord;

use crate::error::IngestError;

/// Default equity base fail rate scaled by the normalised score.
pub const EQUITY_BASE_FAIL_RATE: f64 = 0.02;

/// Source tag attached to equity instrument records.
pub const EQUITY_SOURCE: &str = "sec_ftd";

/// Number of footer rows discarded from each disclosure file.
const FOOTER_ROWS: usize = 2;

/// Normalised per-symbol fails-to-deliver scores.
///
/// Scores are ratios against the market mean, so the mean score across the
/// universe is 1.0 by construction (when non-empty).
#[derive(Clone, Debug, Default)]
pub struct EquityCalibration {
    scores: BTreeMap<String, f64>,
}

impl EquityCalibration {
    /// Returns the normalised score map.
    pub fn scores(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    /// Returns whether ingestion produced any symbols.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of calibrated symbols.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Converts the score universe into instrument records.
    ///
    /// Each symbol's prior is `base_fail_rate × score`, capped at the
    /// equity class limit (0.80). Equities from the disclosure universe are
    /// treated as highly liquid.
    pub fn into_instruments(self, base_fail_rate: f64) -> Vec<InstrumentRecord> {
        let cap = AssetClass::Equity.fail_rate_cap();
        self.scores
            .into_iter()
            .filter_map(|(symbol, score)| {
                let prior = (base_fail_rate * score).min(cap);
                match InstrumentRecord::new(
                    symbol,
                    AssetClass::Equity,
                    prior,
                    LiquidityProfile::High,
                    EQUITY_SOURCE,
                ) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Dropping equity record: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Parser for equity fails-to-deliver disclosure files.
#[derive(Clone, Copy, Debug, Default)]
pub struct EquityFtdIngester;

impl EquityFtdIngester {
    /// Ingests every `.csv` file under `dir`.
    ///
    /// Missing directories and individually unparsable files degrade to an
    /// empty (or reduced) result with a warning; this branch never aborts
    /// the calibration run.
    pub fn ingest_dir(&self, dir: &Path) -> EquityCalibration {
        let mut files = match list_csv_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Equity ingestion skipped: {}", e);
                return EquityCalibration::default();
            }
        };
        files.sort();
        self.ingest_files(&files)
    }

    /// Ingests an explicit list of disclosure files.
    pub fn ingest_files(&self, paths: &[PathBuf]) -> EquityCalibration {
        let mut totals: BTreeMap<String, (f64, u64)> = BTreeMap::new();

        for path in paths {
            match parse_ftd_file(path) {
                Ok(rows) => {
                    debug!("{}: {} fail rows", path.display(), rows.len());
                    for (symbol, fails) in rows {
                        let entry = totals.entry(symbol).or_insert((0.0, 0));
                        entry.0 += fails;
                        entry.1 += 1;
                    }
                }
                // One bad file must not block the others.
                Err(e) => warn!("Skipping equity file {}: {}", path.display(), e),
            }
        }

        if totals.is_empty() {
            warn!("Equity ingestion produced no symbols");
            return EquityCalibration::default();
        }

        let means: BTreeMap<String, f64> = totals
            .into_iter()
            .map(|(symbol, (sum, count))| (symbol, sum / count as f64))
            .collect();
        let market_mean = means.values().sum::<f64>() / means.len() as f64;

        let scores = if market_mean > 0.0 {
            means
                .into_iter()
                .map(|(symbol, mean)| (symbol, mean / market_mean))
                .collect()
        } else {
            // Degenerate universe where every symbol reported zero fails.
            means.into_iter().map(|(symbol, _)| (symbol, 0.0)).collect()
        };

        let calibration = EquityCalibration { scores };
        info!("Mapped {} equity symbols", calibration.len());
        calibration
    }
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::SourceNotFound(dir.to_path_buf()));
    }
    let files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    if files.is_empty() {
        return Err(IngestError::NoUsableFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Parses one disclosure file into `(symbol, fail_quantity)` rows.
///
/// Non-numeric or missing quantities are coerced to zero, not dropped.
fn parse_ftd_file(path: &Path) -> Result<Vec<(String, f64)>, IngestError> {
    let bytes = std::fs::read(path)?;
    let text = decode_latin1(&bytes);

    // Discard the fixed footer (two trailing non-empty lines).
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let body_len = lines.len().saturating_sub(FOOTER_ROWS);
    let body = lines[..body_len].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let symbol_idx = find_column(&headers, "SYMBOL")
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column: "SYMBOL",
        })?;
    let quantity_idx = find_column(&headers, "QUANTITY (FAILS)")
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column: "QUANTITY (FAILS)",
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("{}: malformed row skipped: {}", path.display(), e);
                continue;
            }
        };
        let symbol = record.get(symbol_idx).unwrap_or("").trim();
        if symbol.is_empty() {
            continue;
        }
        let fails = record
            .get(quantity_idx)
            .and_then(|q| q.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        rows.push((symbol.to_string(), fails));
    }
    Ok(rows)
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Decodes ISO-8859-1 bytes; every byte maps directly to the code point.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str =
        "SETTLEMENT DATE|CUSIP|SYMBOL|QUANTITY (FAILS)|DESCRIPTION|PRICE";
    const FOOTER: &str = "\nTrailer record\nTotal rows: 3";

    fn write_file(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_single_file_normalisation() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}\n20251101|037833100|AAPL|100|APPLE INC|170.0\n\
             20251101|594918104|MSFT|300|MICROSOFT CORP|410.0{FOOTER}"
        );
        write_file(&dir, "ftd.csv", &body);

        let cal = EquityFtdIngester.ingest_dir(dir.path());
        assert_eq!(cal.len(), 2);
        // Market mean is 200; AAPL 0.5, MSFT 1.5.
        assert_relative_eq!(cal.scores()["AAPL"], 0.5);
        assert_relative_eq!(cal.scores()["MSFT"], 1.5);
    }

    #[test]
    fn test_normalised_scores_mean_is_one() {
        let dir = TempDir::new().unwrap();
        let mut body = HEADER.to_string();
        for (i, fails) in [120.0, 45.0, 980.0, 3.0, 222.0].iter().enumerate() {
            body.push_str(&format!("\n20251101|CUSIP{i}|SYM{i}|{fails}|DESC|1.0"));
        }
        body.push_str(FOOTER);
        write_file(&dir, "ftd.csv", &body);

        let cal = EquityFtdIngester.ingest_dir(dir.path());
        let mean: f64 = cal.scores().values().sum::<f64>() / cal.len() as f64;
        assert_relative_eq!(mean, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_across_multiple_files() {
        let dir = TempDir::new().unwrap();
        let body_a = format!("{HEADER}\n20251101|C1|AAPL|100|APPLE|1.0{FOOTER}");
        let body_b = format!("{HEADER}\n20251115|C1|AAPL|300|APPLE|1.0{FOOTER}");
        write_file(&dir, "a.csv", &body_a);
        write_file(&dir, "b.csv", &body_b);

        let cal = EquityFtdIngester.ingest_dir(dir.path());
        // Single symbol: mean fails 200, market mean 200, score 1.0.
        assert_relative_eq!(cal.scores()["AAPL"], 1.0);
    }

    #[test]
    fn test_non_numeric_quantity_coerced_to_zero() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}\n20251101|C1|AAPL|n/a|APPLE|1.0\n20251101|C2|MSFT|200|MSFT|1.0{FOOTER}"
        );
        write_file(&dir, "ftd.csv", &body);

        let cal = EquityFtdIngester.ingest_dir(dir.path());
        // AAPL coerced to 0, not dropped: market mean 100.
        assert_relative_eq!(cal.scores()["AAPL"], 0.0);
        assert_relative_eq!(cal.scores()["MSFT"], 2.0);
    }

    #[test]
    fn test_bad_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "bad.csv", "NOT|THE|RIGHT|COLUMNS\n1|2|3|4");
        let body = format!("{HEADER}\n20251101|C1|AAPL|100|APPLE|1.0{FOOTER}");
        write_file(&dir, "good.csv", &body);

        let cal = EquityFtdIngester.ingest_dir(dir.path());
        assert_eq!(cal.len(), 1);
        assert!(cal.scores().contains_key("AAPL"));
    }

    #[test]
    fn test_missing_directory_degrades_to_empty() {
        let cal = EquityFtdIngester.ingest_dir(Path::new("/nonexistent/sec_ftd"));
        assert!(cal.is_empty());
    }

    #[test]
    fn test_latin1_bytes_do_not_poison_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.csv");
        let mut bytes = format!("{HEADER}\n20251101|C1|AAPL|100|CAF").into_bytes();
        bytes.push(0xC9); // 'É' in ISO-8859-1, invalid as UTF-8 lead byte here
        bytes.extend_from_slice(format!(" CORP|1.0{FOOTER}").as_bytes());
        std::fs::write(&path, bytes).unwrap();

        let cal = EquityFtdIngester.ingest_files(&[path]);
        assert_eq!(cal.len(), 1);
    }

    #[test]
    fn test_into_instruments_caps_prior() {
        let mut scores = BTreeMap::new();
        scores.insert("WILD".to_string(), 100.0);
        scores.insert("CALM".to_string(), 1.0);
        let cal = EquityCalibration { scores };

        let records = cal.into_instruments(EQUITY_BASE_FAIL_RATE);
        assert_eq!(records.len(), 2);
        let wild = records.iter().find(|r| r.ticker() == "WILD").unwrap();
        assert_relative_eq!(wild.historical_fail_rate(), 0.80);
        let calm = records.iter().find(|r| r.ticker() == "CALM").unwrap();
        assert_relative_eq!(calm.historical_fail_rate(), 0.02);
    }

    #[test]
    fn test_all_zero_universe() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}\n20251101|C1|AAPL|0|APPLE|1.0\n20251101|C2|MSFT|0|MSFT|1.0{FOOTER}"
        );
        write_file(&dir, "ftd.csv", &body);

        let cal = EquityFtdIngester.ingest_dir(dir.path());
        assert_eq!(cal.len(), 2);
        assert_relative_eq!(cal.scores()["AAPL"], 0.0);
    }
}
