//! CSV ledger loading.
//!
//! Reads every `.csv` file in a directory into one in-memory ledger:
//! - Fixed 8-column schema, validated against the header row of each file
//! - Missing cells become empty strings (not a null marker), so downstream
//!   equality checks against `""` work uniformly
//! - Files are read in sorted name order; ledger order is file-read order
//!   concatenated, preserving intra-file order
//! - A missing or empty directory yields an empty ledger, not an error
//!
//! Deleting the processed files afterward is a separate, explicit call
//! ([`delete_source_files`]) because it is destructive and irreversible.

use crate::domain::{Side, Trade};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// The fixed source-file schema, in column order.
pub const HEADER: [&str; 8] = [
    "Instrument",
    "Price",
    "Quantity",
    "Timestamp",
    "Trade Reference",
    "Instrument Type",
    "Underlying Asset",
    "Client Reference",
];

const EXTENSION: &str = "csv";

/// Errors from the ledger loading layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: header mismatch: expected {expected:?}, found {found:?}")]
    Header {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

/// Load every `.csv` file in `dir` into one ledger.
///
/// Returns an empty ledger when the directory does not exist or contains no
/// matching files. Malformed rows (wrong column count, non-numeric Price,
/// Quantity, or Timestamp, unknown Instrument Type) reject the whole run with
/// a [`LedgerError::Parse`] naming the file and line.
pub fn load_dir(dir: &Path) -> Result<Vec<Trade>, LedgerError> {
    let mut trades = Vec::new();
    for path in source_files(dir) {
        load_file(&path, &mut trades)?;
    }
    Ok(trades)
}

/// Delete every `.csv` file in `dir`. Destructive; opt-in at the call site.
///
/// Individual deletion failures are logged and skipped rather than aborting
/// the run. Returns the number of files actually removed.
pub fn delete_source_files(dir: &Path) -> usize {
    let mut removed = 0;
    for path in source_files(dir) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "failed to delete source file"),
        }
    }
    removed
}

/// Regular `.csv` files in `dir`, sorted by name so that ledger order is
/// deterministic across platforms. Missing/unreadable directory → no files.
fn source_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(EXTENSION))
        .collect();
    paths.sort();
    paths
}

fn load_file(path: &Path, trades: &mut Vec<Trade>) -> Result<(), LedgerError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| LedgerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader.headers().map_err(|source| LedgerError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if headers.iter().ne(HEADER) {
        return Err(LedgerError::Header {
            path: path.to_path_buf(),
            expected: HEADER.iter().map(|s| s.to_string()).collect(),
            found: headers.iter().map(|s| s.to_string()).collect(),
        });
    }

    for record in reader.records() {
        let record = record.map_err(|source| LedgerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        trades.push(parse_record(path, line, &record)?);
    }
    Ok(())
}

fn parse_record(
    path: &Path,
    line: u64,
    record: &csv::StringRecord,
) -> Result<Trade, LedgerError> {
    let parse_err = |reason: String| LedgerError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    if record.len() != HEADER.len() {
        return Err(parse_err(format!(
            "expected {} columns, found {}",
            HEADER.len(),
            record.len()
        )));
    }

    let price: f64 = record[1]
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("invalid Price '{}'", &record[1])))?;
    let quantity: i64 = record[2]
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("invalid Quantity '{}'", &record[2])))?;
    let timestamp: i64 = record[3]
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("invalid Timestamp '{}'", &record[3])))?;
    let side = match &record[5] {
        "" => None,
        s => Some(
            Side::parse(s).ok_or_else(|| parse_err(format!("invalid Instrument Type '{s}'")))?,
        ),
    };

    Ok(Trade {
        instrument: record[0].to_string(),
        price,
        quantity,
        timestamp,
        trade_reference: record[4].to_string(),
        side,
        underlying_asset: record[6].to_string(),
        client_reference: record[7].to_string(),
    })
}
