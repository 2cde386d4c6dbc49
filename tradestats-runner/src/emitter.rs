//! Report emission — the four CSV buckets plus the enriched ledger.
//!
//! Layout under the output root:
//! - `enriched/trades.csv` — the full enriched ledger
//! - `instrument_daily/{instrument}.csv` — one file per instrument
//! - `trade_references/{reference}.csv` — one file per trade reference
//! - `daily/{day}.csv` — one file per day
//!
//! Each derived category gets its own bucket directory so that same-named
//! entities across categories never collide. Any write failure is fatal for
//! the whole run.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tradestats_core::{
    DailyStats, EnrichedTrade, InstrumentDailyStats, ReferenceGroup, HEADER,
};

pub const ENRICHED_BUCKET: &str = "enriched";
pub const INSTRUMENT_DAILY_BUCKET: &str = "instrument_daily";
pub const TRADE_REFERENCES_BUCKET: &str = "trade_references";
pub const DAILY_BUCKET: &str = "daily";

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Write all derived tables under `out_dir`.
///
/// With `clear_before` set, the output root is removed first — destructive,
/// so the flag is explicit at the call site.
pub fn emit_reports(
    out_dir: &Path,
    ledger: &[EnrichedTrade],
    instrument_daily: &[InstrumentDailyStats],
    references: &[ReferenceGroup],
    daily: &[DailyStats],
    clear_before: bool,
) -> Result<()> {
    if clear_before && out_dir.exists() {
        fs::remove_dir_all(out_dir)
            .with_context(|| format!("failed to clear output dir {}", out_dir.display()))?;
    }

    for bucket in [
        ENRICHED_BUCKET,
        INSTRUMENT_DAILY_BUCKET,
        TRADE_REFERENCES_BUCKET,
        DAILY_BUCKET,
    ] {
        let dir = out_dir.join(bucket);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create bucket {}", dir.display()))?;
    }

    write_enriched(&out_dir.join(ENRICHED_BUCKET), ledger)?;
    write_instrument_daily(&out_dir.join(INSTRUMENT_DAILY_BUCKET), instrument_daily)?;
    write_references(&out_dir.join(TRADE_REFERENCES_BUCKET), references)?;
    write_daily(&out_dir.join(DAILY_BUCKET), daily)?;
    Ok(())
}

// ─── Per-bucket writers ─────────────────────────────────────────────

fn write_enriched(bucket: &Path, ledger: &[EnrichedTrade]) -> Result<()> {
    let mut wtr = bucket_writer(bucket, "trades.csv")?;
    write_enriched_header(&mut wtr)?;
    for t in ledger {
        write_enriched_row(&mut wtr, t)?;
    }
    wtr.flush().context("failed to flush enriched ledger")?;
    Ok(())
}

fn write_instrument_daily(bucket: &Path, tables: &[InstrumentDailyStats]) -> Result<()> {
    for table in tables {
        let mut wtr = bucket_writer(bucket, &format!("{}.csv", table.instrument))?;
        wtr.write_record(["Day", "Total Market Value", "Closing Value", "Average Price"])?;
        for row in &table.rows {
            wtr.write_record([
                row.day.format(DAY_FORMAT).to_string(),
                row.total_market_value.to_string(),
                row.closing_value.to_string(),
                row.average_price.to_string(),
            ])?;
        }
        wtr.flush()
            .with_context(|| format!("failed to flush table for {}", table.instrument))?;
    }
    Ok(())
}

fn write_references(bucket: &Path, groups: &[ReferenceGroup]) -> Result<()> {
    for group in groups {
        let mut wtr = bucket_writer(bucket, &format!("{}.csv", group.reference))?;
        write_enriched_header(&mut wtr)?;
        for t in &group.trades {
            write_enriched_row(&mut wtr, t)?;
        }
        wtr.flush()
            .with_context(|| format!("failed to flush group {}", group.reference))?;
    }
    Ok(())
}

fn write_daily(bucket: &Path, tables: &[DailyStats]) -> Result<()> {
    for table in tables {
        let name = format!("{}.csv", table.day.format(DAY_FORMAT));
        let mut wtr = bucket_writer(bucket, &name)?;
        wtr.write_record([
            "Instrument",
            "Total Traded Value",
            "Closing Value",
            "Closing Position",
        ])?;
        for row in &table.rows {
            wtr.write_record([
                row.instrument.clone(),
                row.total_traded_value.to_string(),
                row.closing_value.to_string(),
                row.closing_position.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()
            .with_context(|| format!("failed to flush table for {}", table.day))?;
    }
    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────

fn bucket_writer(bucket: &Path, file: &str) -> Result<csv::Writer<fs::File>> {
    let path = bucket.join(file);
    csv::Writer::from_path(&path).with_context(|| format!("failed to create {}", path.display()))
}

fn write_enriched_header(wtr: &mut csv::Writer<fs::File>) -> Result<()> {
    let mut header: Vec<&str> = HEADER.to_vec();
    header.push("Market Value");
    header.push("Date");
    wtr.write_record(header)?;
    Ok(())
}

fn write_enriched_row(wtr: &mut csv::Writer<fs::File>, t: &EnrichedTrade) -> Result<()> {
    wtr.write_record([
        t.trade.instrument.clone(),
        t.trade.price.to_string(),
        t.trade.quantity.to_string(),
        t.trade.timestamp.to_string(),
        t.trade.trade_reference.clone(),
        t.trade.side_str().to_string(),
        t.trade.underlying_asset.clone(),
        t.trade.client_reference.clone(),
        t.market_value.to_string(),
        t.day.format(DAY_FORMAT).to_string(),
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradestats_core::{
        daily_stats, enrich, instrument_daily_stats, reference_groups, Side, Trade,
    };

    fn sample_ledger() -> Vec<EnrichedTrade> {
        enrich(vec![
            Trade {
                instrument: "USDEUR".into(),
                price: 1.0,
                quantity: 100,
                timestamp: 1_499_000_000,
                trade_reference: "TR_1".into(),
                side: Some(Side::Buy),
                underlying_asset: "UA_1".into(),
                client_reference: "CR_1".into(),
            },
            Trade {
                instrument: "USDEUR".into(),
                price: 1.2,
                quantity: 50,
                timestamp: 1_499_000_010,
                trade_reference: String::new(),
                side: Some(Side::Sell),
                underlying_asset: String::new(),
                client_reference: String::new(),
            },
        ])
        .unwrap()
    }

    fn emit_sample(out: &Path, clear: bool) {
        let ledger = sample_ledger();
        emit_reports(
            out,
            &ledger,
            &instrument_daily_stats(&ledger),
            &reference_groups(&ledger),
            &daily_stats(&ledger),
            clear,
        )
        .unwrap();
    }

    #[test]
    fn all_four_buckets_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        emit_sample(&out, false);

        let ledger = sample_ledger();
        let day = ledger[0].day.format(DAY_FORMAT).to_string();

        assert!(out.join(ENRICHED_BUCKET).join("trades.csv").exists());
        assert!(out
            .join(INSTRUMENT_DAILY_BUCKET)
            .join("USDEUR.csv")
            .exists());
        assert!(out.join(TRADE_REFERENCES_BUCKET).join("TR_1.csv").exists());
        assert!(out.join(DAILY_BUCKET).join(format!("{day}.csv")).exists());
    }

    #[test]
    fn enriched_ledger_has_computed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        emit_sample(&out, false);

        let contents =
            fs::read_to_string(out.join(ENRICHED_BUCKET).join("trades.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Market Value,Date"));
        assert!(lines[1].contains("100"));
        // 1.2 * 50
        assert!(lines[2].contains("60"));
    }

    #[test]
    fn daily_table_holds_closing_position() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        emit_sample(&out, false);

        let ledger = sample_ledger();
        let day = ledger[0].day.format(DAY_FORMAT).to_string();
        let contents =
            fs::read_to_string(out.join(DAILY_BUCKET).join(format!("{day}.csv"))).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "Instrument,Total Traded Value,Closing Value,Closing Position"
        );
        assert!(lines[1].starts_with("USDEUR,160,-40,SELL"));
    }

    #[test]
    fn clear_before_removes_stale_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        fs::create_dir_all(&out).unwrap();
        let stale = out.join("stale.csv");
        fs::write(&stale, "old").unwrap();

        emit_sample(&out, true);
        assert!(!stale.exists());
        assert!(out.join(ENRICHED_BUCKET).join("trades.csv").exists());
    }

    #[test]
    fn without_clear_existing_files_survive() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        fs::create_dir_all(&out).unwrap();
        let kept = out.join("keep.txt");
        fs::write(&kept, "keep").unwrap();

        emit_sample(&out, false);
        assert!(kept.exists());
    }

    #[test]
    fn empty_ledger_emits_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        emit_reports(&out, &[], &[], &[], &[], false).unwrap();

        let contents =
            fs::read_to_string(out.join(ENRICHED_BUCKET).join("trades.csv")).unwrap();
        assert_eq!(contents.lines().count(), 1);
        // No per-entity files for an empty ledger.
        assert!(fs::read_dir(out.join(INSTRUMENT_DAILY_BUCKET))
            .unwrap()
            .next()
            .is_none());
    }
}
