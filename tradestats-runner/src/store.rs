//! SQLite persistence sink for the enriched ledger.
//!
//! Column names are the source schema normalized to lowercase with
//! underscores, plus the two computed columns. The whole bulk insert runs in
//! one transaction; any failure is fatal for the run (no partial success).

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use thiserror::Error;
use tradestats_core::EnrichedTrade;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// How to write into an existing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Drop and recreate the table.
    Replace,
    /// Create the table if absent, keep existing rows.
    Append,
}

/// The trades table sink.
#[derive(Clone)]
pub struct TradeStore {
    pool: SqlitePool,
}

impl TradeStore {
    /// Open (creating if missing) a SQLite database file.
    pub async fn connect(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// In-memory database for tests.
    #[cfg(test)]
    async fn connect_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Bulk-insert the enriched ledger into `table`.
    ///
    /// Returns the number of rows written. The table name must be a plain
    /// identifier; it is interpolated into DDL, not bound.
    pub async fn save_trades(
        &self,
        table: &str,
        ledger: &[EnrichedTrade],
        mode: WriteMode,
    ) -> Result<u64, StoreError> {
        if !is_plain_identifier(table) {
            return Err(StoreError::InvalidTableName(table.to_string()));
        }

        let mut tx = self.pool.begin().await?;

        if mode == WriteMode::Replace {
            sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (
                instrument TEXT NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                trade_reference TEXT NOT NULL,
                instrument_type TEXT NOT NULL,
                underlying_asset TEXT NOT NULL,
                client_reference TEXT NOT NULL,
                market_value REAL NOT NULL,
                date TEXT NOT NULL
            )"
        ))
        .execute(&mut *tx)
        .await?;

        let insert = format!(
            "INSERT INTO \"{table}\" (instrument, price, quantity, timestamp, \
             trade_reference, instrument_type, underlying_asset, client_reference, \
             market_value, date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        );
        for t in ledger {
            sqlx::query(&insert)
                .bind(&t.trade.instrument)
                .bind(t.trade.price)
                .bind(t.trade.quantity)
                .bind(t.trade.timestamp)
                .bind(&t.trade.trade_reference)
                .bind(t.trade.side_str())
                .bind(&t.trade.underlying_asset)
                .bind(&t.trade.client_reference)
                .bind(t.market_value)
                .bind(t.day.format("%Y-%m-%d").to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(ledger.len() as u64)
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradestats_core::{enrich, Side, Trade};

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
                instrument: "EURJPY".into(),
                price: 130.34,
                quantity: 5,
                timestamp: 1_499_000_100,
                trade_reference: String::new(),
                side: None,
                underlying_asset: String::new(),
                client_reference: String::new(),
            },
        ])
        .unwrap()
    }

    async fn count(store: &TradeStore, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM \"{table}\""))
            .fetch_one(&store.pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn replace_writes_all_rows() {
        let store = TradeStore::connect_in_memory().await.unwrap();
        let written = store
            .save_trades("trades", &sample_ledger(), WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(count(&store, "trades").await, 2);
    }

    #[tokio::test]
    async fn replace_drops_previous_contents() {
        let store = TradeStore::connect_in_memory().await.unwrap();
        store
            .save_trades("trades", &sample_ledger(), WriteMode::Replace)
            .await
            .unwrap();
        store
            .save_trades("trades", &sample_ledger(), WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(count(&store, "trades").await, 2);
    }

    #[tokio::test]
    async fn append_accumulates_rows() {
        let store = TradeStore::connect_in_memory().await.unwrap();
        store
            .save_trades("trades", &sample_ledger(), WriteMode::Append)
            .await
            .unwrap();
        store
            .save_trades("trades", &sample_ledger(), WriteMode::Append)
            .await
            .unwrap();
        assert_eq!(count(&store, "trades").await, 4);
    }

    #[tokio::test]
    async fn columns_are_normalized_and_unset_side_is_empty() {
        let store = TradeStore::connect_in_memory().await.unwrap();
        store
            .save_trades("trades", &sample_ledger(), WriteMode::Replace)
            .await
            .unwrap();

        let rows: Vec<(String, String, f64)> = sqlx::query_as(
            "SELECT instrument, instrument_type, market_value FROM trades ORDER BY timestamp",
        )
        .fetch_all(&store.pool)
        .await
        .unwrap();

        assert_eq!(rows[0].0, "USDEUR");
        assert_eq!(rows[0].1, "BUY");
        assert_eq!(rows[0].2, 100.0);
        assert_eq!(rows[1].1, "");
        assert!((rows[1].2 - 651.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_ledger_still_creates_the_table() {
        let store = TradeStore::connect_in_memory().await.unwrap();
        let written = store
            .save_trades("trades", &[], WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(written, 0);
        assert_eq!(count(&store, "trades").await, 0);
    }

    #[tokio::test]
    async fn hostile_table_name_is_rejected() {
        let store = TradeStore::connect_in_memory().await.unwrap();
        let err = store
            .save_trades("trades; DROP TABLE x", &[], WriteMode::Replace)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTableName(_)));
    }
}
