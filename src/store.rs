use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::time::{Instant, timeout_at};

use crate::{error::QuoteError, exchange_rate::ExchangeRate};

const CREATE_EXCHANGES_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS exchanges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code VARCHAR(3) NOT NULL,
    codein VARCHAR(3) NOT NULL,
    name VARCHAR(100) NOT NULL,
    high VARCHAR(10) NOT NULL,
    low VARCHAR(10) NOT NULL,
    varBid VARCHAR(10) NOT NULL,
    pctChange VARCHAR(10) NOT NULL,
    bid VARCHAR(10) NOT NULL,
    ask VARCHAR(10) NOT NULL,
    create_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)"#;

const INSERT_EXCHANGE: &str = "INSERT INTO exchanges \
    (code, codein, name, high, low, varBid, pctChange, bid, ask) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Append-only sink for observations.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Writes `rate` within `budget`. Returns [`QuoteError::StorageTimeout`]
    /// with nothing written once the budget is spent, so a failed save never
    /// leaves a row behind.
    async fn save(&self, rate: &ExchangeRate, budget: Duration) -> Result<(), QuoteError>;
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and makes sure the
    /// `exchanges` table exists.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        let store = Self { pool };
        store.init_schema().await?;
        info!("Exchange store ready at {}", path.display());

        Ok(store)
    }

    /// Idempotent; safe to run on every start.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_EXCHANGES_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create exchanges table")?;
        Ok(())
    }

    /// Direct access to the pool, for inspecting stored rows.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn save(&self, rate: &ExchangeRate, budget: Duration) -> Result<(), QuoteError> {
        let deadline = Instant::now() + budget;
        let expired = || QuoteError::StorageTimeout(budget);

        // Anything up to the commit can be abandoned: dropping an open
        // transaction rolls it back.
        let mut tx = timeout_at(deadline, self.pool.begin())
            .await
            .map_err(|_| expired())??;

        let result = timeout_at(
            deadline,
            sqlx::query(INSERT_EXCHANGE)
                .bind(&rate.code)
                .bind(&rate.codein)
                .bind(&rate.name)
                .bind(&rate.high)
                .bind(&rate.low)
                .bind(&rate.var_bid)
                .bind(&rate.pct_change)
                .bind(&rate.bid)
                .bind(&rate.ask)
                .execute(&mut *tx),
        )
        .await
        .map_err(|_| expired())??;

        if Instant::now() >= deadline {
            return Err(expired());
        }

        // Never cut short: once the commit starts the row and the response agree.
        tx.commit().await?;

        debug!("Stored observation #{}", result.last_insert_rowid());
        Ok(())
    }
}
