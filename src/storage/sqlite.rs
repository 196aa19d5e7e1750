use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

use crate::domain::{LEDGER_HEADER, LedgerRow};

use super::{LedgerStore, MIGRATION_001_LEDGER_ROWS, RawRow, header_row};

/// Ledger sheet kept in a SQLite table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_LEDGER_ROWS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Create the database file if needed and make sure the ledger table exists.
    pub async fn init(path: &str) -> Result<Self> {
        let store = Self::connect(&format!("sqlite:{}?mode=rwc", path)).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Open an existing database.
    pub async fn open(path: &str) -> Result<Self> {
        Self::connect(&format!("sqlite:{}", path)).await
    }

    /// Number of stored rows, header excluded.
    pub async fn count_rows(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM ledger_rows")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count ledger rows")?;
        Ok(row.get("count"))
    }
}

impl LedgerStore for SqliteStore {
    async fn append(&self, row: LedgerRow) -> Result<()> {
        let [timestamp, user_id, amount, category] = row;
        sqlx::query(
            r#"
            INSERT INTO ledger_rows (timestamp, user_id, amount, category)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(timestamp)
        .bind(user_id)
        .bind(amount)
        .bind(category)
        .execute(&self.pool)
        .await
        .context("Failed to append ledger row")?;
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<RawRow>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, user_id, amount, category
            FROM ledger_rows
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to scan ledger rows")?;

        let mut sheet = Vec::with_capacity(rows.len() + 1);
        sheet.push(header_row());
        for row in &rows {
            let mut cells = Vec::with_capacity(LEDGER_HEADER.len());
            for column in LEDGER_HEADER {
                // Rows inserted by other tools may leave cells empty
                let cell: Option<String> = row
                    .try_get(column)
                    .with_context(|| format!("Unreadable ledger column {}", column))?;
                cells.push(cell.unwrap_or_default());
            }
            sheet.push(cells);
        }
        Ok(sheet)
    }
}
