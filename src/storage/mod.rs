mod csv_sheet;
mod memory;
mod sqlite;

use std::path::Path;

use anyhow::Result;

use crate::domain::{LEDGER_HEADER, LedgerRow};

pub use csv_sheet::*;
pub use memory::*;
pub use sqlite::*;

/// SQL migration for the ledger table
pub const MIGRATION_001_LEDGER_ROWS: &str = include_str!("migrations/001_ledger_rows.sql");

/// A row as read back from a store. Externally edited rows may have any number of cells.
pub type RawRow = Vec<String>;

/// Append-only, spreadsheet-like row store holding the ledger.
///
/// `scan_all` returns every row in append order with the header row first.
pub trait LedgerStore: Send + Sync {
    fn append(&self, row: LedgerRow) -> impl Future<Output = Result<()>> + Send;

    fn scan_all(&self) -> impl Future<Output = Result<Vec<RawRow>>> + Send;
}

pub(crate) fn header_row() -> RawRow {
    LEDGER_HEADER.iter().map(|c| c.to_string()).collect()
}

/// Storage backend for the ledger sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Csv,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Csv => "csv",
            StoreKind::Sqlite => "sqlite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(StoreKind::Csv),
            "sqlite" | "db" => Some(StoreKind::Sqlite),
            _ => None,
        }
    }

    /// Pick a backend from the file extension: `.csv` is a sheet, anything else SQLite.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => StoreKind::Csv,
            _ => StoreKind::Sqlite,
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A store chosen at runtime.
pub enum Store {
    Csv(CsvStore),
    Sqlite(SqliteStore),
}

impl Store {
    /// Create the store if needed.
    pub async fn init(kind: StoreKind, path: &str) -> Result<Self> {
        Ok(match kind {
            StoreKind::Csv => Store::Csv(CsvStore::init(path).await?),
            StoreKind::Sqlite => Store::Sqlite(SqliteStore::init(path).await?),
        })
    }

    /// Open an existing store.
    pub async fn open(kind: StoreKind, path: &str) -> Result<Self> {
        Ok(match kind {
            StoreKind::Csv => Store::Csv(CsvStore::open(path)?),
            StoreKind::Sqlite => Store::Sqlite(SqliteStore::open(path).await?),
        })
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Store::Csv(_) => StoreKind::Csv,
            Store::Sqlite(_) => StoreKind::Sqlite,
        }
    }
}

impl LedgerStore for Store {
    async fn append(&self, row: LedgerRow) -> Result<()> {
        match self {
            Store::Csv(store) => store.append(row).await,
            Store::Sqlite(store) => store.append(row).await,
        }
    }

    async fn scan_all(&self) -> Result<Vec<RawRow>> {
        match self {
            Store::Csv(store) => store.scan_all().await,
            Store::Sqlite(store) => store.scan_all().await,
        }
    }
}
