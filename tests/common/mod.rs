// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use tally::application::BotService;
use tally::domain::{Amount, parse_amount};
use tally::storage::{CsvStore, MemoryStore, SqliteStore};
use tempfile::TempDir;

/// Helper to create a service over an in-memory sheet
pub fn memory_service() -> BotService<MemoryStore> {
    BotService::new(MemoryStore::new())
}

/// Helper to create a service over a CSV sheet in a temporary directory
pub async fn csv_service() -> Result<(BotService<CsvStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = CsvStore::init(temp_dir.path().join("ledger.csv")).await?;
    Ok((BotService::new(store), temp_dir))
}

/// Helper to create a service over a temporary SQLite database
pub async fn sqlite_service() -> Result<(BotService<SqliteStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("ledger.db");
    let store = SqliteStore::init(db_path.to_str().unwrap()).await?;
    Ok((BotService::new(store), temp_dir))
}

/// Helper to parse "YYYY-MM-DD HH:MM" into a local timestamp
pub fn at(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap()
}

/// Helper to build a timestamp from parts
pub fn ymd_hm(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

/// Helper to parse an amount literal such as "-107" or "0.012"
pub fn amount(text: &str) -> Amount {
    parse_amount(text).unwrap()
}
