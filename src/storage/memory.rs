use anyhow::Result;
use tokio::sync::RwLock;

use crate::domain::LedgerRow;

use super::{LedgerStore, RawRow, header_row};

/// In-process ledger sheet, used by tests and dry runs.
pub struct MemoryStore {
    rows: RwLock<Vec<RawRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(vec![header_row()]),
        }
    }

    /// Insert a row exactly as given, bypassing validation.
    ///
    /// Simulates edits made to the sheet by other tools.
    pub async fn push_raw<I, S>(&self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = cells.into_iter().map(Into::into).collect();
        self.rows.write().await.push(row);
    }

    /// Number of stored rows, header excluded.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len() - 1
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    async fn append(&self, row: LedgerRow) -> Result<()> {
        self.rows.write().await.push(row.to_vec());
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.read().await.clone())
    }
}
