use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::sync::Mutex;

use crate::domain::{LEDGER_HEADER, LedgerRow};

use super::{LedgerStore, RawRow};

/// Ledger sheet kept in a CSV file, header row first.
///
/// Rows are appended to the end of the file and never rewritten, so the file
/// can be opened in a spreadsheet or edited by hand between runs.
pub struct CsvStore {
    path: PathBuf,
    // Serializes appends coming from this process
    write_lock: Mutex<()>,
}

impl CsvStore {
    /// Create the sheet with its header row unless it already exists.
    pub async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let is_empty = match std::fs::metadata(&target) {
                Ok(meta) => meta.len() == 0,
                Err(_) => true,
            };
            if is_empty {
                let mut writer = csv::Writer::from_path(&target)
                    .with_context(|| format!("Failed to create sheet {}", target.display()))?;
                writer.write_record(LEDGER_HEADER)?;
                writer.flush()?;
            }
            Ok(())
        })
        .await
        .context("Sheet initialization task failed")??;

        Ok(Self::new(path))
    }

    /// Open an existing sheet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!(
                "Ledger sheet not found: {} (run `tally init` first)",
                path.display()
            );
        }
        Ok(Self::new(path.to_path_buf()))
    }

    fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for CsvStore {
    async fn append(&self, row: LedgerRow) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let file = OpenOptions::new()
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open sheet {}", path.display()))?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer
                .write_record(&row)
                .context("Failed to append ledger row")?;
            writer.flush()?;
            Ok(())
        })
        .await
        .context("Append task failed")?
    }

    async fn scan_all(&self) -> Result<Vec<RawRow>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<RawRow>> {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open sheet {}", path.display()))?;
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(file);

            // Cells are decoded lossily so a hand-edited row in another encoding
            // stays in the scan instead of failing it
            let mut rows = Vec::new();
            for (line, record) in reader.byte_records().enumerate() {
                let record =
                    record.with_context(|| format!("Failed to read sheet row {}", line + 1))?;
                if std::str::from_utf8(record.as_slice()).is_err() {
                    tracing::warn!(row = line, "sheet row is not valid UTF-8");
                }
                rows.push(decode_row(&record));
            }
            Ok(rows)
        })
        .await
        .context("Scan task failed")?
    }
}

fn decode_row(record: &csv::ByteRecord) -> RawRow {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}
