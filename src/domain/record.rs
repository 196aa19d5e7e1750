use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Category assigned when a message carries only an amount.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Storage format of ledger timestamps (minute precision, local clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date portion of [`TIMESTAMP_FORMAT`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column names of the ledger sheet, in storage order.
pub const LEDGER_HEADER: [&str; 4] = ["timestamp", "user_id", "amount", "category"];

/// One row as written to the ledger: timestamp, user, amount text, category.
pub type LedgerRow = [String; 4];

/// A single accepted money movement.
///
/// Records are created once by the parser and appended to the store; they are
/// never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: NaiveDateTime,
    pub user_id: String,
    /// Literal amount text as typed, e.g. "+500.5"
    pub amount: String,
    pub category: String,
}

impl TransactionRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        user_id: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: truncate_to_minute(timestamp),
            user_id: user_id.into(),
            amount: amount.into(),
            category: category.into(),
        }
    }

    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_row(&self) -> LedgerRow {
        [
            self.timestamp_text(),
            self.user_id.clone(),
            self.amount.clone(),
            self.category.clone(),
        ]
    }
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}

/// Parse a stored timestamp, accepting only the exact storage format.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(h, m, s, 250)
            .unwrap()
    }

    #[test]
    fn test_record_row_layout() {
        let record = TransactionRecord::new(at(8, 5, 41), "alice", "-100", "food");
        assert_eq!(
            record.to_row(),
            [
                "2024-03-09 08:05".to_string(),
                "alice".to_string(),
                "-100".to_string(),
                "food".to_string(),
            ]
        );
        assert_eq!(record.timestamp.second(), 0);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2024-03-09 08:05"),
            Some(truncate_to_minute(at(8, 5, 0)))
        );
        assert_eq!(parse_timestamp("2024-03-09"), None);
        assert_eq!(parse_timestamp("2024-03-09 08:05:10"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
