use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Amount, TimeWindow, parse_amount, parse_timestamp};

/// Summed amount for one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
}

/// Totals for one user over one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub total: Amount,
    /// Per-category sums in the order each category first appears in the scan.
    pub by_category: Vec<CategoryTotal>,
    /// Rows that contributed to the totals.
    pub matched: usize,
    /// Short rows, plus this user's rows with an unreadable timestamp or amount.
    pub skipped: usize,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    pub fn category_total(&self, category: &str) -> Option<Amount> {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.total)
    }
}

/// The running sum left the range an exact decimal can hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sum of amounts is too large to represent")]
pub struct TotalOverflow;

/// Why a scanned row did not contribute to an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSkip {
    /// Belongs to someone else.
    OtherUser,
    /// Timestamp outside the requested window.
    OutsideWindow,
    /// Fewer than the four ledger columns.
    ShortRow,
    /// Timestamp text could not be read for a window that needs it.
    MalformedTimestamp,
    /// Amount text is not a number.
    MalformedAmount,
}

impl RowSkip {
    /// Returns true for rows that were damaged rather than merely filtered out.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            RowSkip::ShortRow | RowSkip::MalformedTimestamp | RowSkip::MalformedAmount
        )
    }
}

/// Classify one raw row, returning its category and amount if it counts.
pub fn classify_row<'a>(
    row: &'a [String],
    user_id: &str,
    window: &TimeWindow,
) -> Result<(&'a str, Amount), RowSkip> {
    let [timestamp, user, amount, category, ..] = row else {
        return Err(RowSkip::ShortRow);
    };

    if user != user_id {
        return Err(RowSkip::OtherUser);
    }

    if !window.contains(timestamp) {
        // A week window drops unparseable timestamps instead of comparing them
        return Err(match window {
            TimeWindow::Last7Days(_) if parse_timestamp(timestamp).is_none() => {
                RowSkip::MalformedTimestamp
            }
            _ => RowSkip::OutsideWindow,
        });
    }

    let amount = parse_amount(amount).map_err(|_| RowSkip::MalformedAmount)?;
    Ok((category.as_str(), amount))
}

/// Sum one user's rows inside `window`.
///
/// `rows` is the full ledger scan without its header. Rows belonging to other
/// users, outside the window, or with unreadable cells are skipped; a scan with
/// no matching rows yields a zero total and no categories. Sums are exact, so
/// the only failure is a total too large to hold.
pub fn aggregate(
    rows: &[Vec<String>],
    user_id: &str,
    window: TimeWindow,
) -> Result<AggregationResult, TotalOverflow> {
    let mut result = AggregationResult::default();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        match classify_row(row, user_id, &window) {
            Ok((category, amount)) => {
                result.total = result.total.checked_add(amount).ok_or(TotalOverflow)?;
                result.matched += 1;
                let position = *positions.entry(category).or_insert_with(|| {
                    result.by_category.push(CategoryTotal {
                        category: category.to_string(),
                        total: Amount::ZERO,
                    });
                    result.by_category.len() - 1
                });
                let entry = &mut result.by_category[position];
                entry.total = entry.total.checked_add(amount).ok_or(TotalOverflow)?;
            }
            Err(skip) if skip.is_malformed() => {
                result.skipped += 1;
                tracing::debug!(row = index, ?skip, "skipping malformed ledger row");
            }
            Err(skip) => {
                tracing::trace!(row = index, ?skip, "row filtered out");
            }
        }
    }

    Ok(result)
}
