use chrono::NaiveDateTime;
use thiserror::Error;

use super::{TransactionRecord, UNCATEGORIZED, parse_amount};

/// Why a message was not turned into a transaction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The message does not start with `+` or `-`.
    #[error("message is not a transaction")]
    NotATransaction,

    /// A sign was given but the amount is not a number.
    #[error("amount is not a valid number")]
    InvalidAmount,
}

/// Turn a chat message such as `-100 food` or `+500.5 salary` into a record.
///
/// The amount text is kept verbatim; the category defaults to
/// [`UNCATEGORIZED`] when the message has no second word.
pub fn parse_transaction(
    raw_text: &str,
    user_id: &str,
    now: NaiveDateTime,
) -> Result<TransactionRecord, RejectionReason> {
    let text = raw_text.trim();
    if !text.starts_with(['+', '-']) {
        return Err(RejectionReason::NotATransaction);
    }

    let (amount, category) = match text.split_once(char::is_whitespace) {
        Some((amount, rest)) => (amount, rest.trim()),
        None => (text, UNCATEGORIZED),
    };

    parse_amount(amount).map_err(|_| RejectionReason::InvalidAmount)?;

    Ok(TransactionRecord::new(now, user_id, amount, category))
}
