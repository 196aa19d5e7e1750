use thiserror::Error;

use crate::domain::{RejectionReason, TotalOverflow};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Message rejected: {0}")]
    Rejected(#[from] RejectionReason),

    #[error("Report failed: {0}")]
    Overflow(#[from] TotalOverflow),

    #[error("Ledger store error: {0}")]
    Store(#[from] anyhow::Error),
}
