use chrono::NaiveDateTime;

use crate::domain::{RejectionReason, TimeWindow, TransactionRecord, aggregate, parse_transaction};
use crate::storage::LedgerStore;

use super::{
    AppError, Command, INVALID_AMOUNT_REPLY, Inbound, ReportHeading, STORE_FAILURE_REPLY,
    TOTAL_OVERFLOW_REPLY, USAGE_REPLY, WindowReport, help_text,
};

/// Default currency label appended to amounts in replies.
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Application service answering chat messages against a ledger store.
/// This is the primary interface for any transport (console, chat platform, tests).
pub struct BotService<S> {
    store: S,
    currency: String,
}

impl<S: LedgerStore> BotService<S> {
    /// Create a new service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    // ========================
    // Transactions
    // ========================

    /// Parse a message and append it to the ledger.
    /// Nothing is written when the message is rejected.
    pub async fn record_transaction(
        &self,
        user_id: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, AppError> {
        let record = parse_transaction(text, user_id, now)?;
        self.store.append(record.to_row()).await?;
        tracing::info!(
            user = user_id,
            amount = %record.amount,
            category = %record.category,
            "recorded transaction"
        );
        Ok(record)
    }

    // ========================
    // Reports
    // ========================

    /// Aggregate the user's rows over `window`.
    ///
    /// A failed scan, or a total too large to hold, fails the whole report;
    /// partial totals are never returned.
    pub async fn report(
        &self,
        user_id: &str,
        window: TimeWindow,
    ) -> Result<WindowReport, AppError> {
        let sheet = self.store.scan_all().await?;
        // First row is the sheet header
        let rows = sheet.get(1..).unwrap_or_default();
        let result = aggregate(rows, user_id, window)?;
        tracing::debug!(
            user = user_id,
            ?window,
            scanned = rows.len(),
            matched = result.matched,
            skipped = result.skipped,
            "aggregated ledger"
        );

        Ok(WindowReport {
            window,
            heading: ReportHeading::for_window(&window),
            currency: self.currency.clone(),
            result,
        })
    }

    pub async fn summary(&self, user_id: &str) -> Result<WindowReport, AppError> {
        self.report(user_id, TimeWindow::AllTime).await
    }

    pub async fn today(
        &self,
        user_id: &str,
        now: NaiveDateTime,
    ) -> Result<WindowReport, AppError> {
        self.report(user_id, TimeWindow::Today(now)).await
    }

    pub async fn week(
        &self,
        user_id: &str,
        now: NaiveDateTime,
    ) -> Result<WindowReport, AppError> {
        self.report(user_id, TimeWindow::Last7Days(now)).await
    }

    // ========================
    // Message routing
    // ========================

    /// Answer one inbound message.
    ///
    /// Rejected input and oversized totals are answered with guidance; only
    /// store failures are errors.
    pub async fn handle(
        &self,
        user_id: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<String, AppError> {
        match Inbound::parse(text) {
            Inbound::Command(command) => match self.run_command(command, user_id, now).await {
                Err(AppError::Overflow(e)) => {
                    tracing::warn!(user = user_id, error = %e, "report total overflowed");
                    Ok(TOTAL_OVERFLOW_REPLY.to_string())
                }
                other => other,
            },
            Inbound::UnknownCommand(name) => {
                tracing::debug!(user = user_id, command = name, "unknown command");
                Ok(help_text())
            }
            Inbound::Text(text) => match self.record_transaction(user_id, text, now).await {
                Ok(record) => Ok(format!("Added: {} to {}", record.amount, record.category)),
                Err(AppError::Rejected(reason)) => {
                    tracing::debug!(user = user_id, %reason, "message rejected");
                    Ok(rejection_reply(reason).to_string())
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Like [`handle`](Self::handle), but store failures become a reply too.
    pub async fn reply(&self, user_id: &str, text: &str, now: NaiveDateTime) -> String {
        match self.handle(user_id, text, now).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(user = user_id, error = %e, "failed to handle message");
                STORE_FAILURE_REPLY.to_string()
            }
        }
    }

    async fn run_command(
        &self,
        command: Command,
        user_id: &str,
        now: NaiveDateTime,
    ) -> Result<String, AppError> {
        let report = match command {
            Command::Start | Command::Help => return Ok(help_text()),
            Command::Summary => self.summary(user_id).await?,
            Command::Today => self.today(user_id, now).await?,
            Command::Week => self.week(user_id, now).await?,
        };
        Ok(report.render())
    }
}

fn rejection_reply(reason: RejectionReason) -> &'static str {
    match reason {
        RejectionReason::NotATransaction => USAGE_REPLY,
        RejectionReason::InvalidAmount => INVALID_AMOUNT_REPLY,
    }
}
