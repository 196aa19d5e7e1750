use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AggregationResult, Amount, CategoryTotal, DATE_FORMAT, TimeWindow, format_amount, week_start,
};

/// Header line of a windowed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeading {
    pub label: String,
    /// Literal date, or `from to to` range, shown next to the label.
    pub period: Option<String>,
}

impl ReportHeading {
    pub fn new(label: impl Into<String>, period: Option<String>) -> Self {
        Self {
            label: label.into(),
            period,
        }
    }

    pub fn for_window(window: &TimeWindow) -> Self {
        match window {
            TimeWindow::AllTime => Self::new("Report for all time", None),
            TimeWindow::Today(now) => {
                Self::new("Report for today", Some(now.format(DATE_FORMAT).to_string()))
            }
            TimeWindow::Last7Days(now) => {
                Self::new("Report for the last 7 days", Some(week_range(*now)))
            }
        }
    }
}

fn week_range(now: NaiveDateTime) -> String {
    format!(
        "{} to {}",
        week_start(now).format(DATE_FORMAT),
        now.format(DATE_FORMAT)
    )
}

/// A rendered report together with the numbers behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowReport {
    pub window: TimeWindow,
    pub heading: ReportHeading,
    pub currency: String,
    pub result: AggregationResult,
}

impl WindowReport {
    pub fn render(&self) -> String {
        match self.window {
            TimeWindow::AllTime => format_summary(self.result.total, &self.currency),
            _ => format_windowed(
                &self.heading,
                self.result.total,
                &self.result.by_category,
                &self.currency,
            ),
        }
    }
}

/// Single-line all-time balance.
pub fn format_summary(total: Amount, currency: &str) -> String {
    format!("Total balance: {} {}", format_amount(total), currency)
}

/// Multi-line report: heading, total, then one line per category in the given order.
pub fn format_windowed(
    heading: &ReportHeading,
    total: Amount,
    by_category: &[CategoryTotal],
    currency: &str,
) -> String {
    let mut report = match &heading.period {
        Some(period) => format!("{} ({}):\n", heading.label, period),
        None => format!("{}:\n", heading.label),
    };
    report.push_str(&format!("Total: {} {}\n", format_amount(total), currency));
    report.push_str("By category:\n");
    for entry in by_category {
        report.push_str(&format!(
            " - {}: {} {}\n",
            entry.category,
            format_amount(entry.total),
            currency
        ));
    }
    report
}
