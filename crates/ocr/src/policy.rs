use chrono::NaiveDate;
use expensa_core::DateRange;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scanner::ScanError;
use crate::types::ReceiptData;

/// The caller's rule for accepting an extracted receipt.
///
/// Kept apart from the extractors so field heuristics never branch on
/// business constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptancePolicy {
    /// Reject receipts without a positive total.
    pub require_amount: bool,
    /// Start of the tracking window; the window always ends today.
    pub valid_from: Option<NaiveDate>,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            require_amount: true,
            valid_from: None,
        }
    }
}

impl AcceptancePolicy {
    pub fn new(require_amount: bool, valid_from: Option<NaiveDate>) -> Self {
        Self { require_amount, valid_from }
    }

    /// The window a recovered date must fall in, if one is configured.
    pub fn window(&self, today: NaiveDate) -> Option<DateRange> {
        self.valid_from.map(|start| DateRange::new(start, today))
    }

    /// A missing date is acceptable; a date outside the window is not.
    pub fn evaluate(&self, receipt: &ReceiptData, today: NaiveDate) -> Result<(), ScanError> {
        if self.require_amount && !receipt.total_amount.is_some_and(|a| a.is_positive()) {
            warn!(?receipt, "rejecting receipt without a total");
            return Err(ScanError::NoAmount);
        }
        if let (Some(date), Some(window)) = (receipt.date, self.window(today)) {
            if !window.contains(date) {
                warn!(%date, %window, "rejecting receipt dated outside the tracking window");
                return Err(ScanError::OutOfDateRange { date, window });
            }
        }
        Ok(())
    }
}
