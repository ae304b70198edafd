use chrono::{Local, NaiveDate};

use crate::amount::AmountExtractor;
use crate::date::DateExtractor;
use crate::lines;
use crate::merchant::MerchantExtractor;
use crate::types::{CandidateReport, RawLine, ReceiptData};

// ── Public extraction API ─────────────────────────────────────────────────────

/// Runs the three field extractors over one line sequence.
///
/// Extraction never fails; a field the extractors cannot find is `None`.
/// Business acceptance is applied separately by [`crate::AcceptancePolicy`].
pub struct ReceiptExtractor;

impl ReceiptExtractor {
    /// Extract relative to the local calendar day.
    pub fn extract(lines: &[RawLine]) -> ReceiptData {
        Self::extract_at(lines, Local::now().date_naive())
    }

    pub fn extract_at(lines: &[RawLine], today: NaiveDate) -> ReceiptData {
        ReceiptData {
            merchant_name: MerchantExtractor::extract(lines),
            date: DateExtractor::extract_at(lines, today),
            total_amount: AmountExtractor::extract(lines),
        }
    }

    /// Preprocess raw OCR text and extract from it.
    pub fn extract_text(ocr_text: &str, today: NaiveDate) -> ReceiptData {
        Self::extract_at(&lines::preprocess(ocr_text), today)
    }

    /// The full ranked candidate lists behind [`Self::extract_at`].
    pub fn explain(lines: &[RawLine], today: NaiveDate) -> CandidateReport {
        CandidateReport {
            merchant: MerchantExtractor::candidates(lines),
            date: DateExtractor::candidates(lines, today),
            amount: AmountExtractor::candidates(lines),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use expensa_core::Money;

    const WALMART: &str =
        "WALMART\n123 Main St\n05/02/24\nSUBTOTAL 18.50\nTAX 1.50\nTOTAL 20.00\nTHANK YOU";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn end_to_end_grocery_receipt() {
        let r = ReceiptExtractor::extract_text(WALMART, today());
        assert_eq!(r.merchant_name.as_deref(), Some("WALMART"));
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 2, 5));
        assert_eq!(r.total_amount, Some(Money::from_cents(2000)));
    }

    #[test]
    fn coffee_shop_with_split_total() {
        let text = "\
            STARBUCKS COFFEE\n\
            Store #1234\n\
            2024-01-15 08:42\n\
            Latte 4.75\n\
            Muffin 3.25\n\
            Subtotal 8.00\n\
            Tax 0.64\n\
            TOTAL\n\
            $8.64\n\
            VISA ****1234 8.64\n\
            Change 0.00";
        let r = ReceiptExtractor::extract_text(text, today());
        assert_eq!(r.merchant_name.as_deref(), Some("STARBUCKS COFFEE"));
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(r.total_amount, Some(Money::from_cents(864)));
    }

    #[test]
    fn idempotent() {
        let a = ReceiptExtractor::extract_text(WALMART, today());
        let b = ReceiptExtractor::extract_text(WALMART, today());
        assert_eq!(a, b);
    }

    #[test]
    fn fields_are_independently_optional() {
        let r = ReceiptExtractor::extract_text("TOTAL 12.00", today());
        assert_eq!(r.merchant_name, None);
        assert_eq!(r.date, None);
        assert_eq!(r.total_amount, Some(Money::from_cents(1200)));
    }

    #[test]
    fn empty_text_gives_empty_receipt() {
        assert!(ReceiptExtractor::extract_text("", today()).is_empty());
        assert!(ReceiptExtractor::extract_text("\n \n", today()).is_empty());
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = ReceiptExtractor::extract_text("!@#$%^&*()\n\0\x01\x02\n99999999999999.99", today());
    }

    #[test]
    fn explain_agrees_with_extract() {
        let lines = lines::preprocess(WALMART);
        let report = ReceiptExtractor::explain(&lines, today());
        let data = ReceiptExtractor::extract_at(&lines, today());
        assert_eq!(report.merchant.first().map(|c| c.value.clone()), data.merchant_name);
        assert_eq!(report.date.first().map(|c| c.value), data.date);
        assert_eq!(report.amount.first().map(|c| c.value), data.total_amount);
    }
}
