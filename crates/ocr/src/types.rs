use chrono::NaiveDate;
use expensa_core::Money;
use serde::{Deserialize, Serialize};

/// One trimmed, non-empty OCR line. `index` is its position in the filtered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self { index, text: text.into() }
    }
}

/// A provisional value for one field.
///
/// `confidence` is an unbounded relative score. It only means something when
/// compared against other candidates for the same field on the same receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate<T> {
    pub value: T,
    pub confidence: i32,
    /// The line the value was read from.
    pub source_text: String,
    /// Position of `source_text` in the line sequence.
    pub line: usize,
}

impl<T> Candidate<T> {
    pub fn new(value: T, confidence: i32, source: &RawLine) -> Self {
        Self {
            value,
            confidence,
            source_text: source.text.clone(),
            line: source.index,
        }
    }
}

/// The assembled result of one extraction pass. Each field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptData {
    pub merchant_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub total_amount: Option<Money>,
}

impl ReceiptData {
    pub fn is_empty(&self) -> bool {
        self.merchant_name.is_none() && self.date.is_none() && self.total_amount.is_none()
    }
}

/// Every ranked candidate per field, best first. Used for diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateReport {
    pub merchant: Vec<Candidate<String>>,
    pub date: Vec<Candidate<NaiveDate>>,
    pub amount: Vec<Candidate<Money>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_records_source_line() {
        let line = RawLine::new(3, "TOTAL 20.00");
        let c = Candidate::new(Money::from_cents(2000), 115, &line);
        assert_eq!(c.source_text, "TOTAL 20.00");
        assert_eq!(c.line, 3);
    }

    #[test]
    fn receipt_data_empty() {
        assert!(ReceiptData::default().is_empty());
        let r = ReceiptData {
            merchant_name: Some("WALMART".into()),
            ..Default::default()
        };
        assert!(!r.is_empty());
    }

    #[test]
    fn receipt_data_serializes_snake_case_fields() {
        let r = ReceiptData {
            merchant_name: Some("WALMART".into()),
            date: NaiveDate::from_ymd_opt(2024, 2, 5),
            total_amount: Some(Money::from_cents(2000)),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["merchant_name"], "WALMART");
        assert_eq!(json["date"], "2024-02-05");
        assert_eq!(json["total_amount"], 20.0);
    }
}
