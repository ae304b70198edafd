use chrono::{Local, NaiveDate};
use expensa_core::DateRange;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::extract::ReceiptExtractor;
use crate::lines;
use crate::policy::AcceptancePolicy;
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ReceiptData;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Image could not be decoded: {0}")]
    InvalidImage(String),
    #[error("No text found in image")]
    NoTextFound,
    #[error("OCR recognition failed")]
    Vision(#[source] OcrError),
    #[error("No total amount found on receipt")]
    NoAmount,
    #[error("Receipt date {date} is outside {window}")]
    OutOfDateRange { date: NaiveDate, window: DateRange },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<OcrError> for ScanError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::ImageDecode(msg) => ScanError::InvalidImage(msg),
            other => ScanError::Vision(other),
        }
    }
}

/// The result of one accepted scan.
#[derive(Debug, Clone)]
pub struct ScannedReceipt {
    /// Raw OCR text output.
    pub ocr_text: String,
    /// Structured fields extracted from the OCR text.
    pub receipt: ReceiptData,
}

/// Orchestrates: recognize → split lines → extract → accept.
///
/// Every call produces a fresh result; a retry is simply another call.
pub struct ReceiptScanner<R: OcrBackend> {
    recognizer: R,
    policy: AcceptancePolicy,
}

impl<R: OcrBackend> ReceiptScanner<R> {
    pub fn new(recognizer: R, policy: AcceptancePolicy) -> Self {
        Self { recognizer, policy }
    }

    /// Process a file on disk.
    pub async fn scan_file(&self, path: &Path) -> Result<ScannedReceipt, ScanError> {
        let bytes = tokio::fs::read(path).await?;
        info!("Scanning receipt: {}", path.display());
        self.scan_bytes(&bytes)
    }

    /// Process raw image bytes (from camera capture or file read).
    pub fn scan_bytes(&self, image: &[u8]) -> Result<ScannedReceipt, ScanError> {
        self.scan_bytes_at(image, Local::now().date_naive())
    }

    pub fn scan_bytes_at(&self, image: &[u8], today: NaiveDate) -> Result<ScannedReceipt, ScanError> {
        let observations = self.recognizer.recognize(image)?;
        if observations.is_empty() {
            return Err(ScanError::NoTextFound);
        }
        let ocr_text = observations.join("\n");
        let receipt = self.accept_text(&ocr_text, today)?;
        Ok(ScannedReceipt { ocr_text, receipt })
    }

    /// Extract from already-recognized text and apply the policy.
    pub fn accept_text(&self, ocr_text: &str, today: NaiveDate) -> Result<ReceiptData, ScanError> {
        scan_text(ocr_text, &self.policy, today)
    }
}

/// The text half of a scan, for callers that run recognition themselves.
pub fn scan_text(
    ocr_text: &str,
    policy: &AcceptancePolicy,
    today: NaiveDate,
) -> Result<ReceiptData, ScanError> {
    let lines = lines::preprocess(ocr_text);
    if lines.is_empty() {
        return Err(ScanError::NoTextFound);
    }
    debug!(lines = lines.len(), "extracting receipt fields");

    let receipt = ReceiptExtractor::extract_at(&lines, today);
    policy.evaluate(&receipt, today)?;
    Ok(receipt)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
