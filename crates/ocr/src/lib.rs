pub mod amount;
pub mod config;
pub mod date;
pub mod extract;
pub mod lines;
pub mod merchant;
pub mod patterns;
pub mod policy;
pub mod recognizer;
pub mod scanner;
pub mod types;

pub use amount::AmountExtractor;
pub use config::{ConfigError, ScanConfig};
pub use date::DateExtractor;
pub use extract::ReceiptExtractor;
pub use lines::{from_observations, preprocess};
pub use merchant::MerchantExtractor;
pub use policy::AcceptancePolicy;
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use scanner::{scan_text, ReceiptScanner, ScanError, ScannedReceipt};
pub use types::{Candidate, CandidateReport, RawLine, ReceiptData};
