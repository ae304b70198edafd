use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// The seam to the external text-recognition step.
///
/// Implementations take raw image bytes and return the recognized
/// observations in reading order, top of the receipt first. Per-observation
/// confidence is not part of the contract.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError>;
}

/// Replays a fixed set of observations regardless of the image, so the
/// extraction path can run without a recognition engine.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    pub observations: Vec<String>,
}

impl MockRecognizer {
    /// One observation per line of `text`.
    pub fn new(text: &str) -> Self {
        Self::from_observations(text.lines())
    }

    pub fn from_observations<I, S>(observations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            observations: observations.into_iter().map(Into::into).collect(),
        }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        Ok(self.observations.clone())
    }
}
