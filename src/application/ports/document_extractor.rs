use async_trait::async_trait;

#[derive(Debug)]
pub enum DocumentExtractionError {
    UnsupportedFormat(String),
    CorruptedFile(String),
    ExtractionFailed(String),
}

impl std::fmt::Display for DocumentExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentExtractionError::UnsupportedFormat(format) => {
                write!(f, "Unsupported format: {}", format)
            }
            DocumentExtractionError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            DocumentExtractionError::ExtractionFailed(msg) => {
                write!(f, "Extraction failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for DocumentExtractionError {}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: Option<i32>,
}

/// Raw text extraction from an uploaded binary. `file_type` is the
/// lowercase file extension ("pdf", "docx", "eml", "txt").
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text_from_bytes(
        &self,
        data: &[u8],
        file_type: &str,
    ) -> Result<ExtractedText, DocumentExtractionError>;

    fn supported_formats(&self) -> Vec<String>;

    fn can_extract(&self, file_type: &str) -> bool;
}
