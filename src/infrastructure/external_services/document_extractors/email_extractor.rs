use async_trait::async_trait;
use regex::Regex;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedText,
};

/// Plain-text `.eml` extraction: subject line plus the message body after
/// the header block. MIME part delimiters and transfer-encoding headers
/// inside the body are dropped rather than parsed.
pub struct EmailExtractor {
    subject_pattern: Regex,
    header_pattern: Regex,
}

impl EmailExtractor {
    pub fn new() -> Result<Self, DocumentExtractionError> {
        let subject_pattern = Regex::new(r"(?mi)^subject:\s*(.+)$")
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))?;
        let header_pattern = Regex::new(r"(?i)^[a-z][a-z0-9-]*:\s")
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))?;

        Ok(Self {
            subject_pattern,
            header_pattern,
        })
    }

    fn extract_subject(&self, raw: &str) -> Option<String> {
        self.subject_pattern
            .captures(raw)
            .and_then(|captures| captures.get(1))
            .map(|subject| subject.as_str().trim().to_string())
    }

    fn extract_body(&self, raw: &str) -> String {
        let body_start = raw
            .find("\r\n\r\n")
            .map(|i| i + 4)
            .or_else(|| raw.find("\n\n").map(|i| i + 2))
            .unwrap_or(0);

        raw[body_start..]
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.starts_with("--") && !self.header_pattern.is_match(trimmed)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl DocumentExtractor for EmailExtractor {
    async fn extract_text_from_bytes(
        &self,
        data: &[u8],
        file_type: &str,
    ) -> Result<ExtractedText, DocumentExtractionError> {
        if !self.can_extract(file_type) {
            return Err(DocumentExtractionError::UnsupportedFormat(
                file_type.to_string(),
            ));
        }

        let raw = String::from_utf8_lossy(data);

        let mut text = String::new();
        if let Some(subject) = self.extract_subject(&raw) {
            text.push_str(&format!("Subject: {}\n\n", subject));
        }
        text.push_str(&self.extract_body(&raw));

        if text.trim().is_empty() {
            return Err(DocumentExtractionError::ExtractionFailed(
                "Email contained no readable text".to_string(),
            ));
        }

        Ok(ExtractedText {
            text,
            page_count: None,
        })
    }

    fn supported_formats(&self) -> Vec<String> {
        vec!["eml".to_string()]
    }

    fn can_extract(&self, file_type: &str) -> bool {
        file_type.eq_ignore_ascii_case("eml")
    }
}
