use async_trait::async_trait;
use std::sync::Arc;

use super::{DocxExtractor, EmailExtractor, PdfExtractor};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedText,
};

/// Routes an upload to the extractor that understands its format. Plain
/// text needs no sub-extractor and is decoded in place.
pub struct CompositeDocumentExtractor {
    pdf_extractor: Arc<PdfExtractor>,
    docx_extractor: Arc<DocxExtractor>,
    email_extractor: Arc<EmailExtractor>,
}

impl CompositeDocumentExtractor {
    pub fn new() -> Result<Self, DocumentExtractionError> {
        Ok(Self {
            pdf_extractor: Arc::new(PdfExtractor::new()),
            docx_extractor: Arc::new(DocxExtractor::new()),
            email_extractor: Arc::new(EmailExtractor::new()?),
        })
    }

    fn extractor_for_type(&self, file_type: &str) -> Option<Arc<dyn DocumentExtractor>> {
        let file_type_lower = file_type.to_lowercase();

        if self.pdf_extractor.can_extract(&file_type_lower) {
            Some(self.pdf_extractor.clone())
        } else if self.docx_extractor.can_extract(&file_type_lower) {
            Some(self.docx_extractor.clone())
        } else if self.email_extractor.can_extract(&file_type_lower) {
            Some(self.email_extractor.clone())
        } else {
            None
        }
    }
}

#[async_trait]
impl DocumentExtractor for CompositeDocumentExtractor {
    async fn extract_text_from_bytes(
        &self,
        data: &[u8],
        file_type: &str,
    ) -> Result<ExtractedText, DocumentExtractionError> {
        if file_type.eq_ignore_ascii_case("txt") {
            let text = String::from_utf8_lossy(data).into_owned();
            if text.trim().is_empty() {
                return Err(DocumentExtractionError::ExtractionFailed(
                    "Text file is empty".to_string(),
                ));
            }
            return Ok(ExtractedText {
                text,
                page_count: None,
            });
        }

        let extractor = self.extractor_for_type(file_type).ok_or_else(|| {
            DocumentExtractionError::UnsupportedFormat(file_type.to_string())
        })?;

        extractor.extract_text_from_bytes(data, file_type).await
    }

    fn supported_formats(&self) -> Vec<String> {
        let mut formats = vec!["txt".to_string()];
        formats.extend(self.pdf_extractor.supported_formats());
        formats.extend(self.docx_extractor.supported_formats());
        formats.extend(self.email_extractor.supported_formats());
        formats
    }

    fn can_extract(&self, file_type: &str) -> bool {
        file_type.eq_ignore_ascii_case("txt") || self.extractor_for_type(file_type).is_some()
    }
}
