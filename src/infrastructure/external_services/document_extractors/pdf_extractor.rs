use async_trait::async_trait;
use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedText,
};

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(doc: &Document) -> (String, i32, Vec<String>) {
        let pages = doc.get_pages();
        let page_count = pages.len() as i32;

        let extracted: Vec<Result<(u32, String), String>> = pages
            .into_par_iter()
            .map(|(page_num, _)| {
                let text = doc.extract_text(&[page_num]).map_err(|e| {
                    format!("Failed to extract text from page {}: {}", page_num, e)
                })?;

                let cleaned: String = text
                    .split('\n')
                    .map(|line| line.trim_end())
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");

                Ok((page_num, cleaned))
            })
            .collect();

        let mut page_texts: Vec<(u32, String)> = Vec::new();
        let mut errors = Vec::new();

        for result in extracted {
            match result {
                Ok(page) => page_texts.push(page),
                Err(error) => errors.push(error),
            }
        }

        page_texts.sort_by_key(|(page_num, _)| *page_num);
        let combined = page_texts
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n");

        (combined, page_count, errors)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
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

        let doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        let (text, page_count, errors) = Self::extract_pages(&doc);

        if text.trim().is_empty() {
            return Err(DocumentExtractionError::ExtractionFailed(format!(
                "No text extracted from {} page(s); {} page error(s)",
                page_count,
                errors.len()
            )));
        }

        if !errors.is_empty() {
            tracing::warn!(
                "PDF extraction skipped {} page(s): {}",
                errors.len(),
                errors.join("; ")
            );
        }

        Ok(ExtractedText {
            text,
            page_count: Some(page_count),
        })
    }

    fn supported_formats(&self) -> Vec<String> {
        vec!["pdf".to_string()]
    }

    fn can_extract(&self, file_type: &str) -> bool {
        file_type.eq_ignore_ascii_case("pdf")
    }
}
