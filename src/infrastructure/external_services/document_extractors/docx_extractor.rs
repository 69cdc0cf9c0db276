use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedText,
};

/// DOCX is a zip container; the document body lives in
/// `word/document.xml` with paragraph boundaries as `w:p` elements.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read_document_xml(data: &[u8]) -> Result<String, DocumentExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        let mut entry = archive.by_name("word/document.xml").map_err(|_| {
            DocumentExtractionError::CorruptedFile(
                "Archive has no word/document.xml entry".to_string(),
            )
        })?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        Ok(xml)
    }

    fn text_from_xml(xml: &str) -> Result<String, DocumentExtractionError> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Text(fragment)) => {
                    let value = fragment
                        .unescape()
                        .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))?;
                    text.push_str(&value);
                }
                Ok(Event::End(tag)) if tag.name().as_ref() == b"w:p" => {
                    text.push('\n');
                }
                Ok(Event::Empty(tag)) if tag.name().as_ref() == b"w:tab" => {
                    text.push(' ');
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(DocumentExtractionError::ExtractionFailed(e.to_string()));
                }
            }
        }

        Ok(text)
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for DocxExtractor {
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

        let xml = Self::read_document_xml(data)?;
        let text = Self::text_from_xml(&xml)?;

        if text.trim().is_empty() {
            return Err(DocumentExtractionError::ExtractionFailed(
                "Document body contained no text".to_string(),
            ));
        }

        Ok(ExtractedText {
            text,
            page_count: None,
        })
    }

    fn supported_formats(&self) -> Vec<String> {
        vec!["docx".to_string(), "doc".to_string()]
    }

    fn can_extract(&self, file_type: &str) -> bool {
        matches!(file_type.to_lowercase().as_str(), "docx" | "doc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[tokio::test]
    async fn test_extracts_paragraph_text() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>The premium is payable annually.</w:t></w:r></w:p>
                <w:p><w:r><w:t>Knee surgery is covered.</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;

        let extractor = DocxExtractor::new();
        let extracted = extractor
            .extract_text_from_bytes(&build_docx(xml), "docx")
            .await
            .unwrap();

        assert!(extracted.text.contains("The premium is payable annually."));
        assert!(extracted.text.contains("Knee surgery is covered."));
        // Paragraphs end up on separate lines.
        assert!(
            extracted
                .text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .count()
                >= 2
        );
    }

    #[tokio::test]
    async fn test_not_a_zip_is_corrupted() {
        let extractor = DocxExtractor::new();
        let error = extractor
            .extract_text_from_bytes(b"plain bytes", "docx")
            .await
            .unwrap_err();

        assert!(matches!(error, DocumentExtractionError::CorruptedFile(_)));
    }

    #[tokio::test]
    async fn test_wrong_type_rejected() {
        let extractor = DocxExtractor::new();
        let error = extractor
            .extract_text_from_bytes(b"data", "pdf")
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            DocumentExtractionError::UnsupportedFormat(_)
        ));
    }
}
