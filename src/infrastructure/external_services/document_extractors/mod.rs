pub mod composite_extractor;
pub mod docx_extractor;
pub mod email_extractor;
pub mod pdf_extractor;

pub use composite_extractor::CompositeDocumentExtractor;
pub use docx_extractor::DocxExtractor;
pub use email_extractor::EmailExtractor;
pub use pdf_extractor::PdfExtractor;
