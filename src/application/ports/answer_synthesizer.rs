use async_trait::async_trait;

use crate::domain::value_objects::DocumentType;

#[derive(Debug)]
pub enum AnswerSynthesisError {
    Timeout(String),
    NetworkError(String),
    ApiError(String),
    /// The model's output did not parse into the structured answer shape.
    UnparsableResponse(String),
}

impl std::fmt::Display for AnswerSynthesisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSynthesisError::Timeout(msg) => write!(f, "Synthesis timeout: {}", msg),
            AnswerSynthesisError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AnswerSynthesisError::ApiError(msg) => write!(f, "API error: {}", msg),
            AnswerSynthesisError::UnparsableResponse(msg) => {
                write!(f, "Unparsable response: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnswerSynthesisError {}

impl AnswerSynthesisError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AnswerSynthesisError::Timeout(_))
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self, AnswerSynthesisError::UnparsableResponse(_))
    }
}

/// Parsed structured output of the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAnswer {
    pub answer: String,
    pub justification: String,
    pub matched_clauses: Vec<String>,
}

/// Prompt variant. `Strict` is the one-shot recovery prompt used after a
/// parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPromptStyle {
    Standard,
    Strict,
}

/// External language model behind a type-specific prompt template.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        question: &str,
        context_chunks: &[String],
        document_type: DocumentType,
        style: SynthesisPromptStyle,
    ) -> Result<SynthesizedAnswer, AnswerSynthesisError>;
}
