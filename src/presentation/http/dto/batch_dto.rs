use serde::{Deserialize, Serialize};

use crate::application::use_cases::batch_run::BatchRunResponse;

#[derive(Debug, Deserialize)]
pub struct BatchRunRequestDto {
    /// URL of the document to process.
    pub documents: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchRunResponseDto {
    pub answers: Vec<String>,
}

impl From<BatchRunResponse> for BatchRunResponseDto {
    fn from(response: BatchRunResponse) -> Self {
        Self {
            answers: response
                .answers
                .into_iter()
                .map(|answer| answer.answer)
                .collect(),
        }
    }
}
