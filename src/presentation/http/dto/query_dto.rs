use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::scoring::ScoreResult;
use crate::application::use_cases::query_documents::QueryDocumentsResponse;

#[derive(Debug, Deserialize)]
pub struct QueryRequestDto {
    pub question: String,
    pub session_id: Option<String>,
    pub document_id: Option<Uuid>,
    pub document_type: Option<String>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScoreDetailsDto {
    pub document_type: String,
    pub question_weight: f64,
    pub document_weight: f64,
    pub score: f64,
}

impl From<&ScoreResult> for ScoreDetailsDto {
    fn from(score: &ScoreResult) -> Self {
        Self {
            document_type: score.document_type.as_str().to_string(),
            question_weight: score.question_weight,
            document_weight: score.document_weight,
            score: score.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryResponseDto {
    pub answer: String,
    pub justification: String,
    pub matched_clauses: Vec<String>,
    pub score_details: ScoreDetailsDto,
    pub confidence: f64,
}

impl From<QueryDocumentsResponse> for QueryResponseDto {
    fn from(response: QueryDocumentsResponse) -> Self {
        Self {
            answer: response.answer,
            justification: response.justification,
            matched_clauses: response.matched_clauses,
            score_details: ScoreDetailsDto::from(&response.score),
            confidence: response.score.confidence,
        }
    }
}
