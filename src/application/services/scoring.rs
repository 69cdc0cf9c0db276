use serde::Serialize;

use crate::domain::value_objects::DocumentType;

/// Verbs that mark an analytical question, matched anywhere in the text.
const COMPLEX_MARKERS: [&str; 8] = [
    "analyze",
    "analyse",
    "compare",
    "explain",
    "evaluate",
    "assess",
    "summarize",
    "interpret",
];

/// Markers of a polar (yes/no) question. Only honored as the leading
/// token: "Does this policy cover X?" is polar, "What is the premium?"
/// is not, even though it contains "is".
const POLAR_MARKERS: [&str; 10] = [
    "does", "do", "is", "are", "can", "will", "has", "have", "was", "were",
];

#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub complex_question_weight: f64,
    pub polar_question_weight: f64,
    pub basic_question_weight: f64,
    /// Unclassified documents cannot be cross-validated against public
    /// sources, so they demand a stronger corroboration signal.
    pub unknown_document_weight: f64,
    pub known_document_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            complex_question_weight: 2.0,
            polar_question_weight: 1.5,
            basic_question_weight: 1.0,
            unknown_document_weight: 2.0,
            known_document_weight: 0.5,
        }
    }
}

/// Per-query score with both contributing factors surfaced. The product
/// alone would lose the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub document_type: DocumentType,
    pub question_weight: f64,
    pub document_weight: f64,
    pub score: f64,
    pub confidence: f64,
}

/// Deterministic weighted scorer: two static lookup tables and one
/// multiplication, no learned component. Never errors; unrecognized
/// inputs fall back to default weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, document_type: DocumentType, question: &str) -> ScoreResult {
        let question_weight = self.question_weight(question);
        let document_weight = self.document_weight(document_type);
        let score = question_weight * document_weight;

        ScoreResult {
            document_type,
            question_weight,
            document_weight,
            score,
            confidence: self.confidence(score),
        }
    }

    fn question_weight(&self, question: &str) -> f64 {
        let lowered = question.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens
            .iter()
            .any(|token| COMPLEX_MARKERS.contains(token))
        {
            return self.config.complex_question_weight;
        }

        if let Some(first) = tokens.first() {
            if POLAR_MARKERS.contains(first) {
                return self.config.polar_question_weight;
            }
        }

        self.config.basic_question_weight
    }

    fn document_weight(&self, document_type: DocumentType) -> f64 {
        if document_type.is_known() {
            self.config.known_document_weight
        } else {
            self.config.unknown_document_weight
        }
    }

    /// Bounded, monotonic mapping of the raw score into [0, 1], anchored
    /// at the maximum attainable product.
    fn confidence(&self, score: f64) -> f64 {
        let max_score = self.config.complex_question_weight * self.config.unknown_document_weight;
        if max_score <= 0.0 {
            return 0.0;
        }
        (score / max_score).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> Scorer {
        Scorer::default()
    }

    #[test]
    fn test_polar_question_on_unknown_document() {
        let result = scorer().score(
            DocumentType::Unknown,
            "Does this policy cover knee surgery?",
        );

        assert_eq!(result.question_weight, 1.5);
        assert_eq!(result.document_weight, 2.0);
        assert_eq!(result.score, 3.0);
    }

    #[test]
    fn test_complex_question_on_unknown_document() {
        let result = scorer().score(DocumentType::Unknown, "Analyze the coverage limitations");

        assert_eq!(result.question_weight, 2.0);
        assert_eq!(result.document_weight, 2.0);
        assert_eq!(result.score, 4.0);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_basic_question_on_known_document() {
        let result = scorer().score(DocumentType::PolicyWording, "What is the premium amount?");

        // "is" mid-question does not make it polar.
        assert_eq!(result.question_weight, 1.0);
        assert_eq!(result.document_weight, 0.5);
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn test_score_is_product_of_factors() {
        let questions = [
            "Does the exclusion apply?",
            "Compare the two riders",
            "Premium due dates",
        ];
        let types = [DocumentType::Unknown, DocumentType::Legal];

        for question in questions {
            for document_type in types {
                let result = scorer().score(document_type, question);
                assert_eq!(result.score, result.question_weight * result.document_weight);
            }
        }
    }

    #[test]
    fn test_confidence_bounded_and_monotonic() {
        let low = scorer().score(DocumentType::Legal, "Premium due dates");
        let mid = scorer().score(DocumentType::Unknown, "Does the exclusion apply?");
        let high = scorer().score(DocumentType::Unknown, "Analyze the exclusions");

        assert!(low.confidence >= 0.0 && low.confidence <= 1.0);
        assert!(low.confidence < mid.confidence);
        assert!(mid.confidence < high.confidence);
    }

    #[test]
    fn test_complex_marker_anywhere_in_question() {
        let result = scorer().score(DocumentType::Unknown, "Please compare both plans");
        assert_eq!(result.question_weight, 2.0);
    }

    #[test]
    fn test_empty_question_gets_default_weight() {
        let result = scorer().score(DocumentType::Unknown, "");
        assert_eq!(result.question_weight, 1.0);
    }

    #[test]
    fn test_punctuation_does_not_hide_markers() {
        let result = scorer().score(DocumentType::Unknown, "Does, in fact, the cover apply?");
        assert_eq!(result.question_weight, 1.5);
    }
}
