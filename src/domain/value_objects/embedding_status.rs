use serde::{Deserialize, Serialize};

/// Lifecycle of a document's chunks inside the vector index. Embedding is
/// all-or-nothing per document: `Embedded` means every chunk's vector was
/// stored, `Failed` means none were.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EmbeddingStatus {
    Pending,
    Embedding,
    Embedded,
    Failed(String),
}

impl EmbeddingStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EmbeddingStatus::Pending)
    }

    pub fn is_embedding(&self) -> bool {
        matches!(self, EmbeddingStatus::Embedding)
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, EmbeddingStatus::Embedded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EmbeddingStatus::Failed(_))
    }

    pub fn can_transition_to(&self, new_status: &EmbeddingStatus) -> bool {
        match (self, new_status) {
            (EmbeddingStatus::Pending, EmbeddingStatus::Embedding) => true,
            (EmbeddingStatus::Embedding, EmbeddingStatus::Embedded) => true,
            (EmbeddingStatus::Embedding, EmbeddingStatus::Failed(_)) => true,
            // Re-embedding with a type override restarts the cycle.
            (EmbeddingStatus::Embedded, EmbeddingStatus::Embedding) => true,
            (EmbeddingStatus::Failed(_), EmbeddingStatus::Embedding) => true,
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            EmbeddingStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingStatus::Pending => "pending",
            EmbeddingStatus::Embedding => "embedding",
            EmbeddingStatus::Embedded => "embedded",
            EmbeddingStatus::Failed(_) => "failed",
        }
    }

    pub fn from_parts(status: &str, error: Option<String>) -> Result<Self, String> {
        match status.to_lowercase().as_str() {
            "pending" => Ok(EmbeddingStatus::Pending),
            "embedding" => Ok(EmbeddingStatus::Embedding),
            "embedded" => Ok(EmbeddingStatus::Embedded),
            "failed" => Ok(EmbeddingStatus::Failed(
                error.unwrap_or_else(|| "Unknown error".to_string()),
            )),
            other => Err(format!("Invalid embedding status: {}", other)),
        }
    }
}

impl Default for EmbeddingStatus {
    fn default() -> Self {
        EmbeddingStatus::Pending
    }
}

impl std::fmt::Display for EmbeddingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(EmbeddingStatus::Pending.is_pending());
        assert!(EmbeddingStatus::Embedding.is_embedding());
        assert!(EmbeddingStatus::Embedded.is_embedded());
        assert!(EmbeddingStatus::Failed("boom".to_string()).is_failed());
    }

    #[test]
    fn test_transitions() {
        let pending = EmbeddingStatus::Pending;
        let embedding = EmbeddingStatus::Embedding;
        let embedded = EmbeddingStatus::Embedded;
        let failed = EmbeddingStatus::Failed("error".to_string());

        assert!(pending.can_transition_to(&embedding));
        assert!(embedding.can_transition_to(&embedded));
        assert!(embedding.can_transition_to(&failed));
        assert!(failed.can_transition_to(&embedding));
        assert!(embedded.can_transition_to(&embedding));

        assert!(!pending.can_transition_to(&embedded));
        assert!(!embedded.can_transition_to(&pending));
    }

    #[test]
    fn test_string_round_trip() {
        let statuses = vec![
            EmbeddingStatus::Pending,
            EmbeddingStatus::Embedding,
            EmbeddingStatus::Embedded,
            EmbeddingStatus::Failed("test error".to_string()),
        ];

        for status in statuses {
            let parsed = EmbeddingStatus::from_parts(
                status.as_str(),
                status.error_message().map(|e| e.to_string()),
            )
            .unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(EmbeddingStatus::from_parts("uploaded", None).is_err());
    }
}
