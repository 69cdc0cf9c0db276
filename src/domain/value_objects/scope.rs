use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::DocumentType;

/// Metadata carried by every stored vector. Retrieval correctness depends
/// on this matching the owning document exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub document_id: Uuid,
    pub session_id: Option<String>,
    pub document_type: DocumentType,
}

/// The resolved filter applied before any vector similarity search
/// executes. Resolution happens once, in the isolation resolver; every
/// retrieval and deletion against the vector index goes through one of
/// these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopePredicate {
    /// Restrict to a single document, ignoring session and type.
    Document(Uuid),
    /// Restrict to every chunk tagged with this session id.
    Session(String),
    /// Restrict by document type across all sessions ("all user
    /// documents" mode).
    Type(DocumentType),
    /// No restriction. Callers must opt in explicitly.
    Unscoped,
}

impl ScopePredicate {
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        match self {
            ScopePredicate::Document(document_id) => metadata.document_id == *document_id,
            ScopePredicate::Session(session_id) => {
                metadata.session_id.as_deref() == Some(session_id.as_str())
            }
            ScopePredicate::Type(document_type) => metadata.document_type == *document_type,
            ScopePredicate::Unscoped => true,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            ScopePredicate::Session(session_id) => Some(session_id.as_str()),
            _ => None,
        }
    }

    pub fn is_unscoped(&self) -> bool {
        matches!(self, ScopePredicate::Unscoped)
    }
}

impl std::fmt::Display for ScopePredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopePredicate::Document(id) => write!(f, "document={}", id),
            ScopePredicate::Session(id) => write!(f, "session={}", id),
            ScopePredicate::Type(t) => write!(f, "document_type={}", t),
            ScopePredicate::Unscoped => write!(f, "unscoped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(session: Option<&str>, document_type: DocumentType) -> ChunkMetadata {
        ChunkMetadata {
            document_id: Uuid::new_v4(),
            session_id: session.map(|s| s.to_string()),
            document_type,
        }
    }

    #[test]
    fn test_session_predicate_rejects_other_sessions() {
        let predicate = ScopePredicate::Session("s1".to_string());

        assert!(predicate.matches(&metadata(Some("s1"), DocumentType::Unknown)));
        assert!(!predicate.matches(&metadata(Some("s2"), DocumentType::Unknown)));
        assert!(!predicate.matches(&metadata(None, DocumentType::Unknown)));
    }

    #[test]
    fn test_document_predicate_is_exact() {
        let target = Uuid::new_v4();
        let predicate = ScopePredicate::Document(target);

        let mut matching = metadata(Some("s1"), DocumentType::Legal);
        matching.document_id = target;

        assert!(predicate.matches(&matching));
        assert!(!predicate.matches(&metadata(Some("s1"), DocumentType::Legal)));
    }

    #[test]
    fn test_type_predicate_spans_sessions() {
        let predicate = ScopePredicate::Type(DocumentType::Medical);

        assert!(predicate.matches(&metadata(Some("s1"), DocumentType::Medical)));
        assert!(predicate.matches(&metadata(None, DocumentType::Medical)));
        assert!(!predicate.matches(&metadata(None, DocumentType::Legal)));
    }

    #[test]
    fn test_unscoped_matches_everything() {
        let predicate = ScopePredicate::Unscoped;

        assert!(predicate.matches(&metadata(Some("s1"), DocumentType::Legal)));
        assert!(predicate.matches(&metadata(None, DocumentType::Unknown)));
    }
}
