use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::{DocumentType, ScopePredicate};

#[derive(Debug)]
pub enum ScopeError {
    /// `document_id` and `session_id` were both supplied but the document
    /// does not belong to that session. Failing here prevents an
    /// accidental broadening of visibility.
    Conflict {
        document_id: Uuid,
        session_id: String,
    },
    /// `document_id` was supplied but the caller did not provide the
    /// owning document for validation.
    MissingDocument(Uuid),
    /// No scope input was supplied and the caller did not opt into an
    /// unscoped search.
    UnscopedNotAllowed,
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::Conflict {
                document_id,
                session_id,
            } => write!(
                f,
                "Document {} does not belong to session '{}'",
                document_id, session_id
            ),
            ScopeError::MissingDocument(id) => {
                write!(f, "Document {} was not supplied for scope validation", id)
            }
            ScopeError::UnscopedNotAllowed => {
                write!(f, "Unscoped queries are not allowed for this caller")
            }
        }
    }
}

impl std::error::Error for ScopeError {}

/// The user-supplied scope inputs of a query, prior to resolution.
#[derive(Debug, Clone, Default)]
pub struct ScopeRequest {
    pub session_id: Option<String>,
    pub document_id: Option<Uuid>,
    pub document_type: Option<DocumentType>,
    pub allow_unscoped: bool,
}

/// Translates user-supplied query parameters into the storage-level
/// filter. This is the single authority for that translation; nothing
/// else may hand a filter to the vector index.
///
/// Precedence: document > session > type > unscoped. When `document_id`
/// is set the caller must pass the already-fetched owning document so
/// session membership can be validated without I/O.
pub fn resolve_scope(
    request: &ScopeRequest,
    document: Option<&Document>,
) -> Result<ScopePredicate, ScopeError> {
    if let Some(document_id) = request.document_id {
        let document = document.ok_or(ScopeError::MissingDocument(document_id))?;

        if let Some(session_id) = &request.session_id {
            if !document.belongs_to_session(session_id) {
                return Err(ScopeError::Conflict {
                    document_id,
                    session_id: session_id.clone(),
                });
            }
        }

        // Document scope ignores any supplied document_type.
        return Ok(ScopePredicate::Document(document_id));
    }

    if let Some(session_id) = &request.session_id {
        return Ok(ScopePredicate::Session(session_id.clone()));
    }

    if let Some(document_type) = request.document_type {
        return Ok(ScopePredicate::Type(document_type));
    }

    if request.allow_unscoped {
        Ok(ScopePredicate::Unscoped)
    } else {
        Err(ScopeError::UnscopedNotAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ContentHash;

    fn document_in_session(session_id: Option<&str>) -> Document {
        Document::new(
            "policy.pdf".to_string(),
            session_id.map(|s| s.to_string()),
            DocumentType::PolicyWording,
            ContentHash::from_bytes(b"body"),
            1,
        )
    }

    #[test]
    fn test_document_scope_wins_over_everything() {
        let document = document_in_session(Some("s1"));
        let request = ScopeRequest {
            session_id: Some("s1".to_string()),
            document_id: Some(document.id()),
            document_type: Some(DocumentType::Legal),
            allow_unscoped: false,
        };

        let predicate = resolve_scope(&request, Some(&document)).unwrap();
        assert_eq!(predicate, ScopePredicate::Document(document.id()));
    }

    #[test]
    fn test_conflicting_session_fails() {
        let document = document_in_session(Some("s2"));
        let request = ScopeRequest {
            session_id: Some("s1".to_string()),
            document_id: Some(document.id()),
            ..Default::default()
        };

        let error = resolve_scope(&request, Some(&document)).unwrap_err();
        assert!(matches!(error, ScopeError::Conflict { .. }));
    }

    #[test]
    fn test_sessionless_document_conflicts_with_session() {
        let document = document_in_session(None);
        let request = ScopeRequest {
            session_id: Some("s1".to_string()),
            document_id: Some(document.id()),
            ..Default::default()
        };

        assert!(resolve_scope(&request, Some(&document)).is_err());
    }

    #[test]
    fn test_session_scope() {
        let request = ScopeRequest {
            session_id: Some("s1".to_string()),
            ..Default::default()
        };

        let predicate = resolve_scope(&request, None).unwrap();
        assert_eq!(predicate, ScopePredicate::Session("s1".to_string()));
    }

    #[test]
    fn test_type_scope_is_global() {
        let request = ScopeRequest {
            document_type: Some(DocumentType::Financial),
            ..Default::default()
        };

        let predicate = resolve_scope(&request, None).unwrap();
        assert_eq!(predicate, ScopePredicate::Type(DocumentType::Financial));
    }

    #[test]
    fn test_unscoped_requires_opt_in() {
        let denied = resolve_scope(&ScopeRequest::default(), None).unwrap_err();
        assert!(matches!(denied, ScopeError::UnscopedNotAllowed));

        let allowed = resolve_scope(
            &ScopeRequest {
                allow_unscoped: true,
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(allowed, ScopePredicate::Unscoped);
    }

    #[test]
    fn test_document_without_lookup_is_an_error() {
        let request = ScopeRequest {
            document_id: Some(Uuid::new_v4()),
            ..Default::default()
        };

        assert!(matches!(
            resolve_scope(&request, None),
            Err(ScopeError::MissingDocument(_))
        ));
    }
}
