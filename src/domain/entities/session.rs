use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named isolation boundary. Documents and chunks tagged with a session
/// id are invisible to queries outside it, and deleting the session must
/// cascade to every vector carrying the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, description: String) -> Result<Self, String> {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err("Session id cannot be empty".to_string());
        }
        if id.chars().any(|c| c.is_whitespace()) {
            return Err("Session id cannot contain whitespace".to_string());
        }

        Ok(Self {
            id,
            description,
            created_at: Utc::now(),
        })
    }

    pub fn restore(id: String, description: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new("claims-review".to_string(), "Q3 claims".to_string()).unwrap();

        assert_eq!(session.id(), "claims-review");
        assert_eq!(session.description(), "Q3 claims");
    }

    #[test]
    fn test_session_id_trimmed() {
        let session = Session::new("  batch-1  ".to_string(), String::new()).unwrap();
        assert_eq!(session.id(), "batch-1");
    }

    #[test]
    fn test_empty_session_id_rejected() {
        assert!(Session::new("   ".to_string(), String::new()).is_err());
    }

    #[test]
    fn test_whitespace_in_session_id_rejected() {
        assert!(Session::new("my session".to_string(), String::new()).is_err());
    }
}
