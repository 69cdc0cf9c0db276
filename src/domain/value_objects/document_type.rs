use serde::{Deserialize, Serialize};

/// Closed classification label for a document's domain. `Unknown` is the
/// conservative default whenever classification cannot clear its
/// confidence floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PolicyWording,
    Legal,
    Financial,
    Technical,
    Medical,
    Unknown,
}

impl DocumentType {
    pub const NAMED_TYPES: [DocumentType; 5] = [
        DocumentType::PolicyWording,
        DocumentType::Legal,
        DocumentType::Financial,
        DocumentType::Technical,
        DocumentType::Medical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PolicyWording => "policy_wording",
            DocumentType::Legal => "legal",
            DocumentType::Financial => "financial",
            DocumentType::Technical => "technical",
            DocumentType::Medical => "medical",
            DocumentType::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "policy_wording" | "policy-wording" | "policy" => Ok(DocumentType::PolicyWording),
            "legal" => Ok(DocumentType::Legal),
            "financial" => Ok(DocumentType::Financial),
            "technical" => Ok(DocumentType::Technical),
            "medical" => Ok(DocumentType::Medical),
            "unknown" => Ok(DocumentType::Unknown),
            other => Err(format!("Invalid document type: {}", other)),
        }
    }

    /// A named type has public provenance that can be cross-validated;
    /// `Unknown` cannot and is weighted accordingly by the scorer.
    pub fn is_known(&self) -> bool {
        !matches!(self, DocumentType::Unknown)
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Unknown
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for document_type in DocumentType::NAMED_TYPES {
            let parsed = DocumentType::parse(document_type.as_str()).unwrap();
            assert_eq!(parsed, document_type);
        }
        assert_eq!(
            DocumentType::parse("unknown").unwrap(),
            DocumentType::Unknown
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            DocumentType::parse("policy").unwrap(),
            DocumentType::PolicyWording
        );
        assert_eq!(
            DocumentType::parse("Policy-Wording").unwrap(),
            DocumentType::PolicyWording
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DocumentType::parse("novel").is_err());
    }

    #[test]
    fn test_is_known() {
        assert!(DocumentType::Legal.is_known());
        assert!(!DocumentType::Unknown.is_known());
    }
}
