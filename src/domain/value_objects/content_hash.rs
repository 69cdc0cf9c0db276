use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(hash: String) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err("Hash must be 64 characters long (SHA-256)".to_string());
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Hash must contain only hexadecimal characters".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        Self(format!("{:x}", result))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &ContentHash) -> bool {
        self.0 == other.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hash() {
        let hash_str = "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
        let hash = ContentHash::new(hash_str.to_string()).unwrap();
        assert_eq!(hash.as_str(), hash_str);
    }

    #[test]
    fn test_invalid_hash_length() {
        let result = ContentHash::new("invalid".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_hash_characters() {
        let hash_str = "g665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
        let result = ContentHash::new(hash_str.to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_from_bytes() {
        let hash = ContentHash::from_bytes(b"hello world");
        assert_eq!(hash.as_str().len(), 64);
    }

    #[test]
    fn test_hash_matching() {
        let hash1 = ContentHash::from_bytes(b"policy wording");
        let hash2 = ContentHash::from_bytes(b"policy wording");
        let hash3 = ContentHash::from_bytes(b"different data");

        assert!(hash1.matches(&hash2));
        assert!(!hash1.matches(&hash3));
    }
}
