use crate::error::{AuthError, Result};

/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 10;

/// Hash a password using bcrypt with a fresh salt
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).map_err(|_e| AuthError::VerificationError)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let password = "my_secure_password";
        let hash = hash_password(password, TEST_COST).unwrap();

        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes() {
        let password = "same_password";
        let hash1 = hash_password(password, TEST_COST).unwrap();
        let hash2 = hash_password(password, TEST_COST).unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);

        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let hash = hash_password("password", DEFAULT_COST).unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("password", "not-a-hash"),
            Err(AuthError::VerificationError)
        ));
    }
}
