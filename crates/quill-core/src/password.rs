use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("correct horse battery").unwrap();
        assert_ne!(hashed, "correct horse battery");
        assert!(verify_password("correct horse battery", &hashed).unwrap());
        assert!(!verify_password("wrong password", &hashed).unwrap());
    }

    #[test]
    fn test_verify_against_malformed_hash_errors() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
