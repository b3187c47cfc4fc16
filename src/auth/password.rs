use crate::error::AppError;

/// Cheapest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// A stored hash that bcrypt cannot parse never verifies.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// Rejects passwords bcrypt would silently truncate.
pub fn check_password_length(plaintext: &str) -> Result<(), AppError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let a = hash_password("password123", MIN_BCRYPT_COST).unwrap();
        let b = hash_password("password123", MIN_BCRYPT_COST).unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("password123"));
        assert!(verify_password("password123", &a));
        assert!(verify_password("password123", &b));
        assert!(!verify_password("password124", &a));
    }

    #[test]
    fn test_malformed_hash_fails_verification() {
        assert!(!verify_password("password123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_invalid_cost_is_internal_error() {
        let err = hash_password("password123", 1).unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[test]
    fn test_password_length_limit() {
        assert!(check_password_length(&"a".repeat(MAX_PASSWORD_BYTES)).is_ok());

        let err = check_password_length(&"a".repeat(MAX_PASSWORD_BYTES + 3)).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // Multi-byte characters count by encoded length.
        assert!(check_password_length(&"é".repeat(37)).is_err());
    }
}
