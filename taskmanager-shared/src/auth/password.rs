/// Password hashing and password policy
///
/// Credentials are stored as Argon2id PHC strings. Verification is
/// constant-time inside `argon2`.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("svoboda")?;
///
/// assert!(verify_password("svoboda", &hash)?);
/// assert!(!verify_password("liberty", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with a fresh random salt
///
/// # Returns
///
/// PHC string, e.g. `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored PHC hash
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Validates a new password and its confirmation
///
/// Rules:
/// - At least [`MIN_PASSWORD_LENGTH`] characters
/// - Confirmation must match exactly
///
/// # Returns
///
/// `Ok(())` if the password is acceptable, `Err` with a user-facing message if not
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::password::validate_new_password;
///
/// assert!(validate_new_password("svoboda", "svoboda").is_ok());
/// assert!(validate_new_password("sv", "sv").is_err());
/// assert!(validate_new_password("svo1", "svo").is_err());
/// ```
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Your password must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password != confirmation {
        return Err("The two password fields didn't match.".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("svoboda").expect("Hash should succeed");

        assert!(verify_password("svoboda", &hash).expect("Verify should succeed"));
        assert!(!verify_password("liberty", &hash).expect("Verify should succeed"));
        assert!(!verify_password("", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
    }

    #[test]
    fn test_verify_password_against_hash_without_params() {
        // Parses as a PHC string but can never match
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Ok(false)
        ));
    }

    #[test]
    fn test_verify_unicode_password() {
        let hash = hash_password("пароль-密码").expect("Hash should succeed");
        assert!(verify_password("пароль-密码", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_validate_new_password_accepts_short_but_valid() {
        assert!(validate_new_password("abc", "abc").is_ok());
        assert!(validate_new_password("svoboda", "svoboda").is_ok());
    }

    #[test]
    fn test_validate_new_password_too_short() {
        let result = validate_new_password("sv", "sv");
        assert!(result.unwrap_err().contains("at least 3 characters"));
    }

    #[test]
    fn test_validate_new_password_counts_characters_not_bytes() {
        // Two Cyrillic letters are four bytes but still too short
        assert!(validate_new_password("пр", "пр").is_err());
        assert!(validate_new_password("при", "при").is_ok());
    }

    #[test]
    fn test_validate_new_password_mismatch() {
        let result = validate_new_password("svo1", "svo");
        assert!(result.unwrap_err().contains("didn't match"));
    }
}
