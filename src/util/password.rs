//! Password hashing with Argon2id.
//!
//! Each hash embeds its own random salt and parameters, so verification
//! needs nothing but the stored hash string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Invalid(format!("failed to hash password: {e}")))
}

/// Check a password against a stored hash.
///
/// Both a malformed hash and a mismatch report the same `Unauthorized`
/// error; callers should not disclose which.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(hashed_password)
        .map_err(|_| AppError::Unauthorized("incorrect username or password".to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized("incorrect username or password".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("secret-password").unwrap();
        assert!(verify_password("secret-password", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("secret-password").unwrap();
        assert!(verify_password("wrong-password", &hash).is_err());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hash1 = hash_password("secret-password").unwrap();
        let hash2 = hash_password("secret-password").unwrap();
        assert_ne!(hash1, hash2);
    }
}
