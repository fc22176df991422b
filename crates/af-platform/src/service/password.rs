//! Password Hashing
//!
//! Argon2id with per-password salts. Verification failures and malformed
//! hashes both report as a mismatch.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{PortalError, Result};

const MIN_PASSWORD_LENGTH: usize = 8;

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PortalError::internal(format!("Password hashing failed: {e}")))
    }

    pub fn verify(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub fn validate_strength(password: &str) -> Result<()> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(PortalError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = PasswordService::hash("correct horse battery").unwrap();
        assert!(PasswordService::verify("correct horse battery", &hash));
        assert!(!PasswordService::verify("wrong password", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!PasswordService::verify("anything", "not-a-phc-string"));
    }

    #[test]
    fn strength_floor() {
        assert!(PasswordService::validate_strength("short").is_err());
        assert!(PasswordService::validate_strength("long enough").is_ok());
    }
}
