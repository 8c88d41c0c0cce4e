use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use std::sync::Arc;

use crate::error::AppError;

/// PasswordHasher
///
/// The hashing collaborator used by registration, login and password change.
/// Handlers only see `hash` and `verify`; the primitive lives behind the trait.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

pub type HasherState = Arc<dyn PasswordHasher>;

/// A well-formed Argon2id digest that matches no password. Login verifies
/// against it when the username is unknown, so both failures cost one hash.
pub const DUMMY_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2id with the crate's default parameters and a fresh random salt per hash.
#[derive(Default, Clone)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        // An unparseable digest simply never matches.
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = Argon2Hasher;
        let digest = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &digest));
        assert!(!hasher.verify("wrong horse", &digest));
    }

    #[test]
    fn dummy_digest_parses_and_never_matches() {
        assert!(PasswordHash::new(DUMMY_DIGEST).is_ok());
        assert!(!Argon2Hasher.verify("", DUMMY_DIGEST));
        assert!(!Argon2Hasher.verify("correct horse", DUMMY_DIGEST));
    }

    #[test]
    fn garbage_digest_never_matches() {
        assert!(!Argon2Hasher.verify("anything", "not-a-phc-string"));
    }
}
