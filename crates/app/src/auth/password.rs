//! Password hashing.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("failed to hash password")]
    Hash(#[source] PhcError),

    #[error("stored password digest is malformed")]
    MalformedDigest(#[source] PhcError),
}

/// Argon2id hasher with fixed cost parameters (19 MiB, 2 passes, 1 lane).
///
/// Each digest embeds its own random salt, so hashing the same password twice gives two
/// different PHC strings. Verification uses the primitive's constant-time compare.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
}

impl SecretHasher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }

    /// Hash `password` into a PHC string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying primitive rejects the input.
    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(PasswordHashError::Hash)
    }

    /// Check `password` against a stored digest.
    ///
    /// # Errors
    ///
    /// A digest that cannot be parsed is an error, never a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest).map_err(PasswordHashError::MalformedDigest)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(error) => Err(PasswordHashError::MalformedDigest(error)),
        }
    }
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SecretHasher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SecretHasher")
            .field("algorithm", &"argon2id")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn hash_then_verify_round_trips() -> TestResult {
        let hasher = SecretHasher::new();

        let digest = hasher.hash("secret1")?;

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify("secret1", &digest)?);
        assert!(!hasher.verify("secret2", &digest)?);

        Ok(())
    }

    #[test]
    fn same_password_hashes_differently() -> TestResult {
        let hasher = SecretHasher::new();

        let first = hasher.hash("secret1")?;
        let second = hasher.hash("secret1")?;

        assert_ne!(first, second, "salts must differ between calls");
        assert!(hasher.verify("secret1", &first)?);
        assert!(hasher.verify("secret1", &second)?);

        Ok(())
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let hasher = SecretHasher::new();

        let result = hasher.verify("secret1", "not-a-phc-string");

        assert!(matches!(result, Err(PasswordHashError::MalformedDigest(_))));
    }
}
