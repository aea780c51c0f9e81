use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::errors::internal::StoreError;

/// Hash a password with Argon2id and a fresh random salt.
///
/// The result is a PHC-format string that embeds the salt and the
/// parameters, so verification needs nothing beyond the stored hash.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Check a candidate password against a stored PHC-format hash.
///
/// A hash that fails to parse counts as a mismatch rather than an error;
/// callers treat both the same way.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
