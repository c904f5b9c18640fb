use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use super::error::{UserError, UserResult};

/// Argon2id PHC string for a user's password. Each call draws a fresh salt.
pub fn hash_password(plain: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(anyhow::anyhow!("hash: {e}")))
}

/// `Ok(false)` on mismatch; an unparseable stored hash is an error.
pub fn verify_password(plain: &str, stored_hash: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| UserError::PasswordHash(anyhow::anyhow!("parse stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
