use crate::error::AppError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use axum_extra::extract::cookie::Key;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

const CSRF_TOKEN_LEN: usize = 43;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing CSRF tokens and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Hash a password with Argon2id on the blocking pool.
///
/// `memory_kib` is the Argon2 memory cost; the result is a PHC string that
/// carries its own parameters, so verification needs no configuration.
pub async fn hash_password(password: &str, memory_kib: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let params = Params::new(
            memory_kib,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(AppError::internal)?;
        let salt = SaltString::generate(&mut OsRng);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(AppError::internal)
    })
    .await
    .map_err(AppError::internal)?
}

/// Check a password against a stored PHC hash on the blocking pool.
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || match PasswordHash::new(&hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    })
    .await
    .map_err(AppError::internal)
}

/// Fresh random token for the double-submit CSRF cookie
pub fn generate_csrf_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Stretch an arbitrary-length secret into the 64-byte cookie key
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
