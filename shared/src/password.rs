//! Password hashing and recovery-pin generation.
//!
//! Pins are hashed with Argon2id before they ever leave the process; the
//! store only sees PHC-format hash strings. Verification goes through the
//! argon2 verifier, which compares in constant time.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash a spoken password with a fresh random salt.
///
/// Returns a PHC-formatted string carrying the salt and parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Password(format!("hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check a candidate against a stored hash.
///
/// `Ok(false)` is an ordinary wrong password; `Err` means the stored hash is
/// unparseable or the verifier itself failed.
pub fn verify_password(candidate: &str, hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| Error::Password(format!("invalid hash: {e}")))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Password(format!("verification failed: {e}"))),
    }
}

/// Generate a random 5-digit recovery pin in [10000, 99999].
pub fn generate_recovery_pin() -> u32 {
    rand::thread_rng().gen_range(10_000..=99_999)
}
