//! Argon2 password hashing for stored credentials.
//!
//! Hashes are PHC strings with a fresh random salt per credential. The hash
//! is one-way; verification re-derives and compares, and any malformed
//! stored hash simply fails verification.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use depot_core::{Error, Result};
use rand_core::OsRng;

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::storage(format!("password hashing failed: {e}")))
}

/// Constant-shape check: parse failures and mismatches are both `false`.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}
