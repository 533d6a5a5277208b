//! Password hashing. Argon2id in PHC string format; the stored hash
//! carries its own salt and parameters, so verification needs nothing
//! but the string itself.

use argon2::password_hash::{rand_core::OsRng, Error, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

/// Hashes a plaintext password into a PHC string.
pub fn hash_password(plain: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verifies a plaintext password against a stored PHC string.
/// Any failure, including an unparseable hash, reads as a mismatch.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
