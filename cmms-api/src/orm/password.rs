//! Password hashing for stored user credentials.
//!
//! Passwords are kept as Argon2 PHC strings. Only hashing lives here; this
//! service stores credentials but does not authenticate against them.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hashes a plain text password with Argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, diesel::result::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| diesel::result::Error::SerializationError(e.to_string().into()))
}
