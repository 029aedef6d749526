//! Salted password hashing.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a 16-byte random salt and a single
//! 32-byte output block, encoded as
//! `pbkdf2-sha256$<iterations>$<salt>$<hash>` (base64url, unpadded).

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Errors from parsing a stored hash.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The stored hash is not in the expected encoding.
    #[error("malformed password hash: {0}")]
    Malformed(&'static str),
}

/// An encoded password hash as stored on a [`User`](crate::model::User).
///
/// `Debug` hides the value so user records can be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an already-encoded hash.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded form.
    pub fn as_encoded(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// Hashes and verifies passwords with a fixed iteration count.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    /// Creates a hasher. Iteration counts below 1 are raised to 1.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Returns the configured iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hashes a password under a fresh random salt.
    pub fn hash(&self, password: &str) -> PasswordHash {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let derived = derive(password.as_bytes(), &salt, self.iterations);
        PasswordHash(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode(derived)
        ))
    }

    /// Checks a password against a stored hash in constant time.
    ///
    /// The iteration count recorded in the hash wins over the hasher's own,
    /// so hashes survive configuration changes.
    pub fn verify(&self, password: &str, stored: &PasswordHash) -> Result<bool, PasswordError> {
        let (iterations, salt, expected) = parse(stored.as_encoded())?;
        let derived = derive(password.as_bytes(), &salt, iterations);
        Ok(bool::from(derived.as_slice().ct_eq(expected.as_slice())))
    }

    /// Does the work of [`verify`](Self::verify) for an account that does
    /// not exist. Always `false`.
    pub fn verify_missing(&self, password: &str) -> bool {
        std::hint::black_box(derive(password.as_bytes(), &[0u8; SALT_LEN], self.iterations));
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}

fn parse(encoded: &str) -> Result<(u32, Vec<u8>, Vec<u8>), PasswordError> {
    let parts: Vec<&str> = encoded.split('$').collect();
    match parts.as_slice() {
        [scheme, iterations, salt, hash] if *scheme == SCHEME => {
            let iterations: u32 = iterations
                .parse()
                .map_err(|_| PasswordError::Malformed("iteration count"))?;
            if iterations == 0 {
                return Err(PasswordError::Malformed("iteration count"));
            }
            let salt = URL_SAFE_NO_PAD
                .decode(salt)
                .map_err(|_| PasswordError::Malformed("salt"))?;
            let hash = URL_SAFE_NO_PAD
                .decode(hash)
                .map_err(|_| PasswordError::Malformed("hash"))?;
            if hash.len() != HASH_LEN {
                return Err(PasswordError::Malformed("hash length"));
            }
            Ok((iterations, salt, hash))
        }
        [_, _, _, _] => Err(PasswordError::Malformed("unknown scheme")),
        _ => Err(PasswordError::Malformed("field count")),
    }
}
