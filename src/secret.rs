use std::fmt;

use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// A wrapper that keeps credentials out of logs and wipes them on drop.
///
/// Used for the token signing key in [`Config`](crate::Config) and for the
/// plaintext passwords carried by login and registration bodies.
///
/// `Debug` and `Display` always print `[REDACTED]`; the value is reachable only
/// through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use hostel_access::Secret;
///
/// let key = Secret::new("signing-key-0123456789".to_string());
/// assert_eq!(format!("{key:?}"), "[REDACTED]");
/// assert_eq!(key.expose_secret(), "signing-key-0123456789");
/// ```
// No Clone: copies of key material should be explicit.
pub struct Secret<T: Zeroize> {
    inner: T,
}

impl<T: Zeroize> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    ///
    /// Do not log or format what this returns.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<T: Zeroize> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<'de, T: Zeroize + Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Secret::new)
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacts_debug_and_display() {
        let password = Secret::new("hunter2".to_string());

        let debug_output = format!("{password:?}");
        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("String"));
        assert_eq!(format!("{password}"), "[REDACTED]");
    }

    #[test]
    fn secret_deserializes_transparently() {
        #[derive(Deserialize)]
        struct Login {
            password: Secret<String>,
        }

        let login: Login = serde_json::from_str(r#"{"password":"password123"}"#).unwrap();
        assert_eq!(login.password.expose_secret(), "password123");
        assert_eq!(format!("{:?}", login.password), "[REDACTED]");
    }

    #[test]
    fn secret_exposes_when_explicit() {
        let secret = Secret::new(vec![1u8, 2, 3]);
        assert_eq!(secret.expose_secret(), &vec![1, 2, 3]);
    }
}
