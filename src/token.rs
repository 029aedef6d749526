//! Signed bearer tokens.
//!
//! Tokens are compact HS256 JWTs: `header.payload.signature`, each part
//! base64url without padding. The signature is HMAC-SHA256 over
//! `header.payload`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::model::{Role, User, UserId};
use crate::secret::Secret;

type HmacSha256 = Hmac<Sha256>;

const MAX_TOKEN_LEN: usize = 2048;
const ALGORITHM: &str = "HS256";

/// Default token lifetime: seven days.
pub const DEFAULT_TTL_HOURS: i64 = 168;

/// Why a token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong shape, bad base64 or undecodable claims.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The signature does not match the payload.
    #[error("token signature mismatch")]
    BadSignature,
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,
    /// Claims could not be encoded or the key was unusable.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Identity claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user the token was issued to
    pub id: UserId,
    /// Role at issue time
    pub role: Role,
    /// Email at issue time
    pub email: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Issues and verifies tokens under one signing key.
#[derive(Debug)]
pub struct TokenIssuer {
    key: Secret<Vec<u8>>,
    ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer with the given key and lifetime.
    pub fn new(key: &[u8], ttl: Duration) -> Self {
        Self {
            key: Secret::new(key.to_vec()),
            ttl,
        }
    }

    /// Returns the token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `user`, valid from `now` for the configured lifetime.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            id: user.id,
            role: user.role,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let header_part = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header).map_err(|e| TokenError::Encoding(e.to_string()))?,
        );
        let payload_part = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(claims).map_err(|e| TokenError::Encoding(e.to_string()))?,
        );
        let signing_input = format!("{header_part}.{payload_part}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{sig_part}"))
    }

    /// Verifies signature and expiry and returns the claims.
    ///
    /// A token whose `exp` equals `now` is already expired.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::Malformed("token exceeds max length".into()));
        }
        let mut parts = token.split('.');
        let (header_part, payload_part, sig_part) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => return Err(TokenError::Malformed("expected three parts".into())),
            };

        let expected = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        let mut mac = self.mac()?;
        mac.update(header_part.as_bytes());
        mac.update(b".");
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| TokenError::BadSignature)?;

        let header: Header = decode_part(header_part)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed(format!(
                "unsupported algorithm {}",
                header.alg
            )));
        }
        let claims: Claims = decode_part(payload_part)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.key.expose_secret())
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

fn decode_part<T: for<'de> Deserialize<'de>>(part: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(e.to_string()))
}
