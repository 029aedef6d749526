use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::error::Violation;
use crate::{Tainted, Verified};

/// A tainted value failed validation.
///
/// The message never echoes the rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sanitization failed ({kind}): {message}")]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SanitizationError> for Violation {
    fn from(err: SanitizationError) -> Self {
        match err.kind {
            SanitizationErrorKind::Empty => Violation::invalid("Missing fields"),
            _ => Violation::invalid(err.message),
        }
    }
}

/// Why sanitization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SanitizationErrorKind {
    /// Empty, or only whitespace
    #[error("empty input")]
    Empty,
    /// Longer than the allowed maximum
    #[error("input too long")]
    TooLong,
    /// Contains control or non-printable characters
    #[error("contains control characters")]
    ContainsControlChars,
    /// Does not have the expected shape
    #[error("malformed input")]
    MalformedInput,
}

/// Promotes tainted values to verified ones.
///
/// Implementations validate first and only then call
/// `Verified::new_unchecked`; errors must not leak the rejected input.
pub trait Sanitizer<T> {
    /// The verified type produced.
    type Output;

    /// Validates `input`.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` if the input fails validation.
    fn sanitize(&self, input: Tainted<T>) -> Result<Verified<Self::Output>, SanitizationError>;
}

/// Free text: trimmed, non-empty, bounded, free of control characters.
///
/// Multi-line text additionally allows `\n`, `\r` and `\t`.
///
/// ```
/// use hostel_access::{Sanitizer, Tainted, TextSanitizer};
///
/// let sanitizer = TextSanitizer::single_line(256);
/// let verified = sanitizer.sanitize(Tainted::new("  hello world  ".to_string())).unwrap();
/// assert_eq!(verified.as_ref(), "hello world");
///
/// assert!(sanitizer.sanitize(Tainted::new("   ".to_string())).is_err());
/// assert!(sanitizer.sanitize(Tainted::new("hello\nworld".to_string())).is_err());
///
/// let multi = TextSanitizer::multi_line(256);
/// assert!(multi.sanitize(Tainted::new("hello\nworld".to_string())).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextSanitizer {
    max_len: usize,
    multi_line: bool,
}

impl TextSanitizer {
    /// Single-line text of at most `max_len` bytes (at least 1).
    pub fn single_line(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            multi_line: false,
        }
    }

    /// Multi-line text of at most `max_len` bytes (at least 1).
    pub fn multi_line(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            multi_line: true,
        }
    }

    fn is_forbidden(&self, c: char) -> bool {
        if self.multi_line && matches!(c, '\n' | '\r' | '\t') {
            return false;
        }
        c.is_control()
    }
}

impl Sanitizer<String> for TextSanitizer {
    type Output = String;

    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "input is empty or contains only whitespace",
            ));
        }
        if trimmed.chars().any(|c| self.is_forbidden(c)) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::ContainsControlChars,
                "input contains control or non-printable characters",
            ));
        }
        if trimmed.len() > self.max_len {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("input exceeds maximum length of {}", self.max_len),
            ));
        }

        Ok(Verified::new_unchecked(trimmed.to_string()))
    }
}

/// Email addresses: trimmed, lowercased, one `@`, a dotted domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailSanitizer;

const MAX_EMAIL_LEN: usize = 254;

impl Sanitizer<String> for EmailSanitizer {
    type Output = String;

    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let text = TextSanitizer::single_line(MAX_EMAIL_LEN).sanitize(input)?;
        let email = text.into_inner().to_lowercase();

        let malformed =
            || SanitizationError::new(SanitizationErrorKind::MalformedInput, "Invalid email");
        let (local, domain) = email.split_once('@').ok_or_else(malformed)?;
        let domain_ok = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || domain.contains('@') || !domain_ok || email.contains(' ') {
            return Err(malformed());
        }

        Ok(Verified::new_unchecked(email))
    }
}

/// Passwords: non-empty and bounded. Never trimmed or normalised.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordSanitizer;

const MAX_PASSWORD_LEN: usize = 128;

impl Sanitizer<String> for PasswordSanitizer {
    type Output = String;

    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        if raw.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "password is empty",
            ));
        }
        if raw.len() > MAX_PASSWORD_LEN {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("password exceeds maximum length of {MAX_PASSWORD_LEN}"),
            ));
        }
        Ok(Verified::new_unchecked(raw))
    }
}

/// Deserializes a tainted JSON body into the schema `B`.
///
/// Schemas use `deny_unknown_fields`, so stray keys are rejected here rather
/// than silently dropped.
pub struct JsonBody<B> {
    _schema: PhantomData<fn() -> B>,
}

impl<B> JsonBody<B> {
    /// Creates a body parser for schema `B`.
    pub fn new() -> Self {
        Self {
            _schema: PhantomData,
        }
    }
}

impl<B> Default for JsonBody<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: DeserializeOwned> Sanitizer<Value> for JsonBody<B> {
    type Output = B;

    fn sanitize(&self, input: Tainted<Value>) -> Result<Verified<B>, SanitizationError> {
        let value = input.into_inner();
        if !value.is_object() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "Request body must be a JSON object",
            ));
        }
        serde_json::from_value(value)
            .map(Verified::new_unchecked)
            .map_err(|e| {
                SanitizationError::new(
                    SanitizationErrorKind::MalformedInput,
                    format!("Invalid request body: {e}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use serde::Deserialize;
    use serde_json::json;

    fn text(s: &str) -> Tainted<String> {
        Tainted::new(s.to_string())
    }

    #[test]
    fn text_sanitizer_trims_and_bounds() {
        let s = TextSanitizer::single_line(5);
        assert_eq!(s.sanitize(text("  A-1 ")).unwrap().into_inner(), "A-1");
        assert_eq!(
            s.sanitize(text("A-1234")).unwrap_err().kind(),
            SanitizationErrorKind::TooLong
        );
        assert_eq!(
            s.sanitize(text("\t ")).unwrap_err().kind(),
            SanitizationErrorKind::Empty
        );
        assert_eq!(
            s.sanitize(text("a\u{0}b")).unwrap_err().kind(),
            SanitizationErrorKind::ContainsControlChars
        );
    }

    #[test]
    fn multi_line_still_rejects_other_controls() {
        let s = TextSanitizer::multi_line(100);
        assert!(s.sanitize(text("line one\nline two")).is_ok());
        assert!(s.sanitize(text("bell\u{7}")).is_err());
    }

    #[test]
    fn email_sanitizer_normalises() {
        let verified = EmailSanitizer.sanitize(text(" Admin@Hostel.COM ")).unwrap();
        assert_eq!(verified.as_ref(), "admin@hostel.com");
    }

    #[test]
    fn email_sanitizer_rejects_malformed() {
        for bad in ["nobody", "@hostel.com", "a@b", "a@@b.com", "a@b..com", "a b@c.com"] {
            assert!(EmailSanitizer.sanitize(text(bad)).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn password_sanitizer_keeps_whitespace() {
        let verified = PasswordSanitizer.sanitize(text(" pass word ")).unwrap();
        assert_eq!(verified.as_ref(), " pass word ");
        assert!(PasswordSanitizer.sanitize(text("")).is_err());
        assert!(PasswordSanitizer.sanitize(text(&"x".repeat(129))).is_err());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Probe {
        name: Option<String>,
    }

    #[test]
    fn json_body_rejects_unknown_fields() {
        let parser = JsonBody::<Probe>::new();
        let ok = parser.sanitize(Tainted::new(json!({"name": "x"}))).unwrap();
        assert_eq!(ok.into_inner(), Probe { name: Some("x".into()) });

        let err = parser
            .sanitize(Tainted::new(json!({"name": "x", "isAdmin": true})))
            .unwrap_err();
        assert_eq!(err.kind(), SanitizationErrorKind::MalformedInput);

        assert!(parser.sanitize(Tainted::new(json!([1, 2]))).is_err());
    }

    #[test]
    fn empty_input_maps_to_missing_fields() {
        let err = TextSanitizer::single_line(10).sanitize(text("")).unwrap_err();
        let violation = Violation::from(err);
        assert_eq!(violation.kind, ViolationKind::InvalidInput);
        assert_eq!(violation.message, "Missing fields");
    }
}
