//! Framework-agnostic HTTP response.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Error;
use crate::error::Violation;

/// Headers attached to every response so browser clients on any origin
/// can call the API.
pub(crate) const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, PATCH"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

/// A JSON response ready to hand back to the HTTP framework.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Value,
}

impl Response {
    /// Creates a response with the CORS and content-type headers set.
    pub fn new(status: u16, body: Value) -> Self {
        let mut headers: Vec<(String, String)> = CORS_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        headers.push(("Content-Type".into(), "application/json".into()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// A 200 response carrying `body`.
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// A 200 response with `{ message }` merged into `payload`'s fields.
    pub(crate) fn message(message: &str, payload: impl Serialize) -> Result<Self, Error> {
        let mut body = serde_json::to_value(payload).map_err(|e| Error::Server(e.to_string()))?;
        if let Value::Object(map) = &mut body {
            map.insert("message".into(), Value::String(message.into()));
        }
        Ok(Self::ok(body))
    }

    /// The error body for `err`.
    ///
    /// Violations carry their message as `error`; server failures report
    /// `"Server error"` with the cause under `details`.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Violation(v) => Self::from_violation(v),
            Error::Server(details) => Self::new(
                500,
                json!({ "error": "Server error", "details": details }),
            ),
        }
    }

    /// The error body for a policy violation.
    pub fn from_violation(violation: &Violation) -> Self {
        Self::new(violation.kind.status(), json!({ "error": violation.message }))
    }

    /// Returns the status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns all headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes the response, returning the JSON body.
    pub fn into_body(self) -> Value {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;

    #[test]
    fn every_response_carries_cors_headers() {
        let response = Response::ok(json!({}));
        assert_eq!(response.header("access-control-allow-origin"), Some("*"));
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn message_is_merged_into_payload() {
        let response = Response::message("Room created", json!({ "room": { "number": "A-1" } })).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.body()["message"], "Room created");
        assert_eq!(response.body()["room"]["number"], "A-1");
    }

    #[test]
    fn errors_map_to_status_and_body() {
        let full = Error::from(Violation::new(ViolationKind::CapacityExceeded, "Room is full"));
        let response = Response::from_error(&full);
        assert_eq!(response.status(), 400);
        assert_eq!(response.body(), &json!({ "error": "Room is full" }));

        let response = Response::from_error(&Error::Server("disk on fire".into()));
        assert_eq!(response.status(), 500);
        assert_eq!(response.body()["error"], "Server error");
        assert_eq!(response.body()["details"], "disk on fire");
    }
}
