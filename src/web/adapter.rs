//! Request adapter for mapping HTTP requests to hostel-access types.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::request::RequestMeta;
use crate::Tainted;

use super::{ExtractMetadata, ExtractTaintedInputs, ResolvePrincipal};

/// HTTP methods the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// OPTIONS (CORS preflight)
    Options,
}

impl Method {
    /// Returns the canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            other => Err(format!("unsupported method '{other}'")),
        }
    }
}

/// Framework-agnostic view of one HTTP request.
///
/// An HTTP server converts its own request type into a `RequestAdapter`
/// (typically via `From<FrameworkRequest>`) and hands it to
/// [`Router::handle`](super::Router::handle). Nothing in here is trusted:
/// headers, query parameters and the body all come out as [`Tainted`].
///
/// Header names are case-insensitive and stored lowercased. A query string
/// in the path is split off into query parameters.
///
/// # Examples
///
/// ```
/// use hostel_access::web::{ExtractTaintedInputs, Method, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-12345", Method::Get, "/rooms?hostelId=abc");
/// adapter.add_header("Authorization", "Bearer token");
///
/// assert_eq!(adapter.path(), "/rooms");
/// assert_eq!(adapter.header("authorization"), Some("Bearer token"));
///
/// let inputs = adapter.extract_tainted_inputs();
/// assert!(inputs.query_params().contains_key("hostelId"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    method: Method,
    path: String,
    query_params: BTreeMap<String, String>,
    headers: HashMap<String, String>,
    body: Option<Value>,
}

impl RequestAdapter {
    /// Creates an adapter for `method` on `path`.
    pub fn new(request_id: impl Into<String>, method: Method, path: impl AsRef<str>) -> Self {
        let (path, query) = match path.as_ref().split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path.as_ref(), None),
        };

        let mut adapter = Self {
            request_id: request_id.into(),
            method,
            path: path.to_string(),
            query_params: BTreeMap::new(),
            headers: HashMap::new(),
            body: None,
        };
        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            adapter.add_query_param(key, value);
        }
        adapter
    }

    /// Adds a query parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(key.into(), value.into());
    }

    /// Adds a header; the name is lowercased.
    pub fn add_header(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Sets the parsed JSON body.
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the path without its query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl ExtractMetadata for RequestAdapter {
    fn extract_metadata(&self, resolver: &dyn ResolvePrincipal) -> RequestMeta {
        RequestMeta {
            request_id: self.request_id.clone(),
            principal: resolver.resolve_principal(self.header("authorization")),
        }
    }
}

impl ExtractTaintedInputs for RequestAdapter {
    fn extract_tainted_inputs(&self) -> TaintedInputs {
        TaintedInputs {
            query_params: self
                .query_params
                .iter()
                .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
                .collect(),
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
                .collect(),
            body: self.body.clone().map(Tainted::new),
        }
    }
}

/// Untrusted inputs of one request.
///
/// Read-only; values must pass a [`Sanitizer`](crate::Sanitizer) or a
/// command constructor in [`crate::input`] before use.
#[derive(Debug, Clone)]
pub struct TaintedInputs {
    query_params: BTreeMap<String, Tainted<String>>,
    headers: HashMap<String, Tainted<String>>,
    body: Option<Tainted<Value>>,
}

impl TaintedInputs {
    /// Returns the tainted query parameters.
    pub fn query_params(&self) -> &BTreeMap<String, Tainted<String>> {
        &self.query_params
    }

    /// Returns the tainted headers, keyed by lowercased name.
    pub fn headers(&self) -> &HashMap<String, Tainted<String>> {
        &self.headers
    }

    /// Takes the body, or an empty object when none was sent.
    ///
    /// An empty object makes a missing body fail field validation with the
    /// usual "missing fields" message.
    pub fn take_body(&mut self) -> Tainted<Value> {
        self.body
            .take()
            .unwrap_or_else(|| Tainted::new(Value::Object(Default::default())))
    }

    /// Returns every query parameter as plain text for a schema that
    /// validates them itself.
    pub(crate) fn query_for_validation(&self) -> BTreeMap<String, String> {
        self.query_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into_inner()))
            .collect()
    }
}
