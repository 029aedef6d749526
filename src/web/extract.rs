//! Extraction boundary traits for web integration.
//!
//! These traits map framework-specific request types onto hostel-access
//! types. They never authorize anything.

use chrono::Utc;

use crate::request::{Principal, RequestMeta};
use crate::resolver::PrincipalResolver;
use crate::service::HostelService;
use crate::store::Store;
use crate::token::TokenIssuer;

use super::TaintedInputs;

/// Turns an `Authorization` header value into a principal.
///
/// Returns `None` for a missing, malformed, expired or foreign credential,
/// and for a credential whose user no longer exists. A request with no
/// principal is anonymous; whether that is acceptable is decided later by
/// [`PolicyGate`](crate::PolicyGate).
pub trait ResolvePrincipal {
    /// Resolves the raw header value, if any.
    fn resolve_principal(&self, authorization: Option<&str>) -> Option<Principal>;
}

impl<S: Store> ResolvePrincipal for HostelService<S> {
    fn resolve_principal(&self, authorization: Option<&str>) -> Option<Principal> {
        HostelService::resolve_principal(self, authorization)
    }
}

/// A signing key paired with a store, for callers that skip the service.
impl<S: Store + ?Sized> ResolvePrincipal for (&TokenIssuer, &S) {
    fn resolve_principal(&self, authorization: Option<&str>) -> Option<Principal> {
        PrincipalResolver::new(self.0, self.1).resolve(authorization, Utc::now())
    }
}

/// Extracts request metadata from a framework-specific request.
///
/// Implementations supply the request ID and hand the credential to the
/// resolver. They do not grant roles or check policies; that is
/// [`PolicyGate`](crate::PolicyGate)'s job.
///
/// # Examples
///
/// ```
/// use hostel_access::web::{ExtractMetadata, ResolvePrincipal};
/// use hostel_access::{Principal, RequestMeta};
///
/// struct MyFrameworkRequest {
///     id: String,
///     bearer: Option<String>,
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn extract_metadata(&self, resolver: &dyn ResolvePrincipal) -> RequestMeta {
///         RequestMeta {
///             request_id: self.id.clone(),
///             principal: resolver.resolve_principal(self.bearer.as_deref()),
///         }
///     }
/// }
///
/// struct Nobody;
/// impl ResolvePrincipal for Nobody {
///     fn resolve_principal(&self, _: Option<&str>) -> Option<Principal> {
///         None
///     }
/// }
///
/// let req = MyFrameworkRequest { id: "req-1".into(), bearer: Some("Bearer x".into()) };
/// assert!(req.extract_metadata(&Nobody).principal.is_none());
/// ```
pub trait ExtractMetadata {
    /// Extracts request metadata for policy validation.
    fn extract_metadata(&self, resolver: &dyn ResolvePrincipal) -> RequestMeta;
}

/// Extracts tainted inputs from a framework-specific request.
///
/// Every value that crosses the HTTP boundary is wrapped in
/// [`Tainted`](crate::Tainted) and stays untrusted until a command
/// constructor in [`input`](crate::input) validates it.
pub trait ExtractTaintedInputs {
    /// Extracts all untrusted inputs from the request.
    fn extract_tainted_inputs(&self) -> TaintedInputs;
}
