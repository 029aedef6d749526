//! Extractor functions that build a `Ctx` from an HTTP request.
//!
//! Public routes use [`extract_unauthed`]. Protected routes use
//! [`extract_authed`], which resolves the bearer token and runs the route's
//! [`PolicyGate`] requirements.
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Framework-specific code builds RequestAdapter
//!   ↓
//! extract_unauthed() or extract_authed(resolver, requirements)
//!   ↓
//! (Ctx<Unauthed/Authed>, TaintedInputs)
//!   ↓
//! input:: command constructors validate the tainted inputs
//!   ↓
//! HostelService operation applies guards and scopes
//! ```

use crate::context::Ctx;
use crate::error::Violation;
use crate::gate::PolicyGate;
use crate::policy::PolicyReq;
use crate::state::{Authed, Unauthed};

use super::{ExtractMetadata, ExtractTaintedInputs, RequestAdapter, ResolvePrincipal, TaintedInputs};

/// An unauthenticated context paired with the request's tainted inputs.
///
/// # Examples
///
/// ```
/// use hostel_access::web::{extract_unauthed, Method, RequestAdapter};
///
/// let adapter = RequestAdapter::new("req-001", Method::Post, "/auth/login");
/// let extraction = extract_unauthed(&adapter);
///
/// assert_eq!(extraction.context.request_id(), "req-001");
/// ```
#[derive(Debug)]
pub struct UnauthenticatedExtraction {
    /// The unauthenticated context (no principal)
    pub context: Ctx<Unauthed>,
    /// All untrusted inputs from the request
    pub inputs: TaintedInputs,
}

/// An authenticated context paired with the request's tainted inputs.
#[derive(Debug)]
pub struct AuthenticatedExtraction {
    /// The authenticated context (has principal)
    pub context: Ctx<Authed>,
    /// All untrusted inputs from the request
    pub inputs: TaintedInputs,
}

/// Extracts an unauthenticated context from a request adapter.
///
/// Any `Authorization` header is ignored; public routes do not look at it.
pub fn extract_unauthed(adapter: &RequestAdapter) -> UnauthenticatedExtraction {
    UnauthenticatedExtraction {
        context: Ctx::new_unauthed(adapter.request_id()),
        inputs: adapter.extract_tainted_inputs(),
    }
}

/// Extracts an authenticated context, checking `requirements` in order.
///
/// # Errors
///
/// `Unauthenticated` when the header resolves to no principal, `Forbidden`
/// when the principal's role fails a [`HasRole`](crate::HasRole)
/// requirement.
///
/// # Examples
///
/// ```
/// use hostel_access::web::{extract_authed, Method, RequestAdapter, ResolvePrincipal};
/// use hostel_access::{Authenticated, HasRole, Principal, PolicyReq, UserId, ViolationKind};
///
/// struct Fixed(Principal);
/// impl ResolvePrincipal for Fixed {
///     fn resolve_principal(&self, header: Option<&str>) -> Option<Principal> {
///         header.map(|_| self.0.clone())
///     }
/// }
///
/// let resolver = Fixed(Principal::resident(UserId::new(), "student@hostel.com", None));
/// let mut adapter = RequestAdapter::new("req-002", Method::Post, "/hostels");
///
/// let err = extract_authed(&adapter, &resolver, &[Authenticated.into()]).unwrap_err();
/// assert_eq!(err.kind, ViolationKind::Unauthenticated);
///
/// adapter.add_header("Authorization", "Bearer t");
/// let requirements: [PolicyReq; 2] = [Authenticated.into(), HasRole::ADMIN.into()];
/// let err = extract_authed(&adapter, &resolver, &requirements).unwrap_err();
/// assert_eq!(err.kind, ViolationKind::Forbidden);
/// ```
pub fn extract_authed(
    adapter: &RequestAdapter,
    resolver: &dyn ResolvePrincipal,
    requirements: &[PolicyReq],
) -> Result<AuthenticatedExtraction, Violation> {
    let meta = adapter.extract_metadata(resolver);
    let context = requirements
        .iter()
        .fold(PolicyGate::new(meta), |gate, req| gate.require(req.clone()))
        .build()?;

    Ok(AuthenticatedExtraction {
        context,
        inputs: adapter.extract_tainted_inputs(),
    })
}
