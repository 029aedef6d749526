use crate::error::Violation;
use crate::logging::RequestLog;
use crate::request::Principal;
use crate::state::{Authed, Unauthed};

/// Execution context for one request.
///
/// `Ctx<S>` is generic over its authentication state:
/// - `Ctx<Unauthed>`: request id only
/// - `Ctx<Authed>`: request id and a resolved [`Principal`]
///
/// ```text
/// Ctx<Unauthed> --authenticate--> Ctx<Authed>
/// ```
///
/// Service operations that read or write scoped records take `&Ctx<Authed>`,
/// so the acting principal is always an explicit argument.
///
/// # Examples
///
/// ```
/// use hostel_access::{Authenticated, PolicyGate, Principal, RequestMeta, UserId};
///
/// let meta = RequestMeta::for_principal(
///     "req-123",
///     Principal::admin(UserId::new(), "admin@hostel.com"),
/// );
///
/// let ctx = PolicyGate::new(meta)
///     .require(Authenticated)
///     .build()
///     .expect("principal present");
///
/// assert!(ctx.principal().is_admin());
/// ```
#[derive(Debug, Clone)]
pub struct Ctx<S = Authed> {
    request_id: String,
    state: S,
}

impl<S> Ctx<S> {
    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl Ctx<Unauthed> {
    /// Creates an unauthenticated context.
    pub fn new_unauthed(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            state: Unauthed::new(),
        }
    }

    /// Moves to `Ctx<Authed>` if a principal was resolved.
    ///
    /// # Errors
    ///
    /// Returns an `Unauthenticated` violation if `principal` is `None`.
    pub fn authenticate(self, principal: Option<Principal>) -> Result<Ctx<Authed>, Violation> {
        match principal {
            Some(p) => Ok(Ctx {
                request_id: self.request_id,
                state: Authed::new(p),
            }),
            None => Err(Violation::unauthenticated()),
        }
    }

    /// Returns a request-scoped logger.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, None)
    }
}

impl Ctx<Authed> {
    /// Returns the acting principal.
    pub fn principal(&self) -> &Principal {
        self.state.principal()
    }

    /// Returns a request-scoped logger stamped with the principal id.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, Some(self.principal().id))
    }
}
