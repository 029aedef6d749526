use crate::{
    context::Ctx,
    error::Violation,
    policy::PolicyReq,
    request::RequestMeta,
    state::Authed,
};

/// The route-level policy gate.
///
/// `PolicyGate` turns request metadata into a `Ctx<Authed>` after checking
/// coarse requirements (a principal is present, it acts under an allowed
/// role). Record-level decisions are left to [`guard`](crate::guard) and
/// [`scope`](crate::scope).
///
/// # Examples
///
/// ```
/// use hostel_access::{Authenticated, HasRole, PolicyGate, Principal, RequestMeta, UserId, ViolationKind};
///
/// let meta = RequestMeta::for_principal(
///     "req-123",
///     Principal::resident(UserId::new(), "student@hostel.com", None),
/// );
///
/// let denied = PolicyGate::new(meta)
///     .require(Authenticated)
///     .require(HasRole::ADMIN)
///     .build()
///     .unwrap_err();
///
/// assert_eq!(denied.kind, ViolationKind::Forbidden);
/// ```
pub struct PolicyGate {
    meta: RequestMeta,
    requirements: Vec<PolicyReq>,
}

impl PolicyGate {
    /// Creates a new policy gate with the given request metadata.
    pub fn new(meta: RequestMeta) -> Self {
        Self {
            meta,
            requirements: Vec::new(),
        }
    }

    /// Adds a requirement, ignoring exact duplicates.
    pub fn require(mut self, policy: impl Into<PolicyReq>) -> Self {
        let req = policy.into();
        if !self.requirements.contains(&req) {
            self.requirements.push(req);
        }
        self
    }

    /// Validates every requirement and returns an authenticated context.
    ///
    /// A principal is always required, whether or not [`Authenticated`]
    /// was listed.
    ///
    /// # Errors
    ///
    /// Returns the first failing requirement's violation: `Unauthenticated`
    /// without a principal, `Forbidden` for a disallowed role.
    ///
    /// [`Authenticated`]: crate::Authenticated
    pub fn build(self) -> Result<Ctx<Authed>, Violation> {
        self.validate_all()?;
        Ctx::new_unauthed(self.meta.request_id).authenticate(self.meta.principal)
    }

    fn validate_all(&self) -> Result<(), Violation> {
        for req in &self.requirements {
            self.validate_one(req)?;
        }
        Ok(())
    }

    fn validate_one(&self, req: &PolicyReq) -> Result<(), Violation> {
        let principal = self
            .meta
            .principal
            .as_ref()
            .ok_or_else(Violation::unauthenticated)?;

        match req {
            PolicyReq::Authenticated => Ok(()),
            PolicyReq::HasRole(roles) if roles.contains(&principal.role) => Ok(()),
            PolicyReq::HasRole(_) => Err(Violation::forbidden("Forbidden")),
        }
    }
}
