use crate::model::Role;

/// A policy requirement that must be satisfied.
///
/// Requirements are evaluated in order during
/// [`PolicyGate::build`](crate::PolicyGate::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyReq {
    /// Requires a resolved principal
    Authenticated,
    /// Requires the principal to act under one of the listed roles
    HasRole(&'static [Role]),
}

/// Policy requiring a resolved principal.
pub struct Authenticated;

/// Policy requiring one of a fixed set of roles.
///
/// Coarse route-level check; per-record decisions live in
/// [`guard`](crate::guard) and [`scope`](crate::scope).
pub struct HasRole {
    roles: &'static [Role],
}

impl HasRole {
    /// Admins only.
    pub const ADMIN: HasRole = HasRole::any_of(&[Role::Admin]);
    /// Admins and wardens.
    pub const STAFF: HasRole = HasRole::any_of(&[Role::Admin, Role::Warden]);
    /// Residents only.
    pub const RESIDENT: HasRole = HasRole::any_of(&[Role::Resident]);

    /// Accepts any of `roles`.
    pub const fn any_of(roles: &'static [Role]) -> Self {
        Self { roles }
    }
}

impl From<Authenticated> for PolicyReq {
    fn from(_: Authenticated) -> Self {
        PolicyReq::Authenticated
    }
}

impl From<HasRole> for PolicyReq {
    fn from(req: HasRole) -> Self {
        PolicyReq::HasRole(req.roles)
    }
}
