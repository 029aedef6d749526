use crate::model::{HostelId, Role, UserId};

/// Metadata about an incoming request.
///
/// Contains the request identifier and the principal resolved from the
/// request's credential, if any.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Resolved principal, if any
    pub principal: Option<Principal>,
}

impl RequestMeta {
    /// Metadata for a request that carried no usable credential.
    pub fn anonymous(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: None,
        }
    }

    /// Metadata for a request made by `principal`.
    pub fn for_principal(request_id: impl Into<String>, principal: Principal) -> Self {
        Self {
            request_id: request_id.into(),
            principal: Some(principal),
        }
    }
}

/// The authenticated actor behind a request.
///
/// Derived per request from a signed credential and the stored user record.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The user's identifier
    pub id: UserId,
    /// Login email
    pub email: String,
    /// Role the principal acts under
    pub role: Role,
    /// The one hostel a warden keeps or a resident lives in
    pub hostel: Option<HostelId>,
}

impl Principal {
    /// Creates an admin principal.
    pub fn admin(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::Admin,
            hostel: None,
        }
    }

    /// Creates a warden principal affiliated with `hostel`.
    pub fn warden(id: UserId, email: impl Into<String>, hostel: Option<HostelId>) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::Warden,
            hostel,
        }
    }

    /// Creates a resident principal living in `hostel`.
    pub fn resident(id: UserId, email: impl Into<String>, hostel: Option<HostelId>) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::Resident,
            hostel,
        }
    }

    /// Returns `true` for admins.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
