use thiserror::Error;

use crate::password::PasswordError;
use crate::store::StoreError;
use crate::token::TokenError;

/// Result alias used by service operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by hostel service operations.
///
/// Policy failures (missing principal, insufficient scope, bad input, full
/// rooms) are [`Violation`]s and map onto 4xx statuses. Everything else is a
/// server failure whose reason is surfaced to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A policy violation occurred
    #[error("policy violation: {0}")]
    Violation(#[from] Violation),
    /// An unexpected failure in a collaborator (store, signer, hasher)
    #[error("server error: {0}")]
    Server(String),
}

impl Error {
    /// Returns the HTTP status code this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            Error::Violation(v) => v.kind.status(),
            Error::Server(_) => 500,
        }
    }

    /// Returns the error class name used in logs and audit records.
    pub fn class(&self) -> &'static str {
        match self {
            Error::Violation(v) => v.kind.class(),
            Error::Server(_) => "ServerError",
        }
    }

    /// Returns the violation if this error is a policy failure.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Error::Violation(v) => Some(v),
            Error::Server(_) => None,
        }
    }

    /// Returns the violation kind if this error is a policy failure.
    pub fn kind(&self) -> Option<ViolationKind> {
        self.violation().map(|v| v.kind)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => {
                Violation::new(ViolationKind::NotFound, format!("{entity} not found")).into()
            }
            StoreError::RoomFull { .. } => {
                Violation::new(ViolationKind::CapacityExceeded, "Room is full").into()
            }
            StoreError::DuplicateEmail(_) => {
                Violation::new(ViolationKind::Conflict, "User already exists").into()
            }
            StoreError::WardenRebind(_) => Violation::invalid(
                "Use /hostels/:id/assign-warden to change a warden's hostel",
            )
            .into(),
            StoreError::BackwardTransition { from, to } => Violation::new(
                ViolationKind::Conflict,
                format!("Cannot move complaint from {from} to {to}"),
            )
            .into(),
            StoreError::Backend(reason) => Error::Server(reason),
        }
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        Error::Server(err.to_string())
    }
}

impl From<PasswordError> for Error {
    fn from(err: PasswordError) -> Self {
        Error::Server(err.to_string())
    }
}

/// A policy violation with details about what failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No principal, or the principal could not be resolved.
    pub fn unauthenticated() -> Self {
        Self::new(ViolationKind::Unauthenticated, "Unauthorized")
    }

    /// The principal lacks rights for the requested operation.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Forbidden, message)
    }

    /// A referenced entity does not exist.
    pub fn not_found(entity: &str) -> Self {
        Self::new(ViolationKind::NotFound, format!("{entity} not found"))
    }

    /// Required fields are missing or malformed.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::InvalidInput, message)
    }
}

/// The kind of policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ViolationKind {
    /// Authentication is required but missing or invalid
    #[error("Unauthenticated")]
    Unauthenticated,
    /// Authenticated, but outside the principal's scope
    #[error("Forbidden")]
    Forbidden,
    /// A referenced entity is absent
    #[error("NotFound")]
    NotFound,
    /// Required fields are missing or malformed
    #[error("InvalidInput")]
    InvalidInput,
    /// The target room already holds as many occupants as its capacity
    #[error("CapacityExceeded")]
    CapacityExceeded,
    /// The request conflicts with existing state
    #[error("Conflict")]
    Conflict,
}

impl ViolationKind {
    /// Returns the HTTP status code for this kind.
    pub fn status(self) -> u16 {
        match self {
            ViolationKind::Unauthenticated => 401,
            ViolationKind::Forbidden => 403,
            ViolationKind::NotFound => 404,
            ViolationKind::InvalidInput | ViolationKind::CapacityExceeded => 400,
            ViolationKind::Conflict => 409,
        }
    }

    /// Returns the taxonomy name for this kind.
    pub fn class(self) -> &'static str {
        match self {
            ViolationKind::Unauthenticated => "Unauthenticated",
            ViolationKind::Forbidden => "Forbidden",
            ViolationKind::NotFound => "NotFound",
            ViolationKind::InvalidInput => "ValidationError",
            ViolationKind::CapacityExceeded => "CapacityExceeded",
            ViolationKind::Conflict => "Conflict",
        }
    }
}
