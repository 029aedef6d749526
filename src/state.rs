//! Type-state markers for context progression.
//!
//! The marker decides at compile time whether a context carries a resolved
//! principal. `Authed` holds the principal itself, so an authenticated context
//! can never be missing one.

use crate::request::Principal;

/// Marker type for an unauthenticated context.
///
/// `Ctx<Unauthed>` has no principal. Only public operations (register, login,
/// health) accept it.
#[derive(Debug, Clone, Copy)]
pub struct Unauthed {
    _private: (),
}

impl Unauthed {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// Marker type for an authenticated context.
///
/// `Ctx<Authed>` is what every scoped service operation takes.
#[derive(Debug, Clone)]
pub struct Authed {
    principal: Principal,
}

impl Authed {
    pub(crate) fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub(crate) fn principal(&self) -> &Principal {
        &self.principal
    }
}
