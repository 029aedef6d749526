use chrono::{DateTime, Utc};

use crate::model::Role;
use crate::request::Principal;
use crate::store::Store;
use crate::token::TokenIssuer;

/// Turns an `Authorization` header into a [`Principal`].
///
/// Resolution never fails loudly: an absent header, a malformed or expired
/// token, a bad signature or an unknown user all yield `None`, and the route's
/// [`PolicyGate`](crate::PolicyGate) turns that into `Unauthenticated`.
///
/// The stored records are authoritative for role and hostel affiliation, so
/// a demotion or reassignment applies to tokens that were issued earlier.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use hostel_access::{MemoryStore, PrincipalResolver};
/// use hostel_access::token::TokenIssuer;
///
/// let store = MemoryStore::new();
/// let tokens = TokenIssuer::new(b"0123456789abcdef", Duration::hours(1));
/// let resolver = PrincipalResolver::new(&tokens, &store);
///
/// assert!(resolver.resolve(None, Utc::now()).is_none());
/// assert!(resolver.resolve(Some("Bearer not.a.token"), Utc::now()).is_none());
/// ```
pub struct PrincipalResolver<'a, S: Store + ?Sized> {
    tokens: &'a TokenIssuer,
    store: &'a S,
}

impl<'a, S: Store + ?Sized> PrincipalResolver<'a, S> {
    /// Creates a resolver over `tokens` and `store`.
    pub fn new(tokens: &'a TokenIssuer, store: &'a S) -> Self {
        Self { tokens, store }
    }

    /// Resolves `header` (`Bearer <token>` or a bare token) at time `now`.
    pub fn resolve(&self, header: Option<&str>, now: DateTime<Utc>) -> Option<Principal> {
        let raw = header?.trim();
        let token = raw
            .strip_prefix("Bearer ")
            .or_else(|| raw.strip_prefix("bearer "))
            .unwrap_or(raw)
            .trim();
        if token.is_empty() {
            return None;
        }

        let claims = match self.tokens.verify(token, now) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(reason = %e, "token rejected");
                return None;
            }
        };

        let user = match self.store.user(claims.id) {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(user = %claims.id, "token subject no longer exists");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "principal lookup failed");
                return None;
            }
        };

        // A warden's hostel is the one that names them.
        let hostel = match user.role {
            Role::Warden => match self.store.hostel_wardened_by(user.id) {
                Ok(kept) => kept.map(|h| h.id),
                Err(e) => {
                    tracing::warn!(error = %e, "warden hostel lookup failed");
                    None
                }
            },
            _ => user.hostel_id,
        };

        Some(Principal {
            id: user.id,
            email: user.email,
            role: user.role,
            hostel,
        })
    }
}
