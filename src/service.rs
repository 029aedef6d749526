//! Hostel operations.
//!
//! [`HostelService`] exposes one method per route. Each takes the request's
//! context explicitly: `&Ctx<Unauthed>` for registration and login,
//! `&Ctx<Authed>` for everything else. Reads go through [`crate::scope`];
//! writes are decided by [`crate::guard`] on freshly fetched records, then
//! applied by the [`Store`].
//!
//! Every successful mutation and every guard denial is recorded in the
//! service's [`AuditTrail`].

mod attendance;
mod auth;
mod complaints;
mod dashboard;
mod hostels;
mod rooms;
mod users;

pub use auth::{DemoUser, Session};
pub use dashboard::{
    AdminStats, AttendanceTotals, ComplaintTotals, HostelTotals, ResidentStats, RoomTotals,
    UserTotals, WardenStats,
};

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::config::Config;
use crate::context::Ctx;
use crate::error::{Error, Result, Violation};
use crate::password::PasswordHasher;
use crate::request::Principal;
use crate::resolver::PrincipalResolver;
use crate::state::Authed;
use crate::store::Store;
use crate::token::TokenIssuer;

/// The hostel backend.
///
/// `Send + Sync` whenever the store is; share it across request threads with
/// `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hostel_access::{Config, HostelService, MemoryStore};
///
/// let config = Config::with_secret("0123456789abcdef").unwrap();
/// let service = HostelService::new(Arc::new(MemoryStore::new()), &config);
/// assert!(service.audit().is_empty());
/// ```
pub struct HostelService<S: Store> {
    store: Arc<S>,
    tokens: TokenIssuer,
    hasher: PasswordHasher,
    seed_enabled: bool,
    audit: AuditTrail,
}

impl<S: Store> HostelService<S> {
    /// Builds a service from validated configuration.
    pub fn new(store: Arc<S>, config: &Config) -> Self {
        let key = config.auth.token_secret.expose_secret().as_bytes();
        Self::with_parts(
            store,
            TokenIssuer::new(key, Duration::hours(config.auth.token_ttl_hours)),
            PasswordHasher::new(config.auth.password_iterations),
            config.seed.demo_users,
        )
    }

    /// Builds a service from its collaborators.
    pub fn with_parts(
        store: Arc<S>,
        tokens: TokenIssuer,
        hasher: PasswordHasher,
        seed_enabled: bool,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            seed_enabled,
            audit: AuditTrail::new(),
        }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the audit trail.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Resolves an `Authorization` header value against this service's
    /// signing key and store.
    pub fn resolve_principal(&self, header: Option<&str>) -> Option<Principal> {
        PrincipalResolver::new(&self.tokens, &*self.store).resolve(header, Utc::now())
    }

    /// Applies a guard decision, auditing a denial.
    fn enforce(
        &self,
        ctx: &Ctx<Authed>,
        action: &'static str,
        decision: std::result::Result<(), Violation>,
    ) -> Result<()> {
        decision.map_err(|violation| self.deny(ctx, action, violation))
    }

    fn deny(&self, ctx: &Ctx<Authed>, action: &'static str, violation: Violation) -> Error {
        ctx.log()
            .warn(format_args!("{action} denied: {}", violation.message));
        self.audit.record(
            AuditEvent::new(ctx.request_id(), AuditEventKind::Authorization, AuditOutcome::Denied)
                .with_principal(ctx.principal())
                .with_action(action)
                .with_reason(violation.message.clone()),
        );
        violation.into()
    }

    /// Records a successful mutation.
    fn record_change(
        &self,
        ctx: &Ctx<Authed>,
        kind: AuditEventKind,
        action: &'static str,
        resource_id: impl ToString,
    ) {
        ctx.log().info(format_args!("{action} ok"));
        self.audit.record(
            AuditEvent::new(ctx.request_id(), kind, AuditOutcome::Success)
                .with_principal(ctx.principal())
                .with_action(action)
                .with_resource_id(resource_id.to_string()),
        );
    }

    /// Records a failed store write.
    fn record_failure(&self, ctx: &Ctx<Authed>, action: &'static str, err: &Error) {
        let outcome = match err {
            Error::Violation(_) => AuditOutcome::Denied,
            Error::Server(_) => AuditOutcome::Error,
        };
        self.audit.record(
            AuditEvent::new(ctx.request_id(), AuditEventKind::StateChange, outcome)
                .with_principal(ctx.principal())
                .with_action(action)
                .with_reason(err.class()),
        );
    }
}

fn require<T>(found: Option<T>, entity: &str) -> Result<T> {
    found.ok_or_else(|| Violation::not_found(entity).into())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::{Hostel, HostelId, Role, Room, User};
    use crate::password::PasswordHash;
    use crate::request::RequestMeta;
    use crate::store::MemoryStore;
    use crate::PolicyGate;

    pub(crate) const KEY: &[u8] = b"service-test-key-0123";

    pub(crate) fn service() -> HostelService<MemoryStore> {
        HostelService::with_parts(
            Arc::new(MemoryStore::new()),
            TokenIssuer::new(KEY, Duration::hours(1)),
            PasswordHasher::new(1),
            true,
        )
    }

    pub(crate) fn ctx_for(service: &HostelService<MemoryStore>, user: &User) -> Ctx<Authed> {
        let principal = service
            .resolve_principal(Some(&service.tokens.issue(user, Utc::now()).unwrap()))
            .unwrap();
        PolicyGate::new(RequestMeta::for_principal("req-test", principal))
            .build()
            .unwrap()
    }

    pub(crate) fn add_user(
        service: &HostelService<MemoryStore>,
        email: &str,
        role: Role,
        hostel: Option<HostelId>,
    ) -> User {
        let mut user = User::new("Someone".into(), email.into(), PasswordHash::from_encoded("x"), role);
        user.hostel_id = hostel;
        service.store().insert_user(user).unwrap()
    }

    /// Admin, one hostel kept by a warden, one room, one resident placed in it.
    pub(crate) struct World {
        pub admin: User,
        pub warden: User,
        pub resident: User,
        pub hostel: Hostel,
        pub room: Room,
    }

    pub(crate) fn world(service: &HostelService<MemoryStore>) -> World {
        let store = service.store();
        let admin = add_user(service, "admin@hostel.com", Role::Admin, None);
        let hostel = store.insert_hostel(Hostel::new("Hostel A".into(), 100)).unwrap();
        let warden = add_user(service, "warden@hostel.com", Role::Warden, None);
        let hostel = store.assign_warden(hostel.id, warden.id).unwrap();
        let room = store.insert_room(Room::new(hostel.id, "A-1".into(), 2)).unwrap();
        let resident = add_user(service, "student@hostel.com", Role::Resident, None);
        let room = store.place_in_room(room.id, resident.id).unwrap();
        World {
            admin,
            warden: store.user(warden.id).unwrap().unwrap(),
            resident: store.user(resident.id).unwrap().unwrap(),
            hostel,
            room,
        }
    }
}
