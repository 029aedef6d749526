use chrono::Utc;
use serde::Serialize;

use super::{require, HostelService};
use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome};
use crate::context::Ctx;
use crate::error::{Result, Violation, ViolationKind};
use crate::input::{Login, Register};
use crate::model::{Role, User};
use crate::state::{Authed, Unauthed};
use crate::store::{Store, StoreError};

const DEMO_PASSWORD: &str = "password123";

const DEMO_ACCOUNTS: [(&str, &str, Role); 3] = [
    ("Admin User", "admin@hostel.com", Role::Admin),
    ("Warden User", "warden@hostel.com", Role::Warden),
    ("Student User", "student@hostel.com", Role::Resident),
];

/// A freshly issued bearer token and the account it names.
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed bearer token
    pub token: String,
    /// The authenticated account
    pub user: User,
}

/// A seeded demo account, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoUser {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Role
    pub role: Role,
}

impl<S: Store> HostelService<S> {
    /// Creates a resident account and signs it in.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the body asked for a staff role, `Conflict` if the
    /// email is taken.
    pub fn register(&self, ctx: &Ctx<Unauthed>, cmd: Register) -> Result<Session> {
        if cmd.requested_role.is_some_and(|role| role != Role::Resident) {
            self.record_auth(ctx, "register", AuditOutcome::Denied, None);
            return Err(Violation::forbidden("Forbidden").into());
        }

        let hash = self.hasher.hash(cmd.password.expose_secret());
        let user = self
            .store
            .insert_user(User::new(cmd.name, cmd.email, hash, Role::Resident))?;
        let token = self.tokens.issue(&user, Utc::now())?;

        ctx.log().info(format_args!("registered user {}", user.id));
        self.record_auth(ctx, "register", AuditOutcome::Success, Some(&user));
        Ok(Session { token, user })
    }

    /// Verifies credentials and issues a token.
    ///
    /// Unknown emails and wrong passwords fail identically, after the same
    /// amount of hashing work.
    pub fn login(&self, ctx: &Ctx<Unauthed>, cmd: Login) -> Result<Session> {
        let password = cmd.password.expose_secret();
        let verified = match self.store.user_by_email(&cmd.email)? {
            Some(user) => self
                .hasher
                .verify(password, &user.password_hash)?
                .then_some(user),
            None => {
                self.hasher.verify_missing(password);
                None
            }
        };
        let user = match verified {
            Some(user) => user,
            None => {
                ctx.log().debug(format_args!("login rejected"));
                self.record_auth(ctx, "login", AuditOutcome::Denied, None);
                return Err(
                    Violation::new(ViolationKind::Unauthenticated, "Invalid credentials").into(),
                );
            }
        };

        let token = self.tokens.issue(&user, Utc::now())?;
        self.record_auth(ctx, "login", AuditOutcome::Success, Some(&user));
        Ok(Session { token, user })
    }

    /// Returns the caller's stored account.
    pub fn me(&self, ctx: &Ctx<Authed>) -> Result<User> {
        require(self.store.user(ctx.principal().id)?, "User")
    }

    /// Creates whichever demo accounts are missing.
    ///
    /// Returns the accounts created; an empty list means all three already
    /// existed.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless seeding is enabled in the configuration.
    pub fn seed_demo_users(&self, ctx: &Ctx<Unauthed>) -> Result<Vec<DemoUser>> {
        if !self.seed_enabled {
            self.record_auth(ctx, "seed_demo_users", AuditOutcome::Denied, None);
            return Err(Violation::forbidden("Demo seeding is disabled").into());
        }

        let mut missing = Vec::new();
        for (name, email, role) in DEMO_ACCOUNTS {
            if self.store.user_by_email(email)?.is_none() {
                missing.push((name, email, role));
            }
        }
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let hash = self.hasher.hash(DEMO_PASSWORD);
        let mut created = Vec::with_capacity(missing.len());
        for (name, email, role) in missing {
            // A concurrent seed may have created it since the check above.
            let user = match self
                .store
                .insert_user(User::new(name.into(), email.into(), hash.clone(), role))
            {
                Ok(user) => user,
                Err(StoreError::DuplicateEmail(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            created.push(DemoUser {
                name: user.name,
                email: user.email,
                role: user.role,
            });
        }

        if created.is_empty() {
            return Ok(created);
        }

        ctx.log()
            .info(format_args!("seeded {} demo users", created.len()));
        self.audit.record(
            AuditEvent::new(ctx.request_id(), AuditEventKind::AdminAction, AuditOutcome::Success)
                .with_action("seed_demo_users"),
        );
        Ok(created)
    }

    fn record_auth(
        &self,
        ctx: &Ctx<Unauthed>,
        action: &'static str,
        outcome: AuditOutcome,
        user: Option<&User>,
    ) {
        let mut event = AuditEvent::new(ctx.request_id(), AuditEventKind::Authentication, outcome)
            .with_action(action);
        if let Some(user) = user {
            event = event.with_resource_id(user.id.to_string());
        }
        self.audit.record(event);
    }
}
