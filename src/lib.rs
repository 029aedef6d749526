//! Role-based access control for a hostel management backend.
//!
//! Three roles share one API: admins see and change everything, wardens are
//! confined to the one hostel they keep, and residents see only their own
//! records. This crate enforces that split through:
//! - **Principal resolution**: a signed bearer token plus the stored user
//!   record become a [`Principal`]
//! - **Scope filters**: pure functions in [`scope`] decide which records a
//!   listing may return
//! - **Mutation guards**: pure checks in [`guard`] run before every write,
//!   authorization always ahead of capacity
//! - **Taint tracking**: request data stays [`Tainted`] until a command in
//!   [`input`] validates it
//!
//! # Core Types
//!
//! - [`Secret<T>`]: Wrapper that redacts sensitive values in logs/output
//! - [`Tainted<T>`]: Wrapper for untrusted data requiring sanitization
//! - [`Ctx`]: Request context; `Ctx<Authed>` always carries a principal
//! - [`PolicyGate`]: Builder for route-level checks producing a `Ctx<Authed>`
//! - [`HostelService`]: The operations, one per route
//! - [`Router`]: Framework-agnostic route table over the service
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use hostel_access::input::NewHostel;
//! use hostel_access::{Authenticated, Config, HostelService, MemoryStore, PolicyGate, Principal, RequestMeta, Secret, UserId};
//!
//! // Secrets are automatically redacted
//! let api_key = Secret::new("super-secret-key".to_string());
//! assert_eq!(format!("{api_key:?}"), "[REDACTED]");
//!
//! let config = Config::with_secret("crate-doc-secret-0123").unwrap();
//! let service = HostelService::new(Arc::new(MemoryStore::new()), &config);
//!
//! // A resident may not create hostels
//! let meta = RequestMeta::for_principal(
//!     "req-123",
//!     Principal::resident(UserId::new(), "student@hostel.com", None),
//! );
//! let ctx = PolicyGate::new(meta).require(Authenticated).build().unwrap();
//! let err = service
//!     .create_hostel(&ctx, NewHostel::new("Hostel A", 100).unwrap())
//!     .unwrap_err();
//! assert_eq!(err.status(), 403);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod config;
pub mod guard;
pub mod input;
pub mod model;
pub mod password;
pub mod scope;
pub mod service;
pub mod store;
pub mod token;
pub mod web;

mod context;
mod error;
mod gate;
mod logging;
mod policy;
mod request;
mod resolver;
mod sanitizer;
mod secret;
mod state;
mod tainted;
mod verified;

pub use config::{Config, ConfigError};
pub use context::Ctx;
pub use error::{Error, Result, Violation, ViolationKind};
pub use gate::PolicyGate;
pub use logging::RequestLog;
pub use model::{
    AttendanceEntry, AttendanceId, AttendanceStatus, Complaint, ComplaintId, ComplaintStatus,
    Hostel, HostelId, Role, Room, RoomId, User, UserId,
};
pub use policy::{Authenticated, HasRole, PolicyReq};
pub use request::{Principal, RequestMeta};
pub use resolver::PrincipalResolver;
pub use sanitizer::{
    EmailSanitizer, JsonBody, PasswordSanitizer, SanitizationError, SanitizationErrorKind,
    Sanitizer, TextSanitizer,
};
pub use secret::Secret;
pub use service::HostelService;
pub use state::{Authed, Unauthed};
pub use store::{MemoryStore, Store, StoreError};
pub use tainted::Tainted;
pub use verified::Verified;
pub use web::Router;
