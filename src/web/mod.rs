//! Web framework integration surface.
//!
//! This module is the boundary between an HTTP framework and the hostel
//! service. It handles:
//! - Mapping HTTP requests to domain types ([`RequestMeta`](crate::RequestMeta))
//! - Introducing taint at the boundary (untrusted inputs → `Tainted<T>`)
//! - Resolving bearer tokens into principals
//! - Routing to [`HostelService`](crate::HostelService) operations and
//!   mapping their errors onto status codes
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: nothing here names axum, actix or hyper.
//!    A server converts its request into a [`RequestAdapter`] and a
//!    [`Response`] back into its own type.
//!
//! 2. **Taint at Boundary**: headers, query parameters, path segments and
//!    bodies are wrapped in `Tainted<T>` until a command in
//!    [`input`](crate::input) validates them.
//!
//! 3. **Coarse checks here, record checks in the service**: the router only
//!    runs route-level [`PolicyGate`](crate::PolicyGate) requirements.
//!    Ownership and hostel affiliation are decided by
//!    [`guard`](crate::guard) and [`scope`](crate::scope).
//!
//! # Example Flow
//!
//! ```
//! use std::sync::Arc;
//! use hostel_access::{Config, HostelService, MemoryStore, Router};
//! use hostel_access::web::{Method, RequestAdapter};
//! use serde_json::json;
//!
//! let config = Config::with_secret("web-module-secret-01")
//!     .unwrap()
//!     .seed_demo_users(true)
//!     .password_iterations(1);
//! let router = Router::new(Arc::new(HostelService::new(Arc::new(MemoryStore::new()), &config)));
//!
//! // 1. Public route: seed and log in
//! router.handle(&RequestAdapter::new("req-1", Method::Post, "/auth/seed-demo-users"));
//! let mut login = RequestAdapter::new("req-2", Method::Post, "/auth/login");
//! login.set_body(json!({ "email": "admin@hostel.com", "password": "password123" }));
//! let token = router.handle(&login).into_body()["token"].as_str().unwrap().to_string();
//!
//! // 2. Protected route: the bearer token resolves to the admin
//! let mut create = RequestAdapter::new("req-3", Method::Post, "/hostels");
//! create.add_header("Authorization", format!("Bearer {token}"));
//! create.set_body(json!({ "name": "Hostel A", "capacity": 100 }));
//! assert_eq!(router.handle(&create).status(), 200);
//! ```

mod adapter;
mod extract;
mod middleware;
mod response;
mod router;

pub use adapter::{Method, RequestAdapter, TaintedInputs};
pub use extract::{ExtractMetadata, ExtractTaintedInputs, ResolvePrincipal};
pub use middleware::{
    extract_authed, extract_unauthed, AuthenticatedExtraction, UnauthenticatedExtraction,
};
pub use response::Response;
pub use router::Router;
