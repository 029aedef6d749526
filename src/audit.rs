//! Audit records for mutations and denials.
//!
//! - `AuditEvent`: structured event carrying identifiers only, never bodies
//!   or credentials
//! - `AuditTrail`: bounded in-memory recorder that also emits each event on
//!   the `hostel_audit` tracing target

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;
