use std::fmt;

use crate::model::{Role, UserId};
use crate::request::Principal;

/// Kind of audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// Login, registration or token resolution
    Authentication,
    /// A guard or scope decision
    Authorization,
    /// A record was created or changed
    StateChange,
    /// Account or warden administration
    AdminAction,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuditEventKind::Authentication => "authentication",
            AuditEventKind::Authorization => "authorization",
            AuditEventKind::StateChange => "state_change",
            AuditEventKind::AdminAction => "admin_action",
        })
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Operation succeeded
    Success,
    /// Operation was denied by a guard
    Denied,
    /// Operation failed
    Error,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Denied => "denied",
            AuditOutcome::Error => "error",
        })
    }
}

/// One audited action.
///
/// Holds identifiers and short reasons only. Request bodies, passwords and
/// tokens never enter an event.
///
/// ```
/// use hostel_access::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new("req-1", AuditEventKind::StateChange, AuditOutcome::Success)
///     .with_action("create_hostel")
///     .with_resource_id("hostel-42");
///
/// assert_eq!(event.action(), Some("create_hostel"));
/// assert!(event.principal().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    principal: Option<UserId>,
    role: Option<Role>,
    kind: AuditEventKind,
    outcome: AuditOutcome,
    action: Option<&'static str>,
    resource_id: Option<String>,
    reason: Option<String>,
}

impl AuditEvent {
    /// Creates an event with the required fields.
    pub fn new(request_id: impl Into<String>, kind: AuditEventKind, outcome: AuditOutcome) -> Self {
        Self {
            request_id: request_id.into(),
            principal: None,
            role: None,
            kind,
            outcome,
            action: None,
            resource_id: None,
            reason: None,
        }
    }

    /// Attributes the event to `principal`.
    pub fn with_principal(mut self, principal: &Principal) -> Self {
        self.principal = Some(principal.id);
        self.role = Some(principal.role);
        self
    }

    /// Names the operation, e.g. `"allocate_room"`.
    pub fn with_action(mut self, action: &'static str) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets the affected record's id.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Sets a short reason, usually a violation message.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the acting principal's id, if any.
    pub fn principal(&self) -> Option<UserId> {
        self.principal
    }

    /// Returns the acting principal's role, if any.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the action, if set.
    pub fn action(&self) -> Option<&'static str> {
        self.action
    }

    /// Returns the resource id, if set.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Returns the reason, if set.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[kind={}, outcome={}, request_id={}",
            self.kind, self.outcome, self.request_id
        )?;
        match (self.principal, self.role) {
            (Some(id), Some(role)) => write!(f, ", principal={id} ({role})")?,
            _ => write!(f, ", principal=<none>")?,
        }
        if let Some(action) = self.action {
            write!(f, ", action={action}")?;
        }
        if let Some(resource_id) = &self.resource_id {
            write!(f, ", resource_id={resource_id}")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, ", reason={reason}")?;
        }
        write!(f, "]")
    }
}
