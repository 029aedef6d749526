use std::collections::VecDeque;

use parking_lot::Mutex;

use super::AuditEvent;

/// Default number of events kept in memory.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded in-memory audit recorder.
///
/// Shared across request threads. When full, the oldest event is dropped.
/// Every recorded event is also emitted on the `hostel_audit` tracing target,
/// so a subscriber can ship it elsewhere.
///
/// ```
/// use hostel_access::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new("req-1", AuditEventKind::AdminAction, AuditOutcome::Success));
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: usize,
}

impl AuditTrail {
    /// Creates a trail holding up to [`DEFAULT_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a trail holding up to `capacity` events (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Emits `event` through tracing and stores it.
    pub fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "hostel_audit",
            request_id = %event.request_id(),
            principal = ?event.principal(),
            role = ?event.role(),
            kind = %event.kind(),
            outcome = %event.outcome(),
            action = ?event.action(),
            resource_id = ?event.resource_id(),
            reason = ?event.reason(),
            "audit event"
        );

        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Returns a snapshot of the stored events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Returns the number of stored events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events are stored.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drops all stored events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
