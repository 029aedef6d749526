use std::fmt;

use crate::model::UserId;

/// A request-scoped logging handle.
///
/// Obtained from [`Ctx::log`](crate::Ctx::log) and bound to the context's
/// lifetime. Every event carries the request id and, once the request is
/// authenticated, the principal id.
///
/// [`Secret`](crate::Secret) values format as `[REDACTED]`, so they can be
/// passed through safely.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
    principal: Option<UserId>,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(request_id: &'a str, principal: Option<UserId>) -> Self {
        Self {
            request_id,
            principal,
        }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message.
    ///
    /// ```no_run
    /// # use hostel_access::RequestLog;
    /// # fn example(log: &RequestLog) {
    /// log.info(format_args!("hostel created: {}", "Hostel A"));
    /// # }
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::info!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::info!(request_id = %self.request_id, "{}", args),
        }
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::warn!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::warn!(request_id = %self.request_id, "{}", args),
        }
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::error!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::error!(request_id = %self.request_id, "{}", args),
        }
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::debug!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::debug!(request_id = %self.request_id, "{}", args),
        }
    }
}
