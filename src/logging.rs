use crate::request::RequestContext;

/// Structured diagnostic logger bound to a [`RequestContext`].
///
/// Every record carries the context's `user`, `api_url` and `request_id`
/// alongside the caller-supplied `action` and `message`. Logging never
/// influences control flow: with no subscriber installed these calls are
/// no-ops.
///
/// Obtain one with [`RequestContext::log`]. The lifetime ties it to the
/// context it reads from.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticLog<'a> {
    ctx: &'a RequestContext,
}

impl<'a> DiagnosticLog<'a> {
    pub(crate) fn new(ctx: &'a RequestContext) -> Self {
        Self { ctx }
    }

    /// Logs a debug-level record.
    pub fn debug(&self, action: &str, message: &str) {
        tracing::debug!(
            user = self.user(),
            action = action,
            message = message,
            api_url = self.api_url(),
            request_id = self.request_id()
        );
    }

    /// Logs a debug-level record that also reports an upstream HTTP status.
    pub fn debug_with_status(&self, action: &str, message: &str, status: u16) {
        tracing::debug!(
            user = self.user(),
            action = action,
            message = message,
            status = status,
            api_url = self.api_url(),
            request_id = self.request_id()
        );
    }

    /// Logs an error-level record.
    pub fn error(&self, action: &str, message: &str) {
        tracing::error!(
            user = self.user(),
            action = action,
            message = message,
            api_url = self.api_url(),
            request_id = self.request_id()
        );
    }

    fn user(&self) -> &str {
        self.ctx.user.as_deref().unwrap_or("")
    }

    fn api_url(&self) -> &str {
        self.ctx.api_url.as_deref().unwrap_or("")
    }

    fn request_id(&self) -> &str {
        self.ctx.request_id.as_deref().unwrap_or("")
    }
}
