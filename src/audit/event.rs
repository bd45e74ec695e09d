use std::fmt;

/// `tracing` target audit events are emitted under.
pub const AUDIT_TARGET: &str = "certificate_audit";

/// Result of an access-binding decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The caller may modify the certificate's bindings
    Granted,
    /// The caller is not permitted
    Denied,
    /// No usable metadata was found for the certificate
    NotFound,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Granted => write!(f, "granted"),
            AuditOutcome::Denied => write!(f, "denied"),
            AuditOutcome::NotFound => write!(f, "not_found"),
        }
    }
}

/// A single access-binding decision.
///
/// Holds identifiers only: who asked, about which certificate, and what was
/// decided.
///
/// # Example
///
/// ```
/// use certificate_access::audit::{AuditEvent, AuditOutcome};
///
/// let event = AuditEvent::new("alice", "web.example.com", AuditOutcome::Denied)
///     .with_request_id("req-123")
///     .with_admin(true);
///
/// assert_eq!(event.principal(), "alice");
/// assert_eq!(event.request_id(), Some("req-123"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: Option<String>,
    principal: String,
    admin: bool,
    action: String,
    certificate_name: String,
    outcome: AuditOutcome,
}

impl AuditEvent {
    /// Action recorded for access-binding changes.
    pub const MODIFY_ACCESS_BINDINGS: &'static str = "modify_access_bindings";

    /// Creates an event for `principal` acting on `certificate_name`.
    pub fn new(
        principal: impl Into<String>,
        certificate_name: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: None,
            principal: principal.into(),
            admin: false,
            action: Self::MODIFY_ACCESS_BINDINGS.to_string(),
            certificate_name: certificate_name.into(),
            outcome,
        }
    }

    /// Sets the correlation id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Records whether the principal acted as an admin.
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Overrides the recorded action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Returns the correlation id.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the acting principal.
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Returns whether the principal acted as an admin.
    pub fn admin(&self) -> bool {
        self.admin
    }

    /// Returns the recorded action.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the certificate the decision was about.
    pub fn certificate_name(&self) -> &str {
        &self.certificate_name
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Emits the event as a structured `tracing` record under
    /// [`AUDIT_TARGET`].
    pub fn emit(&self) {
        tracing::info!(
            target: AUDIT_TARGET,
            request_id = self.request_id().unwrap_or(""),
            principal = %self.principal,
            admin = self.admin,
            action = %self.action,
            certificate = %self.certificate_name,
            outcome = %self.outcome,
            "audit event"
        );
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[outcome={}, action={}, certificate={}, principal={}",
            self.outcome, self.action, self.certificate_name, self.principal
        )?;
        if self.admin {
            write!(f, " (admin)")?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, ", request_id={}", request_id)?;
        }
        write!(f, "]")
    }
}
