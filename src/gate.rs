use crate::{
    audit::{AuditEvent, AuditOutcome, AuditTrail},
    error::AccessError,
    executor::RequestExecutor,
    metadata::CertificateMetadata,
    policy::AccessDecisionEngine,
    request::{CallerIdentity, RequestContext},
    resolver::MetadataResolver,
    token::AuthToken,
};

/// Entry point for access-binding changes on a certificate.
///
/// Resolves the certificate's metadata, asks the [`AccessDecisionEngine`]
/// and turns the two signals into a single outcome:
///
/// - no usable metadata → [`AccessError::NotFound`]
/// - engine denies → [`AccessError::Forbidden`]
/// - otherwise the resolved metadata
///
/// Every outcome is recorded in the gate's [`AuditTrail`] and emitted as a
/// `tracing` event.
///
/// # Examples
///
/// ```
/// use certificate_access::{
///     AccessError, AuthToken, CallerIdentity, CertificateAccessGate, MetadataResolver,
///     RecordingExecutor, RequestContext, UpstreamResponse,
/// };
///
/// let executor = RecordingExecutor::new().with_response(
///     "metadata/sslcerts/web.example.com",
///     UpstreamResponse::ok(
///         r#"{"data":{"certificateName":"web.example.com","certificateId":7,"certOwnerNtid":"bob"}}"#,
///     ),
/// );
/// let gate = CertificateAccessGate::new(MetadataResolver::new(executor));
/// let ctx = RequestContext::new("alice", "/v2/sslcert/user");
/// let token = AuthToken::new("s.token");
///
/// let err = gate
///     .authorize(&ctx, &CallerIdentity::user("alice"), &token, "web.example.com")
///     .unwrap_err();
/// assert_eq!(err.http_status(), 403);
///
/// let owner = gate.authorize(&ctx, &CallerIdentity::user("Bob"), &token, "web.example.com");
/// assert!(owner.is_ok());
/// ```
#[derive(Debug)]
pub struct CertificateAccessGate<E> {
    resolver: MetadataResolver<E>,
    engine: AccessDecisionEngine,
    trail: AuditTrail,
}

impl<E: RequestExecutor> CertificateAccessGate<E> {
    /// Creates a gate around `resolver`.
    pub fn new(resolver: MetadataResolver<E>) -> Self {
        Self {
            resolver,
            engine: AccessDecisionEngine::new(),
            trail: AuditTrail::new(),
        }
    }

    /// Returns the audit trail of every decision made through this gate.
    pub fn audit_trail(&self) -> &AuditTrail {
        &self.trail
    }

    /// Decides whether `caller` may add or remove users, groups or roles on
    /// `certificate_name`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotFound`] if the certificate's metadata could not
    ///   be resolved
    /// - [`AccessError::Forbidden`] if the caller is not permitted
    pub fn authorize(
        &self,
        ctx: &RequestContext,
        caller: &CallerIdentity,
        token: &AuthToken,
        certificate_name: &str,
    ) -> Result<CertificateMetadata, AccessError> {
        let metadata = self
            .resolver
            .resolve_certificate_metadata(ctx, token, certificate_name);

        let outcome = match &metadata {
            None => AuditOutcome::NotFound,
            Some(meta) if self.engine.has_add_or_remove_permission(caller, Some(meta)) => {
                AuditOutcome::Granted
            }
            Some(_) => AuditOutcome::Denied,
        };
        self.audit(ctx, caller, certificate_name, outcome);

        match (outcome, metadata) {
            (AuditOutcome::Granted, Some(meta)) => Ok(meta),
            (AuditOutcome::Denied, _) => Err(AccessError::Forbidden {
                username: caller.username.clone(),
                certificate_name: certificate_name.to_string(),
            }),
            _ => Err(AccessError::NotFound {
                certificate_name: certificate_name.to_string(),
            }),
        }
    }

    fn audit(
        &self,
        ctx: &RequestContext,
        caller: &CallerIdentity,
        certificate_name: &str,
        outcome: AuditOutcome,
    ) {
        let mut event = AuditEvent::new(caller.username.as_str(), certificate_name, outcome)
            .with_admin(caller.is_admin);
        if let Some(request_id) = &ctx.request_id {
            event = event.with_request_id(request_id.as_str());
        }

        event.emit();
        self.trail.record(event);
    }
}
