use serde_json::Value;

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::executor::{PathRequest, RequestExecutor, UpstreamResponse};
use crate::metadata::CertificateMetadata;
use crate::request::RequestContext;
use crate::token::AuthToken;

const ACTION_LOOKUP: &str = "Get Certificate Info";
const ACTION_LOOKUP_DONE: &str = "Get Certificate metadata Info";
const ACTION_FAILED: &str = "getCertificateMetaData";
const LOOKUP_DONE_MESSAGE: &str = "Getting metaDataInfo completed";

/// Fetches a certificate's record from the upstream backend and maps it into
/// [`CertificateMetadata`].
///
/// The resolver holds only its configuration and the injected executor; each
/// call works on its own arguments, so a shared resolver can serve
/// concurrent requests as long as `E` can.
///
/// # Examples
///
/// ```
/// use certificate_access::{
///     AuthToken, MetadataResolver, RecordingExecutor, RequestContext, UpstreamResponse,
/// };
///
/// let executor = RecordingExecutor::new().with_response(
///     "metadata/sslcerts/web.example.com",
///     UpstreamResponse::ok(
///         r#"{"data":{"certificateName":"web.example.com","certificateId":7,"certOwnerNtid":"alice"}}"#,
///     ),
/// );
/// let resolver = MetadataResolver::new(executor);
/// let ctx = RequestContext::new("alice", "/v2/sslcert/user");
///
/// let meta = resolver
///     .resolve_certificate_metadata(&ctx, &AuthToken::new("s.token"), "web.example.com")
///     .expect("record exists");
/// assert_eq!(meta.cert_owner_ntid.as_deref(), Some("alice"));
///
/// let missing = resolver.resolve_certificate_metadata(&ctx, &AuthToken::new("s.token"), "nope");
/// assert!(missing.is_none());
/// ```
#[derive(Debug)]
pub struct MetadataResolver<E> {
    executor: E,
    config: ResolverConfig,
}

impl<E: RequestExecutor> MetadataResolver<E> {
    /// Creates a resolver with the default endpoint and store prefix.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, ResolverConfig::default())
    }

    /// Creates a resolver with an explicit configuration.
    pub fn with_config(executor: E, config: ResolverConfig) -> Self {
        Self { executor, config }
    }

    /// Returns the injected executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Resolves `certificate_name`, returning `None` when no usable record
    /// could be obtained.
    ///
    /// Upstream errors, transport failures and malformed payloads all
    /// collapse to `None`; each is reported by exactly one error-level
    /// diagnostic. Use [`try_resolve`](Self::try_resolve) to see which one
    /// occurred.
    pub fn resolve_certificate_metadata(
        &self,
        ctx: &RequestContext,
        token: &AuthToken,
        certificate_name: &str,
    ) -> Option<CertificateMetadata> {
        self.try_resolve(ctx, token, certificate_name).ok()
    }

    /// Resolves `certificate_name`, reporting why resolution failed.
    ///
    /// Emits the same diagnostics as
    /// [`resolve_certificate_metadata`](Self::resolve_certificate_metadata).
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Transport`] if the executor could not complete
    /// - [`ResolveError::UpstreamStatus`] for any status other than `200`
    /// - [`ResolveError::InvalidJson`], [`ResolveError::MissingData`],
    ///   [`ResolveError::MissingField`] or [`ResolveError::InvalidField`]
    ///   if the payload could not be mapped
    pub fn try_resolve(
        &self,
        ctx: &RequestContext,
        token: &AuthToken,
        certificate_name: &str,
    ) -> Result<CertificateMetadata, ResolveError> {
        let log = ctx.log();
        let path = self.config.lookup_path(certificate_name);
        log.debug(ACTION_LOOKUP, &format!("Trying to get Info for [{}]", path));

        let response = match self.fetch(&path, token) {
            Ok(response) => response,
            Err(err) => {
                log.error(
                    ACTION_FAILED,
                    &format!("Error while trying to get certificate metadata: {}", err),
                );
                log.debug(ACTION_LOOKUP_DONE, LOOKUP_DONE_MESSAGE);
                return Err(err);
            }
        };

        let result = if response.is_ok() {
            parse_response(&response.body).inspect_err(|err| {
                log.error(
                    ACTION_FAILED,
                    &format!("Error while trying to get details about the certificate: {}", err),
                );
            })
        } else {
            log.error(ACTION_FAILED, "Error while trying to get certificate metadata");
            Err(ResolveError::UpstreamStatus {
                status: response.status,
            })
        };

        log.debug_with_status(
            ACTION_LOOKUP_DONE,
            LOOKUP_DONE_MESSAGE,
            response.status,
        );
        result
    }

    fn fetch(&self, path: &str, token: &AuthToken) -> Result<UpstreamResponse, ResolveError> {
        let body = serde_json::to_string(&PathRequest { path })?;
        Ok(self.executor.execute(&self.config.endpoint, &body, token)?)
    }
}

fn parse_response(body: &str) -> Result<CertificateMetadata, ResolveError> {
    let document: Value = serde_json::from_str(body)?;
    let data = document.get("data").ok_or(ResolveError::MissingData)?;
    CertificateMetadata::from_data(data)
}
