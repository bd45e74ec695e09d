use thiserror::Error;

/// Reasons a certificate metadata lookup produced no usable record.
///
/// Callers of [`MetadataResolver::resolve_certificate_metadata`] never see
/// these: every variant collapses to `None` there. They surface only through
/// [`MetadataResolver::try_resolve`].
///
/// [`MetadataResolver::resolve_certificate_metadata`]: crate::MetadataResolver::resolve_certificate_metadata
/// [`MetadataResolver::try_resolve`]: crate::MetadataResolver::try_resolve
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The request executor could not complete the call.
    #[error("upstream transport failed: {0}")]
    Transport(#[from] ExecutorError),

    /// The upstream answered with a non-OK status.
    #[error("upstream returned status {status}")]
    UpstreamStatus {
        /// HTTP status reported by the executor
        status: u16,
    },

    /// The response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The response had no top-level `data` object.
    #[error("response has no `data` object")]
    MissingData,

    /// A required field was absent (or `null`) in the `data` object.
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    /// A field was present but could not be read as its expected type.
    #[error("field `{field}` is malformed: {reason}")]
    InvalidField {
        /// Wire name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl ResolveError {
    /// Returns true when the failure came from the payload rather than the
    /// transport or the upstream status.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidJson(_)
                | ResolveError::MissingData
                | ResolveError::MissingField(_)
                | ResolveError::InvalidField { .. }
        )
    }
}

/// Failure reported by a [`RequestExecutor`](crate::RequestExecutor)
/// before any HTTP status was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The executor gave up waiting for the upstream.
    #[error("request timed out")]
    Timeout,

    /// The call was cancelled before completing.
    #[error("request cancelled")]
    Cancelled,

    /// Connection-level failure.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Outcome of a denied access-binding change, as seen by the caller-facing
/// layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No usable metadata could be obtained for the certificate.
    #[error("certificate '{certificate_name}' not found")]
    NotFound {
        /// Certificate that was looked up
        certificate_name: String,
    },

    /// The caller is not permitted to change the certificate's bindings.
    #[error("'{username}' may not modify access to certificate '{certificate_name}'")]
    Forbidden {
        /// Caller that was denied
        username: String,
        /// Certificate the caller tried to modify
        certificate_name: String,
    },
}

impl AccessError {
    /// HTTP status the caller-facing layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            AccessError::NotFound { .. } => 404,
            AccessError::Forbidden { .. } => 403,
        }
    }
}
