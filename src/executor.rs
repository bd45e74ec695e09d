use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::error::ExecutorError;
use crate::token::AuthToken;

/// HTTP status the upstream uses for a successful call.
pub const STATUS_OK: u16 = 200;

/// Raw answer from the upstream backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl UpstreamResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(STATUS_OK, body)
    }

    /// Returns true if the status is `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Body sent to the upstream for a path-based lookup.
#[derive(Debug, Serialize)]
pub(crate) struct PathRequest<'a> {
    pub(crate) path: &'a str,
}

/// Capability for reaching the upstream backend.
///
/// Implementations own transport concerns: retries, timeouts and
/// cancellation. Anything that prevents a status from being obtained is
/// reported as an [`ExecutorError`].
pub trait RequestExecutor {
    /// Sends `body` (a JSON document) to `endpoint` on behalf of `token`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutorError`] if no HTTP status could be obtained.
    fn execute(
        &self,
        endpoint: &str,
        body: &str,
        token: &AuthToken,
    ) -> Result<UpstreamResponse, ExecutorError>;
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for &E {
    fn execute(
        &self,
        endpoint: &str,
        body: &str,
        token: &AuthToken,
    ) -> Result<UpstreamResponse, ExecutorError> {
        (**self).execute(endpoint, body, token)
    }
}

/// One call observed by a [`RecordingExecutor`].
///
/// The token is deliberately absent; only its presence is noted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Endpoint the call targeted
    pub endpoint: String,
    /// `path` field of the request body, if it had one
    pub path: Option<String>,
    /// Length of the request body in bytes
    pub body_len: usize,
    /// Whether a non-empty token was supplied
    pub had_token: bool,
}

/// In-memory [`RequestExecutor`] for tests and local wiring.
///
/// Answers are looked up by the `path` in the request body; unmatched calls
/// get the fallback answer, which defaults to `404` with an empty error list.
/// Every call is recorded.
///
/// # Examples
///
/// ```
/// use certificate_access::{RecordingExecutor, RequestExecutor, UpstreamResponse, AuthToken};
///
/// let executor = RecordingExecutor::new().with_response(
///     "metadata/sslcerts/a",
///     UpstreamResponse::ok(r#"{"data":{"certificateName":"a","certificateId":1}}"#),
/// );
///
/// let token = AuthToken::new("s.token");
/// let hit = executor
///     .execute("/certmanager", r#"{"path":"metadata/sslcerts/a"}"#, &token)
///     .unwrap();
/// assert!(hit.is_ok());
///
/// let miss = executor
///     .execute("/certmanager", r#"{"path":"metadata/sslcerts/b"}"#, &token)
///     .unwrap();
/// assert_eq!(miss.status, 404);
/// assert_eq!(executor.call_count(), 2);
/// ```
#[derive(Debug)]
pub struct RecordingExecutor {
    responses: HashMap<String, Result<UpstreamResponse, ExecutorError>>,
    fallback: Result<UpstreamResponse, ExecutorError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingExecutor {
    /// Creates an executor with no canned answers.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: Ok(UpstreamResponse::new(404, r#"{"errors":[]}"#)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers lookups of `path` with `response`.
    pub fn with_response(mut self, path: impl Into<String>, response: UpstreamResponse) -> Self {
        self.responses.insert(path.into(), Ok(response));
        self
    }

    /// Fails lookups of `path` with `error`.
    pub fn with_failure(mut self, path: impl Into<String>, error: ExecutorError) -> Self {
        self.responses.insert(path.into(), Err(error));
        self
    }

    /// Answers every unmatched call with `response`.
    pub fn with_fallback(mut self, response: UpstreamResponse) -> Self {
        self.fallback = Ok(response);
        self
    }

    /// Returns the number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns a snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        // Poisoning only means another caller panicked; the log itself is intact.
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor for RecordingExecutor {
    fn execute(
        &self,
        endpoint: &str,
        body: &str,
        token: &AuthToken,
    ) -> Result<UpstreamResponse, ExecutorError> {
        let path = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("path").and_then(|p| p.as_str()).map(str::to_string));

        self.lock().push(RecordedCall {
            endpoint: endpoint.to_string(),
            path: path.clone(),
            body_len: body.len(),
            had_token: !token.is_empty(),
        });

        path.and_then(|p| self.responses.get(&p))
            .unwrap_or(&self.fallback)
            .clone()
    }
}
