//! Access decisions and metadata resolution for managed SSL certificates.
//!
//! This crate decides whether an authenticated caller may add or remove the
//! users, groups and roles bound to a certificate, and resolves the
//! certificate's metadata record from the upstream certificate-lifecycle
//! backend.
//!
//! # Core Types
//!
//! - [`AccessDecisionEngine`]: pure ownership-based permission check
//! - [`MetadataResolver`]: fetches and maps a certificate's upstream record
//! - [`CertificateAccessGate`]: resolves, decides and audits in one call
//! - [`CertificateMetadata`]: the record; optional attributes stay `None`
//!   when the upstream omits them
//! - [`RequestExecutor`]: the injected capability for reaching the upstream
//! - [`RequestContext`]: explicit per-request data carried into diagnostics
//! - [`AuthToken`]: upstream token that is redacted in all formatted output
//!
//! # Examples
//!
//! ```
//! use certificate_access::{
//!     AccessDecisionEngine, AuthToken, CallerIdentity, MetadataResolver, RecordingExecutor,
//!     RequestContext, UpstreamResponse,
//! };
//!
//! let executor = RecordingExecutor::new().with_response(
//!     "metadata/sslcerts/web.example.com",
//!     UpstreamResponse::ok(
//!         r#"{"data":{"certificateName":"web.example.com","certificateId":7,"certOwnerNtid":"alice"}}"#,
//!     ),
//! );
//! let resolver = MetadataResolver::new(executor);
//! let engine = AccessDecisionEngine::new();
//!
//! let ctx = RequestContext::new("alice", "/v2/sslcert/user");
//! let token = AuthToken::new("s.token");
//! let metadata = resolver.resolve_certificate_metadata(&ctx, &token, "web.example.com");
//!
//! let caller = CallerIdentity::user("Alice");
//! assert!(engine.has_add_or_remove_permission(&caller, metadata.as_ref()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod config;
mod error;
mod executor;
mod gate;
mod logging;
mod metadata;
mod policy;
mod request;
mod resolver;
mod token;

pub use config::{ResolverConfig, DEFAULT_CERT_STORE_PREFIX, DEFAULT_ENDPOINT};
pub use error::{AccessError, ExecutorError, ResolveError};
pub use executor::{RecordedCall, RecordingExecutor, RequestExecutor, UpstreamResponse, STATUS_OK};
pub use gate::CertificateAccessGate;
pub use logging::DiagnosticLog;
pub use metadata::CertificateMetadata;
pub use policy::AccessDecisionEngine;
pub use request::{CallerIdentity, RequestContext};
pub use resolver::MetadataResolver;
pub use token::AuthToken;
