use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use certificate_access::{
    audit::AUDIT_TARGET, AuthToken, CallerIdentity, CertificateAccessGate, ExecutorError,
    MetadataResolver, RecordingExecutor, RequestContext, UpstreamResponse,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;

const NAME: &str = "web.example.com";
const PATH: &str = "metadata/sslcerts/web.example.com";
const TOKEN: &str = "s.Zx81-super-secret";

// ============================================================================
// Diagnostic capture
// ============================================================================

#[derive(Debug, Clone)]
struct Record {
    level: Level,
    target: String,
    fields: HashMap<String, String>,
}

impl Record {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Record>>>);

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        self.0.lock().unwrap().push(Record {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
        });
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<Record>) {
    let capture = Capture::default();
    let subscriber = Registry::default().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let records = capture.0.lock().unwrap().clone();
    (out, records)
}

fn errors(records: &[Record]) -> Vec<&Record> {
    records.iter().filter(|r| r.level == Level::ERROR).collect()
}

// ============================================================================
// Fixtures
// ============================================================================

fn ctx() -> RequestContext {
    RequestContext::new("alice", "/v2/sslcert/user").with_request_id("req-42")
}

fn token() -> AuthToken {
    AuthToken::new(TOKEN)
}

fn resolver(response: UpstreamResponse) -> MetadataResolver<RecordingExecutor> {
    MetadataResolver::new(RecordingExecutor::new().with_response(PATH, response))
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn required_only_record_has_no_optional_attributes() {
    let resolver = resolver(UpstreamResponse::ok(
        r#"{"data":{"certificateName":"web.example.com","certificateId":57}}"#,
    ));

    let meta = resolver
        .resolve_certificate_metadata(&ctx(), &token(), NAME)
        .expect("record resolves");

    assert_eq!(meta.certificate_name, NAME);
    assert_eq!(meta.certificate_id, 57);
    assert_eq!(meta.cert_type, None);
    assert_eq!(meta.akmid, None);
    assert_eq!(meta.application_name, None);
    assert_eq!(meta.application_owner_email_id, None);
    assert_eq!(meta.application_tag, None);
    assert_eq!(meta.cert_created_by, None);
    assert_eq!(meta.cert_owner_email_id, None);
    assert_eq!(meta.create_date, None);
    assert_eq!(meta.certificate_status, None);
    assert_eq!(meta.expiry_date, None);
    assert_eq!(meta.cert_owner_ntid, None);
}

#[test]
fn missing_certificate_name_logs_one_error() {
    let resolver = resolver(UpstreamResponse::ok(r#"{"data":{"certificateId":57}}"#));

    let (meta, records) =
        capture(|| resolver.resolve_certificate_metadata(&ctx(), &token(), NAME));

    assert!(meta.is_none());
    let errors = errors(&records);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("action"), Some("getCertificateMetaData"));
    assert_eq!(errors[0].field("user"), Some("alice"));
    assert_eq!(errors[0].field("api_url"), Some("/v2/sslcert/user"));
}

#[test]
fn upstream_error_statuses_are_absent() {
    for status in [404, 500] {
        let resolver = resolver(UpstreamResponse::new(status, r#"{"errors":["boom"]}"#));

        let (meta, records) =
            capture(|| resolver.resolve_certificate_metadata(&ctx(), &token(), NAME));

        assert!(meta.is_none());
        assert_eq!(errors(&records).len(), 1);

        let done = records
            .iter()
            .find(|r| r.field("action") == Some("Get Certificate metadata Info"))
            .expect("completion record");
        assert_eq!(done.level, Level::DEBUG);
        assert_eq!(done.field("status"), Some(status.to_string().as_str()));
    }
}

#[test]
fn transport_failure_is_absent() {
    let executor = RecordingExecutor::new().with_failure(PATH, ExecutorError::Timeout);
    let resolver = MetadataResolver::new(executor);

    let (meta, records) =
        capture(|| resolver.resolve_certificate_metadata(&ctx(), &token(), NAME));

    assert!(meta.is_none());
    assert_eq!(errors(&records).len(), 1);

    let debug: Vec<_> = records.iter().filter(|r| r.level == Level::DEBUG).collect();
    assert_eq!(debug.len(), 2);
    assert_eq!(debug[0].field("action"), Some("Get Certificate Info"));
    assert_eq!(debug[1].field("action"), Some("Get Certificate metadata Info"));
    assert_eq!(debug[1].field("status"), None);
}

#[test]
fn nested_optional_value_keeps_owner_access() {
    let gate = CertificateAccessGate::new(resolver(UpstreamResponse::ok(
        r#"{"data":{"certificateName":"web.example.com","certificateId":1,"certOwnerNtid":"alice","applicationTag":["x","y"]}}"#,
    )));

    let meta = gate
        .authorize(&ctx(), &CallerIdentity::user("alice"), &token(), NAME)
        .expect("owner is granted");
    assert_eq!(meta.application_tag.as_deref(), Some(""));
}

#[test]
fn null_owner_denies_admin() {
    let gate = CertificateAccessGate::new(resolver(UpstreamResponse::ok(
        r#"{"data":{"certificateName":"web.example.com","certificateId":1,"certOwnerNtid":null}}"#,
    )));

    let err = gate
        .authorize(&ctx(), &CallerIdentity::admin("root"), &token(), NAME)
        .unwrap_err();
    assert_eq!(err.http_status(), 403);
}

#[test]
fn successful_lookup_logs_before_and_after() {
    let resolver = resolver(UpstreamResponse::ok(
        r#"{"data":{"certificateName":"web.example.com","certificateId":57}}"#,
    ));

    let (_, records) = capture(|| resolver.resolve_certificate_metadata(&ctx(), &token(), NAME));

    let debug: Vec<_> = records.iter().filter(|r| r.level == Level::DEBUG).collect();
    assert_eq!(debug.len(), 2);
    assert_eq!(debug[0].field("action"), Some("Get Certificate Info"));
    assert!(debug[0]
        .field("message")
        .is_some_and(|m| m.contains("metadata/sslcerts/web.example.com")));
    assert_eq!(debug[1].field("action"), Some("Get Certificate metadata Info"));
    assert_eq!(debug[1].field("status"), Some("200"));
    assert!(errors(&records).is_empty());
}

#[test]
fn request_body_matches_upstream_convention() {
    let resolver = resolver(UpstreamResponse::new(404, ""));
    let _ = resolver.resolve_certificate_metadata(&ctx(), &token(), NAME);

    let call = &resolver.executor().calls()[0];
    assert_eq!(call.endpoint, "/certmanager");
    assert_eq!(call.path.as_deref(), Some(PATH));
    assert_eq!(call.body_len, r#"{"path":"metadata/sslcerts/web.example.com"}"#.len());
    assert!(call.had_token);
}

#[test]
fn token_never_reaches_diagnostics() {
    let resolver = resolver(UpstreamResponse::ok("not json"));

    let (_, records) = capture(|| resolver.resolve_certificate_metadata(&ctx(), &token(), NAME));

    assert!(!records.is_empty());
    for record in &records {
        for value in record.fields.values() {
            assert!(!value.contains(TOKEN), "token leaked into {:?}", record);
        }
    }
    assert!(!format!("{:?}", resolver).contains(TOKEN));
}

// ============================================================================
// Gate
// ============================================================================

#[test]
fn gate_grants_owner_and_audits() {
    let gate = CertificateAccessGate::new(resolver(UpstreamResponse::ok(
        r#"{"data":{"certificateName":"web.example.com","certificateId":57,"certOwnerNtid":"ALICE"}}"#,
    )));

    let (result, records) =
        capture(|| gate.authorize(&ctx(), &CallerIdentity::user("alice"), &token(), NAME));

    assert!(result.is_ok());
    let audit: Vec<_> = records.iter().filter(|r| r.target == AUDIT_TARGET).collect();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].field("outcome"), Some("granted"));
    assert_eq!(audit[0].field("request_id"), Some("req-42"));
    assert_eq!(gate.audit_trail().len(), 1);
}

#[test]
fn gate_maps_signals_to_http_statuses() {
    let gate = CertificateAccessGate::new(resolver(UpstreamResponse::ok(
        r#"{"data":{"certificateName":"web.example.com","certificateId":57,"certOwnerNtid":"bob"}}"#,
    )));

    let forbidden = gate
        .authorize(&ctx(), &CallerIdentity::admin("alice"), &token(), NAME)
        .unwrap_err();
    assert_eq!(forbidden.http_status(), 403);

    let not_found = gate
        .authorize(&ctx(), &CallerIdentity::admin("alice"), &token(), "other.example.com")
        .unwrap_err();
    assert_eq!(not_found.http_status(), 404);
}
