//! Certificate metadata as recorded by the upstream certificate backend.
//!
//! The upstream record is owned by another system, so only the required
//! fields can fail a mapping:
//! - required fields that are missing, `null` or not scalar fail the mapping
//! - an optional field is set whenever its key is present, and `None` only
//!   when the key is missing
//! - strings are taken verbatim; numbers, booleans and `null` become their
//!   JSON text
//! - an array or object in an optional field maps to the empty string

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ResolveError;

/// A certificate's metadata record.
///
/// Only `certificate_name` and `certificate_id` are guaranteed. Every other
/// attribute is `None` when the upstream record did not carry it, which is
/// distinct from `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMetadata {
    /// Certificate common name
    pub certificate_name: String,
    /// Backend-assigned certificate id
    pub certificate_id: i64,
    /// Certificate type (e.g. `internal`, `external`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_type: Option<String>,
    /// Application id the certificate is registered under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub akmid: Option<String>,
    /// Owning application name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    /// Owning application's contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_owner_email_id: Option<String>,
    /// Owning application tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_tag: Option<String>,
    /// Identity that requested the certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_created_by: Option<String>,
    /// Certificate owner's email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_owner_email_id: Option<String>,
    /// Creation date as reported upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    /// Lifecycle status as reported upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_status: Option<String>,
    /// Expiry date as reported upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// Owner identity; the only ownership signal used for authorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_owner_ntid: Option<String>,
}

impl CertificateMetadata {
    /// Creates a record with only the required attributes set.
    pub fn new(certificate_name: impl Into<String>, certificate_id: i64) -> Self {
        Self {
            certificate_name: certificate_name.into(),
            certificate_id,
            ..Self::default()
        }
    }

    /// Sets the recorded owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.cert_owner_ntid = Some(owner.into());
        self
    }

    /// Returns the recorded owner, treating an empty value as no owner.
    pub fn owner(&self) -> Option<&str> {
        self.cert_owner_ntid.as_deref().filter(|owner| !owner.is_empty())
    }

    /// Maps the upstream `data` object into a record.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingData`] if `data` is not a JSON object
    /// - [`ResolveError::MissingField`] if a required field is missing or `null`
    /// - [`ResolveError::InvalidField`] if a required field has an unusable type
    pub fn from_data(data: &Value) -> Result<Self, ResolveError> {
        let fields = data.as_object().ok_or(ResolveError::MissingData)?;

        Ok(Self {
            certificate_name: required_text(fields, "certificateName")?,
            certificate_id: required_id(fields, "certificateId")?,
            cert_type: optional_text(fields, "certType"),
            akmid: optional_text(fields, "akmid"),
            application_name: optional_text(fields, "applicationName"),
            application_owner_email_id: optional_text(fields, "applicationOwnerEmailId"),
            application_tag: optional_text(fields, "applicationTag"),
            cert_created_by: optional_text(fields, "certCreatedBy"),
            cert_owner_email_id: optional_text(fields, "certOwnerEmailId"),
            create_date: optional_text(fields, "createDate"),
            certificate_status: optional_text(fields, "certificateStatus"),
            expiry_date: optional_text(fields, "expiryDate"),
            cert_owner_ntid: optional_text(fields, "certOwnerNtid"),
        })
    }
}

fn present<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|value| !value.is_null())
}

fn required_text(fields: &Map<String, Value>, name: &'static str) -> Result<String, ResolveError> {
    match present(fields, name).ok_or(ResolveError::MissingField(name))? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ResolveError::InvalidField {
            field: name,
            reason: format!("expected a scalar, found {}", kind(other)),
        }),
    }
}

// A present key always yields a value, `null` included.
fn optional_text(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).map(|value| match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => String::new(),
        scalar => scalar.to_string(),
    })
}

fn required_id(fields: &Map<String, Value>, name: &'static str) -> Result<i64, ResolveError> {
    let value = present(fields, name).ok_or(ResolveError::MissingField(name))?;
    let invalid = |reason: String| ResolveError::InvalidField {
        field: name,
        reason,
    };

    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| invalid(format!("{} is not a 64-bit integer", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(format!("'{}' is not an integer: {}", s, e))),
        other => Err(invalid(format!("expected an integer, found {}", kind(other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
