use serde::Deserialize;

/// Endpoint used to reach the certificate-lifecycle backend.
pub const DEFAULT_ENDPOINT: &str = "/certmanager";

/// Store prefix under which certificate metadata records live.
pub const DEFAULT_CERT_STORE_PREFIX: &str = "metadata/sslcerts";

/// Where [`MetadataResolver`](crate::MetadataResolver) looks certificates up.
///
/// Deserializable so a service can load it from its own config file; missing
/// keys fall back to the defaults.
///
/// # Examples
///
/// ```
/// use certificate_access::ResolverConfig;
///
/// let config: ResolverConfig =
///     serde_json::from_str(r#"{"cert_store_prefix": "metadata/internalcerts"}"#).unwrap();
///
/// assert_eq!(config.endpoint, "/certmanager");
/// assert_eq!(config.lookup_path("api.internal"), "metadata/internalcerts/api.internal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Endpoint identifier handed to the request executor
    pub endpoint: String,
    /// Prefix joined with the certificate name to form the lookup path
    pub cert_store_prefix: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cert_store_prefix: DEFAULT_CERT_STORE_PREFIX.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Overrides the executor endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the certificate store prefix.
    pub fn with_cert_store_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cert_store_prefix = prefix.into();
        self
    }

    /// Builds the upstream lookup path for `certificate_name`.
    ///
    /// The name is appended verbatim after a single `/`; the backend owns
    /// any further interpretation of it.
    pub fn lookup_path(&self, certificate_name: &str) -> String {
        format!(
            "{}/{}",
            self.cert_store_prefix.trim_end_matches('/'),
            certificate_name
        )
    }
}
