use crate::logging::DiagnosticLog;

/// The authenticated actor invoking a mutation on a certificate.
///
/// Built once per request by the authentication layer and only read here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Login name; compared case-insensitively against certificate owners
    pub username: String,
    /// Whether the caller authenticated with admin rights
    pub is_admin: bool,
}

impl CallerIdentity {
    /// Creates a non-admin caller.
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
        }
    }

    /// Creates an admin caller.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: true,
        }
    }

    /// Returns true if `owner` names this caller, ignoring case.
    ///
    /// Characters are folded one at a time, so a character whose case
    /// mapping would expand (`ß` to `SS`) only matches itself.
    pub fn is_named(&self, owner: &str) -> bool {
        self.username.chars().count() == owner.chars().count()
            && self
                .username
                .chars()
                .zip(owner.chars())
                .all(|(a, b)| chars_match_ignoring_case(a, b))
    }
}

fn chars_match_ignoring_case(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    let (upper_a, upper_b) = (simple_upper(a), simple_upper(b));
    upper_a == upper_b || simple_lower(upper_a) == simple_lower(upper_b)
}

// Single-char case mappings. Multi-char uppercase mappings keep the char;
// the one multi-char lowercase mapping (`İ`) starts with its simple form.
fn simple_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

fn simple_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Per-request correlation data attached to every diagnostic.
///
/// Passed explicitly to the resolver and the gate; nothing in this crate
/// reads request data from thread-local state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// User the request is running as
    pub user: Option<String>,
    /// URL of the inbound API call
    pub api_url: Option<String>,
    /// Correlation id, if the edge assigned one
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Creates a context for `user` serving `api_url`.
    pub fn new(user: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            api_url: Some(api_url.into()),
            request_id: None,
        }
    }

    /// Sets the correlation id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns a logger bound to this context.
    pub fn log(&self) -> DiagnosticLog<'_> {
        DiagnosticLog::new(self)
    }
}
