use std::fmt;

/// The caller's upstream auth token.
///
/// Debug and Display always render `[REDACTED]` so the token cannot reach a
/// diagnostic by accident. The raw value is only reachable through
/// [`expose_secret`](Self::expose_secret), which request executors call when
/// they attach it to the outbound request.
///
/// # Examples
///
/// ```
/// use certificate_access::AuthToken;
///
/// let token = AuthToken::new("s.8FkQx2");
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "s.8FkQx2");
/// ```
// Do NOT derive Clone or Debug. Debug and Display are hand-written to redact.
pub struct AuthToken {
    inner: String,
}

impl AuthToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// Returns the raw token. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Returns true if the token is the empty string.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_redacts_debug() {
        let token = AuthToken::new("s.hunter2");
        let debug_output = format!("{:?}", token);

        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("String"));
    }

    #[test]
    fn token_redacts_display() {
        let token = AuthToken::new("s.hunter2");
        assert_eq!(token.to_string(), "[REDACTED]");
    }

    #[test]
    fn token_exposes_when_explicit() {
        let token = AuthToken::new("s.abc");
        assert_eq!(token.expose_secret(), "s.abc");
        assert!(!token.is_empty());
        assert!(AuthToken::new("").is_empty());
    }
}
