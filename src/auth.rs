//! HTTP authentication utilities

use base64::Engine;

/// Basic auth credentials carried on a request.
///
/// Presence is modeled with `Option<BasicAuth>` on the builder, so an
/// empty username is an ordinary (if unusual) credential rather than a
/// sentinel for "no auth".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Render the `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }
}
