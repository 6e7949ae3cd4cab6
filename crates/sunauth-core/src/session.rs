use serde::{Deserialize, Serialize};

/// Cookie names that carry the target site's session. A cookie whose name
/// contains any of these is included in the session string.
const SESSION_COOKIE_MARKERS: &[&str] = &["sessionid", "csrftoken", "suno_session"];

/// Key substrings that identify a harvested auth token in local storage or
/// cookie names. Matched case-insensitively.
const TOKEN_KEY_MARKERS: &[&str] = &["token", "auth"];

/// A browser cookie, collected verbatim from the automated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
        }
    }
}

/// Result of a successful authentication attempt. Lives for one request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    /// Token harvested from local storage or cookies.
    pub token: String,
    /// Semicolon-joined `name=value` pairs, the bearer credential for revisits.
    pub session_data: String,
    /// Raw cookies from the browser session.
    pub cookies: Vec<Cookie>,
}

/// Helpers around the semicolon-joined session string format.
pub struct SessionData;

impl SessionData {
    /// Build the session string from session-bearing cookies. Falls back to
    /// all cookies when none match the known session names. An empty cookie
    /// set yields an empty string; callers that need a usable credential
    /// must treat that as failure.
    pub fn join(cookies: &[Cookie]) -> String {
        let session: Vec<&Cookie> = cookies
            .iter()
            .filter(|c| Self::is_session_cookie(&c.name))
            .collect();

        let picked = if session.is_empty() {
            cookies.iter().collect()
        } else {
            session
        };

        picked
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Split a session string back into `(name, value)` pairs. Malformed
    /// fragments are skipped.
    pub fn parse(session_data: &str) -> Vec<(String, String)> {
        session_data
            .split(';')
            .filter_map(|fragment| {
                let fragment = fragment.trim();
                let (name, value) = fragment.split_once('=')?;
                if name.is_empty() || value.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.to_string()))
            })
            .collect()
    }

    /// Whether a cookie name marks it as part of the target site's session.
    pub fn is_session_cookie(name: &str) -> bool {
        SESSION_COOKIE_MARKERS
            .iter()
            .any(|marker| name.contains(marker))
    }

    /// Whether a storage key or cookie name looks token-bearing.
    pub fn is_token_key(key: &str) -> bool {
        let lowered = key.to_lowercase();
        TOKEN_KEY_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
    }
}
