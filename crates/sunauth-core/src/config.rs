use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default target site whose login UI is automated.
pub const DEFAULT_TARGET_URL: &str = "https://suno.com";

/// Budget for whole-flow waits (page navigations, the final redirect).
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(60);

/// Budget for a single selector-probing step.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the automation procedure needs, passed in explicitly at call
/// time. There is no module-level singleton and no environment access below
/// this point.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the target site.
    pub target_url: String,
    /// Custom Chrome binary, if the platform defaults don't apply.
    pub chrome_path: Option<PathBuf>,
    /// Run Chrome headless. Disable for local troubleshooting.
    pub headless: bool,
    /// Directory for debug screenshots and cookie dumps. None disables dumps.
    pub debug_dir: Option<PathBuf>,
    pub auth_timeout: Duration,
    pub step_timeout: Duration,
}

impl ServiceConfig {
    /// Create a config for a target URL, normalizing a missing scheme.
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: normalize_url(target_url.into()),
            chrome_path: None,
            headless: true,
            debug_dir: None,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            step_timeout: DEFAULT_STEP_TIMEOUT,
        }
    }

    /// Host portion of the target URL, used to recognize the post-login
    /// redirect landing back on the target site.
    pub fn target_host(&self) -> &str {
        let stripped = self
            .target_url
            .strip_prefix("https://")
            .or_else(|| self.target_url.strip_prefix("http://"))
            .unwrap_or(&self.target_url);
        stripped.split('/').next().unwrap_or(stripped)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_URL)
    }
}

/// Ensure a URL carries an explicit scheme, defaulting to https.
fn normalize_url(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{}", url)
    }
}

/// Google account credentials for one authentication attempt. Transient:
/// held for the duration of the request, never stored.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields present and non-blank.
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.trim().is_empty()
    }
}

// Manual impl so the password can never end up in a log line.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
