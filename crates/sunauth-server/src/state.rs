use sunauth_core::{Credentials, ServiceConfig};

/// Shared, immutable state behind the router. The automation procedure gets
/// its configuration from here at call time; nothing reads the environment
/// below the binary entrypoint.
pub struct AppState {
    pub config: ServiceConfig,
    pub api_key: String,
    /// Operator-provided fallback account, used when a login request leaves
    /// a credential field empty.
    pub default_credentials: Option<Credentials>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        api_key: impl Into<String>,
        default_credentials: Option<Credentials>,
    ) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            default_credentials,
        }
    }
}
