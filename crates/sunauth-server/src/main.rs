use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sunauth_core::{config::DEFAULT_TARGET_URL, Credentials, ServiceConfig};
use sunauth_server::{build_router, AppState};

#[derive(Parser)]
#[command(name = "sunauth")]
#[command(author, version, about, long_about = None)]
#[command(about = "HTTP service that automates Google login for Suno and returns session data")]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// API key required by the login and debug endpoints
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: String,

    /// Fallback Google account email for requests that omit one
    #[arg(long, env = "GOOGLE_EMAIL")]
    google_email: Option<String>,

    /// Fallback Google account password
    #[arg(long, env = "GOOGLE_PASSWORD", hide_env_values = true)]
    google_password: Option<String>,

    /// Chrome binary location, if not at a platform default
    #[arg(long, env = "CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Base URL of the target site
    #[arg(long, env = "TARGET_URL", default_value = DEFAULT_TARGET_URL)]
    target_url: String,

    /// Directory for debug screenshots and cookie dumps
    #[arg(long, env = "DEBUG_DIR")]
    debug_dir: Option<PathBuf>,

    /// Run Chrome with a visible window for troubleshooting
    #[arg(long)]
    headful: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = ServiceConfig::new(cli.target_url);
    config.chrome_path = cli.chrome_path;
    config.headless = !cli.headful;
    config.debug_dir = cli.debug_dir;

    if let Some(dir) = &config.debug_dir {
        std::fs::create_dir_all(dir)?;
    }

    let default_credentials = match (cli.google_email, cli.google_password) {
        (Some(email), Some(password)) => Some(Credentials::new(email, password)),
        _ => None,
    };

    let state = Arc::new(AppState::new(config, cli.api_key, default_credentials));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("sunauth listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("sunauth=debug,sunauth_server=debug,sunauth_browser=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("sunauth=info,sunauth_server=info,sunauth_browser=info")
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
