use crate::selectors::{self, LoginStep};
use crate::session::BrowserSession;
use crate::{Error, Result, stealth};
use chromiumoxide::Page;
use std::time::{Duration, Instant};
use sunauth_core::{AuthSession, Cookie, Credentials, ServiceConfig, SessionData};

/// How long to wait for the optional account-chooser screen before deciding
/// it did not appear.
const CHOOSER_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Scans local storage for the first key containing "token" or "auth" and
/// returns its value. Mirrors the cookie-name scan done Rust-side.
const TOKEN_SCAN_SCRIPT: &str = r#"
(() => {
    for (let i = 0; i < localStorage.length; i++) {
        const key = localStorage.key(i);
        if (key && /token|auth/i.test(key)) {
            return localStorage.getItem(key);
        }
    }
    return null;
})()
"#;

/// Drive a scripted browser through the target site's Google login and
/// harvest the resulting session.
///
/// Single pass, no retries. The browser is released exactly once on every
/// path, success or failure.
pub async fn authenticate(config: &ServiceConfig, credentials: &Credentials) -> Result<AuthSession> {
    if !credentials.is_complete() {
        return Err(Error::MissingCredentials);
    }

    let mut session = BrowserSession::launch(config).await?;
    tracing::info!(target = %config.target_url, "starting Google OAuth authentication");

    let result = run_login_flow(config, credentials, &session).await;
    session.close().await;

    match &result {
        Ok(_) => tracing::info!("authentication succeeded"),
        Err(e) => tracing::warn!("authentication failed: {}", e),
    }
    result
}

async fn run_login_flow(
    config: &ServiceConfig,
    credentials: &Credentials,
    session: &BrowserSession,
) -> Result<AuthSession> {
    let page = session.page();

    stealth::harden(page).await?;
    navigate(page, &config.target_url, config.auth_timeout).await?;
    tracing::info!("loaded target site");
    if let Some(dir) = &config.debug_dir {
        session.dump_screenshot(dir, "login").await;
    }

    // Sign-in control, then the auth dialog it opens.
    let sign_in = selectors::resolve(page, LoginStep::SignIn, config.step_timeout).await?;
    sign_in.click().await?;
    tracing::info!("clicked sign-in control");

    selectors::resolve(page, LoginStep::AuthDialog, config.step_timeout).await?;

    // Provider button hands us off to Google.
    let google = selectors::resolve(page, LoginStep::GoogleProvider, config.step_timeout).await?;
    google.click().await?;
    tracing::info!("clicked Google provider button");

    wait_for_navigation(page, "redirect to provider", config.auth_timeout).await?;
    if let Some(dir) = &config.debug_dir {
        session.dump_screenshot(dir, "provider").await;
    }

    // The chooser only appears when the browser profile knows prior accounts.
    let chooser_seen = handle_account_chooser(page, credentials, config).await?;

    if !chooser_seen {
        let email_input =
            selectors::resolve(page, LoginStep::EmailInput, config.step_timeout).await?;
        email_input.click().await?;
        email_input.type_str(&credentials.email).await?;
        email_input.press_key("Enter").await?;
        tracing::info!("submitted email");
    }

    let password_input =
        selectors::resolve(page, LoginStep::PasswordInput, config.step_timeout).await?;
    password_input.click().await?;
    password_input.type_str(&credentials.password).await?;
    password_input.press_key("Enter").await?;
    tracing::info!("submitted password");

    wait_for_host(page, config.target_host(), config.auth_timeout).await?;
    tracing::info!("redirected back to target site");

    if let Some(dir) = &config.debug_dir {
        session.dump_screenshot(dir, "post-login").await;
        session.dump_cookies(dir).await;
    }

    let cookies = session.cookies().await?;
    let token = harvest_token(page, &cookies).await?;
    assemble_session(token, cookies)
}

/// Pair the harvested token with the session string. An empty cookie jar
/// means there is no session credential to hand back, even if a token was
/// found, so it fails rather than returning an empty `session_data`.
fn assemble_session(token: String, cookies: Vec<Cookie>) -> Result<AuthSession> {
    let session_data = SessionData::join(&cookies);
    if session_data.is_empty() {
        return Err(Error::TokenNotFound);
    }

    Ok(AuthSession {
        token,
        session_data,
        cookies,
    })
}

/// Deal with Google's account-picker page if it shows up. Returns true when
/// an existing account entry was clicked, meaning the email step is skipped.
async fn handle_account_chooser(
    page: &Page,
    credentials: &Credentials,
    config: &ServiceConfig,
) -> Result<bool> {
    let chooser = selectors::probe(
        page,
        &selectors::strategies_for(LoginStep::AccountChooser),
        CHOOSER_PROBE_TIMEOUT,
    )
    .await;

    if chooser.is_none() {
        return Ok(false);
    }
    tracing::info!("account chooser detected");

    // Prefer the entry matching the target email.
    let entry = selectors::probe(
        page,
        &selectors::account_entry_strategies(&credentials.email),
        config.step_timeout,
    )
    .await;

    if let Some(entry) = entry {
        entry.click().await?;
        tracing::info!("selected existing account entry");
        return Ok(true);
    }

    // Fall back to entering the account manually.
    let another =
        selectors::resolve(page, LoginStep::UseAnotherAccount, config.step_timeout).await?;
    another.click().await?;
    tracing::info!("chose to use another account");
    Ok(false)
}

/// Harvest an auth token: local storage first, then cookie names.
async fn harvest_token(page: &Page, cookies: &[Cookie]) -> Result<String> {
    let from_storage: Option<String> = page
        .evaluate(TOKEN_SCAN_SCRIPT)
        .await?
        .into_value()
        .unwrap_or(None);

    if let Some(token) = from_storage.filter(|t| !t.is_empty()) {
        tracing::info!("token found in local storage");
        return Ok(token);
    }

    if let Some(token) = token_from_cookies(cookies) {
        tracing::info!("token found in cookies");
        return Ok(token);
    }

    Err(Error::TokenNotFound)
}

fn token_from_cookies(cookies: &[Cookie]) -> Option<String> {
    cookies
        .iter()
        .find(|c| SessionData::is_token_key(&c.name) && !c.value.is_empty())
        .map(|c| c.value.clone())
}

/// Navigate and wait for the load to settle, under a budget.
async fn navigate(page: &Page, url: &str, timeout: Duration) -> Result<()> {
    let goto = async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<_, Error>(())
    };

    tokio::time::timeout(timeout, goto)
        .await
        .map_err(|_| Error::NavigationTimeout {
            what: format!("loading {}", url),
        })?
}

/// Wait for an in-flight navigation triggered by a click.
async fn wait_for_navigation(page: &Page, what: &str, timeout: Duration) -> Result<()> {
    tokio::time::timeout(timeout, page.wait_for_navigation())
        .await
        .map_err(|_| Error::NavigationTimeout {
            what: what.to_string(),
        })??;
    Ok(())
}

/// Poll until the page URL lands on the given host.
async fn wait_for_host(page: &Page, host: &str, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Ok(Some(url)) = page.url().await {
            if url.contains(host) {
                return Ok(());
            }
        }

        if Instant::now() >= deadline {
            return Err(Error::NavigationTimeout {
                what: format!("waiting for redirect back to {}", host),
            });
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_credentials_fail_before_browser_launch() {
        // Chrome path points nowhere; a launch attempt would surface as a
        // Browser error, not MissingCredentials.
        let mut config = ServiceConfig::default();
        config.chrome_path = Some(PathBuf::from("/nonexistent/chrome"));

        let result = authenticate(&config, &Credentials::new("", "secret")).await;
        assert!(matches!(result, Err(Error::MissingCredentials)));

        let result = authenticate(&config, &Credentials::new("a@b.com", "")).await;
        assert!(matches!(result, Err(Error::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_complete_credentials_reach_the_launcher() {
        let mut config = ServiceConfig::default();
        config.chrome_path = Some(PathBuf::from("/nonexistent/chrome"));

        let result = authenticate(&config, &Credentials::new("a@b.com", "secret")).await;
        match result {
            Err(Error::Browser(msg)) => assert!(msg.contains("not found")),
            other => panic!("expected Browser error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_token_from_cookies_matches_token_and_auth_names() {
        let cookies = vec![
            Cookie::new("theme", "dark", ".suno.com", "/"),
            Cookie::new("__session_authToken", "tok-1", ".suno.com", "/"),
        ];
        assert_eq!(token_from_cookies(&cookies), Some("tok-1".to_string()));

        let cookies = vec![Cookie::new("theme", "dark", ".suno.com", "/")];
        assert_eq!(token_from_cookies(&cookies), None);
    }

    #[test]
    fn test_assemble_session_rejects_empty_cookie_jar() {
        // A localStorage token with zero cookies must not produce a success
        // with empty session_data.
        let result = assemble_session("tok-1".to_string(), vec![]);
        assert!(matches!(result, Err(Error::TokenNotFound)));
    }

    #[test]
    fn test_assemble_session_yields_non_empty_session_data() {
        let cookies = vec![Cookie::new("sessionid", "abc", ".suno.com", "/")];
        let session = assemble_session("tok-1".to_string(), cookies).unwrap();

        assert_eq!(session.session_data, "sessionid=abc");
        assert_eq!(session.token, "tok-1");
    }

    #[test]
    fn test_token_scan_script_matches_rust_side_markers() {
        // The JS regex and SessionData::is_token_key must agree.
        assert!(TOKEN_SCAN_SCRIPT.contains("/token|auth/i"));
        assert!(SessionData::is_token_key("token"));
        assert!(SessionData::is_token_key("auth"));
    }
}
