use crate::selectors;
use crate::session::BrowserSession;
use crate::Result;
use sunauth_core::{Cookie, ServiceConfig, SessionData};

/// Replay a previously captured session string into a fresh browser and
/// check whether the target site still treats it as logged in.
///
/// Surfaces no error detail: any failure along the way means `false`.
pub async fn verify_session(config: &ServiceConfig, session_data: &str) -> bool {
    if session_data.trim().is_empty() {
        return false;
    }

    let pairs = SessionData::parse(session_data);
    if pairs.is_empty() {
        return false;
    }

    match replay_and_check(config, &pairs).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!("session verification failed: {}", e);
            false
        }
    }
}

async fn replay_and_check(config: &ServiceConfig, pairs: &[(String, String)]) -> Result<bool> {
    let mut session = BrowserSession::launch(config).await?;

    let result = async {
        let domain = config.target_host();
        let cookies: Vec<Cookie> = pairs
            .iter()
            .map(|(name, value)| Cookie::new(name, value, domain, "/"))
            .collect();
        session.set_cookies(&cookies).await?;

        let page = session.page();
        page.goto(&config.target_url).await?;
        page.wait_for_navigation().await?;

        Ok::<bool, crate::Error>(check_login_state(&session, config).await?)
    }
    .await;

    session.close().await;
    result
}

/// Signed-in probe: login-indicator elements first, session cookies second.
async fn check_login_state(session: &BrowserSession, config: &ServiceConfig) -> Result<bool> {
    let indicator = selectors::probe(
        session.page(),
        &selectors::login_indicator_strategies(),
        config.step_timeout,
    )
    .await;

    if indicator.is_some() {
        tracing::info!("login indicator element found");
        return Ok(true);
    }

    let cookies = session.cookies().await?;
    Ok(cookies
        .iter()
        .any(|c| SessionData::is_session_cookie(&c.name)))
}
