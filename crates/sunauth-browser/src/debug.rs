use crate::session::BrowserSession;
use crate::{ChromeFinder, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use sunauth_core::ServiceConfig;

/// Environment variables worth surfacing in the report. Credentials and the
/// API key are deliberately absent.
const REPORTED_ENV_VARS: &[&str] = &["PATH", "RUST_LOG", "CHROME_PATH", "TARGET_URL"];

/// Process and environment snapshot for troubleshooting, assembled on demand
/// and never persisted.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub platform: String,
    pub arch: String,
    pub pid: u32,
    pub cwd: String,
    pub cwd_entries: Vec<String>,
    pub env: BTreeMap<String, String>,
    /// Candidate Chrome locations and whether each exists.
    pub chrome_candidates: BTreeMap<String, bool>,
    pub chrome_resolved: Option<String>,
}

impl DebugReport {
    pub fn collect(config: &ServiceConfig) -> Self {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());

        let cwd_entries = std::fs::read_dir(&cwd)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        let env = REPORTED_ENV_VARS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();

        let chrome_candidates = ChromeFinder::candidate_paths()
            .into_iter()
            .map(|p| (p.display().to_string(), p.exists()))
            .collect();

        let chrome_resolved = ChromeFinder::new(config.chrome_path.clone())
            .find()
            .ok()
            .map(|p| p.display().to_string());

        Self {
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            pid: std::process::id(),
            cwd,
            cwd_entries,
            env,
            chrome_candidates,
            chrome_resolved,
        }
    }
}

/// Result of an end-to-end browser capability check.
#[derive(Debug, Serialize)]
pub struct SelfCheckReport {
    pub page_title: String,
    pub user_agent: String,
}

/// Launch a browser, load a known page, and read back its title and the
/// effective user agent. Proves the whole CDP path works on this host.
pub async fn browser_self_check(config: &ServiceConfig) -> Result<SelfCheckReport> {
    let mut session = BrowserSession::launch(config).await?;

    let result = async {
        let page = session.page();
        page.goto("https://example.com").await?;
        page.wait_for_navigation().await?;

        let page_title: String = page
            .evaluate("document.title")
            .await?
            .into_value()
            .unwrap_or_default();
        let user_agent: String = page
            .evaluate("navigator.userAgent")
            .await?
            .into_value()
            .unwrap_or_default();

        Ok::<_, crate::Error>(SelfCheckReport {
            page_title,
            user_agent,
        })
    }
    .await;

    session.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_report_collects_without_panicking() {
        let report = DebugReport::collect(&ServiceConfig::default());

        assert!(!report.platform.is_empty());
        assert!(!report.arch.is_empty());
        assert!(report.pid > 0);
        assert_eq!(
            report.chrome_candidates.len(),
            ChromeFinder::candidate_paths().len()
        );
    }

    #[test]
    fn test_debug_report_never_carries_secrets() {
        let report = DebugReport::collect(&ServiceConfig::default());

        for key in report.env.keys() {
            assert!(REPORTED_ENV_VARS.contains(&key.as_str()));
        }
        assert!(!report.env.contains_key("API_KEY"));
        assert!(!report.env.contains_key("GOOGLE_PASSWORD"));
    }

    #[test]
    fn test_debug_report_serializes_to_json() {
        let report = DebugReport::collect(&ServiceConfig::default());
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("platform").is_some());
        assert!(json.get("chrome_candidates").is_some());
    }
}
