use crate::Result;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use serde_json::json;

/// User agent presented to the target site. Matches a plain desktop Chrome.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Script injected before any page script runs. Scrubs the markers that
/// provider login pages check to reject automated browsers.
const EVASION_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => false });
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', {
    get: () => [{
        0: {
            type: 'application/pdf',
            suffixes: 'pdf',
            description: 'Portable Document Format',
            enabledPlugin: true,
        },
        name: 'Chrome PDF Plugin',
        description: 'Portable Document Format',
        filename: 'internal-pdf-viewer',
        length: 1,
    }],
});

delete window.__puppeteer;
delete window.__playwright;
delete window.__selenium;
delete document.__selenium_unwrapped;
delete document.__webdriver_evaluate;
delete document.__driver_evaluate;
"#;

/// Apply stealth hardening to a fresh page: realistic user agent, browser-like
/// request headers, and the webdriver-evasion script.
pub async fn harden(page: &Page) -> Result<()> {
    page.execute(SetUserAgentOverrideParams::new(USER_AGENT))
        .await?;

    let headers = Headers::new(json!({
        "Accept-Language": "en-US,en;q=0.9",
        "Accept": "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        "sec-ch-ua": "\"Google Chrome\";v=\"125\", \" Not;A Brand\";v=\"99\"",
        "sec-ch-ua-mobile": "?0",
        "sec-ch-ua-platform": "\"Windows\"",
        "Upgrade-Insecure-Requests": "1",
    }));
    page.execute(SetExtraHttpHeadersParams::new(headers)).await?;

    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(EVASION_SCRIPT))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evasion_script_scrubs_webdriver_flag() {
        assert!(EVASION_SCRIPT.contains("'webdriver'"));
        assert!(EVASION_SCRIPT.contains("__puppeteer"));
    }

    #[test]
    fn test_user_agent_looks_like_desktop_chrome() {
        assert!(USER_AGENT.contains("Chrome/"));
        assert!(!USER_AGENT.to_lowercase().contains("headless"));
    }
}
