use crate::profile::ScratchProfile;
use crate::{ChromeFinder, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use sunauth_core::{Cookie, ServiceConfig};

/// One isolated browser instance with a single page, scoped to one request.
///
/// The CDP handler task is spawned at launch and must run for any page
/// command to complete. `close` tears everything down and is idempotent, so
/// every exit path of a flow can call it without double-release.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
    // Held for its Drop: the profile directory is removed with the session.
    _profile: ScratchProfile,
    closed: bool,
}

impl BrowserSession {
    /// Launch Chrome with a scratch profile and open one blank page.
    pub async fn launch(config: &ServiceConfig) -> Result<Self> {
        let chrome_binary = ChromeFinder::new(config.chrome_path.clone()).find()?;
        let profile = ScratchProfile::create()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&chrome_binary)
            .user_data_dir(profile.path())
            .no_sandbox()
            .window_size(1280, 800)
            .args(vec![
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",
                "--disable-accelerated-2d-canvas",
                "--disable-extensions",
                "--disable-gpu",
            ]);

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(Error::Browser)?;

        tracing::info!(chrome = %chrome_binary.display(), "launching browser");
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        // The handler drives the CDP websocket; without it every page command
        // stalls. Individual event errors are logged and skipped.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler_task,
            _profile: profile,
            closed: false,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Cookies of the current browser session, collected verbatim.
    pub async fn cookies(&self) -> Result<Vec<Cookie>> {
        let cookies = self.page.get_cookies().await?;
        Ok(cookies
            .into_iter()
            .map(|c| Cookie::new(c.name, c.value, c.domain, c.path))
            .collect())
    }

    /// Seed the session with cookies before navigating.
    pub async fn set_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        let params: Vec<CookieParam> = cookies
            .iter()
            .map(|c| {
                CookieParam::builder()
                    .name(&c.name)
                    .value(&c.value)
                    .domain(&c.domain)
                    .path(&c.path)
                    .build()
                    .map_err(Error::Browser)
            })
            .collect::<Result<_>>()?;

        self.page.set_cookies(params).await?;
        Ok(())
    }

    /// Write a timestamped full-page screenshot into the debug directory.
    /// Best-effort: failures are logged, never propagated.
    pub async fn dump_screenshot(&self, dir: &Path, label: &str) {
        let filename = format!("{}-{}.png", label, chrono::Utc::now().timestamp_millis());
        let path = dir.join(filename);

        let params = ScreenshotParams::builder().full_page(true).build();
        match self.page.save_screenshot(params, &path).await {
            Ok(_) => tracing::info!(path = %path.display(), "saved debug screenshot"),
            Err(e) => tracing::warn!("debug screenshot failed: {}", e),
        }
    }

    /// Write the current cookies as JSON into the debug directory.
    pub async fn dump_cookies(&self, dir: &Path) {
        let cookies = match self.cookies().await {
            Ok(cookies) => cookies,
            Err(e) => {
                tracing::warn!("cookie dump failed: {}", e);
                return;
            }
        };

        let filename = format!("cookies-{}.json", chrono::Utc::now().timestamp_millis());
        let path = dir.join(filename);
        match serde_json::to_vec_pretty(&cookies) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&path, bytes) {
                    tracing::warn!("cookie dump write failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("cookie dump serialization failed: {}", e),
        }
    }

    /// Release the browser. Safe to call more than once; only the first call
    /// does the work.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.browser.close().await {
            tracing::warn!("browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("browser wait failed: {}", e);
        }
        self.handler_task.abort();
        tracing::info!("browser session released");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Last resort if close() was never awaited; the Chrome process exits
        // once its CDP connection goes away.
        self.handler_task.abort();
    }
}
