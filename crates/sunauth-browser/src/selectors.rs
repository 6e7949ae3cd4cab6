use crate::{Error, Result};
use chromiumoxide::{Element, Page};
use std::fmt;
use std::time::{Duration, Instant};

/// How often the strategy list is re-swept while waiting for a control.
const PROBE_INTERVAL: Duration = Duration::from_millis(250);

/// The interactive steps of the login flow, in the order they are attempted.
/// Each step names the control it is looking for; the name surfaces in
/// `Error::ControlNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    SignIn,
    AuthDialog,
    GoogleProvider,
    AccountChooser,
    UseAnotherAccount,
    EmailInput,
    PasswordInput,
}

impl fmt::Display for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginStep::SignIn => "sign-in control",
            LoginStep::AuthDialog => "auth dialog",
            LoginStep::GoogleProvider => "Google provider button",
            LoginStep::AccountChooser => "account chooser entry",
            LoginStep::UseAnotherAccount => "use-another-account control",
            LoginStep::EmailInput => "email input",
            LoginStep::PasswordInput => "password input",
        };
        f.write_str(name)
    }
}

/// One way of locating a control. Strategies for a step are tried in order
/// until one matches; the chains are data, not nested try/catch.
#[derive(Debug, Clone)]
pub enum Strategy {
    Css(String),
    Xpath(String),
}

impl Strategy {
    pub fn css(selector: impl Into<String>) -> Self {
        Strategy::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Strategy::Xpath(expression.into())
    }

    async fn locate(&self, page: &Page) -> Option<Element> {
        match self {
            Strategy::Css(selector) => page.find_element(selector.clone()).await.ok(),
            Strategy::Xpath(expression) => page.find_xpath(expression.clone()).await.ok(),
        }
    }
}

/// Ordered fallback chain for a fixed step. `AccountChooser` entries depend
/// on the target email; use [`account_entry_strategies`] for those.
pub fn strategies_for(step: LoginStep) -> Vec<Strategy> {
    match step {
        LoginStep::SignIn => vec![
            Strategy::css("button[data-testid='sign-in-button']"),
            Strategy::css("a[href*='/login']"),
            Strategy::xpath("//button[contains(., 'Sign In')]"),
            Strategy::xpath("//a[contains(., 'Sign In')]"),
        ],
        LoginStep::AuthDialog => vec![
            Strategy::css("div[role='dialog']"),
            Strategy::css(".cl-modalContent"),
            Strategy::css("div[class*='sign-in']"),
        ],
        LoginStep::GoogleProvider => vec![
            Strategy::css("button[data-provider='google']"),
            Strategy::css("button.cl-socialButtonsIconButton__google"),
            Strategy::xpath("//button[contains(., 'Continue with Google')]"),
            Strategy::xpath("//button[contains(., 'Google')]"),
        ],
        LoginStep::AccountChooser => vec![
            // Generic chooser detection; email-specific entries come from
            // account_entry_strategies.
            Strategy::css("ul[class*='OVnw0d']"),
            Strategy::xpath("//div[@data-authuser]"),
        ],
        LoginStep::UseAnotherAccount => vec![
            Strategy::css("#identifierLink"),
            Strategy::xpath("//div[contains(., 'Use another account')]"),
            Strategy::xpath("//li//div[contains(., 'another account')]"),
        ],
        LoginStep::EmailInput => vec![
            Strategy::css("input[type='email']"),
            Strategy::css("#identifierId"),
            Strategy::css("input[name='identifier']"),
        ],
        LoginStep::PasswordInput => vec![
            Strategy::css("input[type='password']"),
            Strategy::css("input[name='Passwd']"),
            Strategy::css("#password input"),
        ],
    }
}

/// Chooser entries for a specific account on Google's account-picker page.
pub fn account_entry_strategies(email: &str) -> Vec<Strategy> {
    vec![
        Strategy::xpath(format!("//div[@data-identifier='{}']", email)),
        Strategy::xpath(format!("//li//div[contains(., '{}')]", email)),
    ]
}

/// Elements on the target site that indicate a signed-in state.
pub fn login_indicator_strategies() -> Vec<Strategy> {
    vec![
        Strategy::css("div[data-testid='user-menu']"),
        Strategy::css("button[aria-label='Account settings']"),
        Strategy::css("a[href='/account']"),
        Strategy::css("div[class*='avatar']"),
        Strategy::xpath("//button[contains(., 'New Song')]"),
    ]
}

/// Sweep a strategy list until one matches or the budget runs out.
pub async fn probe(page: &Page, strategies: &[Strategy], timeout: Duration) -> Option<Element> {
    let deadline = Instant::now() + timeout;

    loop {
        for strategy in strategies {
            if let Some(element) = strategy.locate(page).await {
                tracing::debug!("control matched via {:?}", strategy);
                return Some(element);
            }
        }

        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(PROBE_INTERVAL).await;
    }
}

/// Probe the fixed chain for a step, failing with a control-not-found error
/// that names the step when every strategy is exhausted.
pub async fn resolve(page: &Page, step: LoginStep, timeout: Duration) -> Result<Element> {
    probe(page, &strategies_for(step), timeout)
        .await
        .ok_or(Error::ControlNotFound { step })
}
