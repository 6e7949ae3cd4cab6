//! Chrome automation for the Suno Google-login flow: binary discovery,
//! per-request browser sessions, the selector-strategy engine, the login
//! procedure itself, session verification, and debug introspection.

mod chrome_finder;
mod debug;
mod error;
mod oauth;
mod profile;
pub mod selectors;
mod session;
mod stealth;
mod verify;

pub use chrome_finder::ChromeFinder;
pub use debug::{browser_self_check, DebugReport, SelfCheckReport};
pub use error::{Error, Result};
pub use oauth::authenticate;
pub use profile::ScratchProfile;
pub use selectors::{LoginStep, Strategy};
pub use session::BrowserSession;
pub use verify::verify_session;
