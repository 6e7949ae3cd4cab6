pub mod config;
pub mod session;

pub use config::{Credentials, ServiceConfig};
pub use session::{AuthSession, Cookie, SessionData};
