pub mod config;
pub mod paths;
pub mod session;

pub use config::{Config, DisplayConfig, ServiceConfig};
pub use paths::PathManager;
pub use session::{SessionProvider, SessionStore};
