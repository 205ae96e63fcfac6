//! Bootstrap: configuration loading, tracing setup and session wiring.

pub mod config;
pub mod session;
pub mod tracing;

pub use config::{default_config_path, load_config, load_or_default};
pub use session::AppSession;
pub use self::tracing::init_tracing_subscriber;
