pub mod config;
pub mod logging;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, LogConfig, ServerConfig};
