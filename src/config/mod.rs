//! Typed configuration loaded from environment variables
//!
//! Each subsystem has its own config struct with a `from_env()` constructor.
//! `.env` files are loaded once at startup in `bootstrap::register()`.

mod database;
mod llm;
mod server;

pub use database::{DatabaseConfig, DatabaseConfigBuilder};
pub use llm::LlmConfig;
pub use server::ServerConfig;

/// Get an environment variable with a default value
///
/// # Example
/// ```ignore
/// let port: u16 = env("SERVER_PORT", 8080);
/// let host = env("SERVER_HOST", "127.0.0.1".to_string());
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get an optional environment variable
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
