use crate::config::env;

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (`postgres://...` or `sqlite://...`)
    pub url: String,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Minimum pool connections
    pub min_connections: u32,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Enable sqlx statement logging
    pub logging: bool,
}

impl DatabaseConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            url: env("DATABASE_URL", "sqlite://./taskdeck.db".to_string()),
            max_connections: env("DB_MAX_CONNECTIONS", 10),
            min_connections: env("DB_MIN_CONNECTIONS", 1),
            connect_timeout: env("DB_CONNECT_TIMEOUT", 30),
            logging: env("DB_LOGGING", false),
        }
    }

    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::default()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Builder for DatabaseConfig, mainly used by tests to point at an
/// in-memory sqlite database
#[derive(Default)]
pub struct DatabaseConfigBuilder {
    url: Option<String>,
    max_connections: Option<u32>,
    min_connections: Option<u32>,
    connect_timeout: Option<u64>,
    logging: Option<bool>,
}

impl DatabaseConfigBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = Some(n);
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = Some(n);
        self
    }

    pub fn connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout = Some(secs);
        self
    }

    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = Some(enabled);
        self
    }

    pub fn build(self) -> DatabaseConfig {
        let default = DatabaseConfig::from_env();
        DatabaseConfig {
            url: self.url.unwrap_or(default.url),
            max_connections: self.max_connections.unwrap_or(default.max_connections),
            min_connections: self.min_connections.unwrap_or(default.min_connections),
            connect_timeout: self.connect_timeout.unwrap_or(default.connect_timeout),
            logging: self.logging.unwrap_or(default.logging),
        }
    }
}
