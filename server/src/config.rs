//! Server configuration.
//!
//! The bind address is fixed; only the store connection target can be
//! overridden, through `DATABASE_URL`.

use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::with_database_url(std::env::var("DATABASE_URL").ok())
    }

    /// Defaults, with the store connection target replaced when given.
    pub fn with_database_url(database_url: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = database_url {
            config.database_url = url;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn database_url_overrides_default() {
        let config = ServerConfig::with_database_url(Some("sqlite::memory:".to_string()));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8000);

        let config = ServerConfig::with_database_url(None);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn from_env_reads_database_url() {
        std::env::set_var("DATABASE_URL", "sqlite://from-env.db");
        let config = ServerConfig::from_env();
        std::env::remove_var("DATABASE_URL");
        assert_eq!(config.database_url, "sqlite://from-env.db");
    }
}
