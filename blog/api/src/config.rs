use std::net::SocketAddr;

use anyhow::Result;
use common::config::{DatabaseConfig, LoggingConfig};

#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the blog service
pub struct AppConfig {
    /// The path to the config file
    pub config_file: Option<String>,

    /// The logging config
    pub logging: LoggingConfig,

    /// API Config
    pub api: ApiConfig,

    /// Database Config
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,

    /// Number of posts on a listing page
    pub page_size: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
            page_size: 10,
        }
    }
}

impl AppConfig {
    pub fn parse() -> Result<Self> {
        let config_file = common::config::env_override::<String>("BLOG_CONFIG_FILE")?;

        let (mut config, config_file) =
            common::config::parse::<Self>(config_file.as_deref(), "config.toml")?;

        config.config_file = config_file;

        if let Some(level) = common::config::env_override("BLOG_LOGGING_LEVEL")? {
            config.logging.level = level;
        }

        if let Some(mode) = common::config::env_override("BLOG_LOGGING_MODE")? {
            config.logging.mode = mode;
        }

        if let Some(bind_address) = common::config::env_override("BLOG_API_BIND_ADDRESS")? {
            config.api.bind_address = bind_address;
        }

        if let Some(page_size) = common::config::env_override("BLOG_API_PAGE_SIZE")? {
            config.api.page_size = page_size;
        }

        if let Some(uri) = common::config::env_override("BLOG_DATABASE_URI")? {
            config.database.uri = uri;
        }

        // The paginator divides by the page size.
        if config.api.page_size < 1 {
            anyhow::bail!("api.page_size must be at least 1");
        }

        Ok(config)
    }
}
