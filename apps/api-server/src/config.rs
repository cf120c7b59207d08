//! Server configuration.

use std::env;

/// Origins allowed by default when CORS is restricted: common local
/// frontend dev server ports.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8080",
];

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// Whether any origin may call the API.
    pub allow_all_origins: bool,
    /// Origins allowed when `allow_all_origins` is off.
    pub allowed_origins: Vec<String>,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set in environment"))?;

        let allow_all_origins = env::var("ROSTER_ALLOW_ALL_ORIGINS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(true);

        let allowed_origins = env::var("ROSTER_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                DEFAULT_CORS_ORIGINS
                    .iter()
                    .map(|origin| (*origin).to_string())
                    .collect()
            });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            database_url,
            allow_all_origins,
            allowed_origins,
            log_level: env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
