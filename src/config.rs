use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub history_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("TELEMON_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            history_size: env::var("TELEMON_HISTORY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
            log_level: env::var("TELEMON_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
