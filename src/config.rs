use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Uploads larger than this are rejected (3 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 3 * 1024 * 1024;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
    /// Latency of the simulated dimension derivation step
    pub probe_delay_ms: u64,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{DEFAULT_PORT}"),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            probe_delay_ms: 100,
            test_mode: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            let port = std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);
            format!("0.0.0.0:{port}")
        });

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_upload_size);

        let probe_delay_ms = std::env::var("PROBE_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.probe_delay_ms);

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            bind_address,
            max_upload_size,
            probe_delay_ms,
            test_mode,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.probe_delay_ms > 10_000 {
            tracing::warn!(
                "PROBE_DELAY_MS is {}ms. Every upload will wait this long before completing.",
                self.probe_delay_ms
            );
        }

        Ok(())
    }

    pub fn probe_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.probe_delay_ms)
    }
}
