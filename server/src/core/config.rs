//! Server configuration
//!
//! Every knob can be overridden by an environment variable:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/dinein | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | LOG_DIR | (unset) | Daily-rolled log file directory; stdout when unset |
//! | CURRENCY | eur | ISO currency code for card intents |
//! | CART_TTL_MINUTES | 120 | Idle cart expiry window |
//! | CART_SWEEP_INTERVAL_SECS | 300 | Expiry sweep period |
//! | CARD_PROVIDER_URL | http://localhost:4242 | Card provider base URL |
//! | CARD_PROVIDER_SECRET | (empty) | Card provider API key |
//! | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown budget |

#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Log files land here when set; stdout otherwise
    pub log_dir: Option<String>,
    /// ISO currency code handed to the card provider
    pub currency: String,
    pub cart_ttl_minutes: i64,
    pub cart_sweep_interval_secs: u64,
    pub card_provider_url: String,
    pub card_provider_secret: String,
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dinein".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "eur".into()),
            cart_ttl_minutes: std::env::var("CART_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(120),
            cart_sweep_interval_secs: std::env::var("CART_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            card_provider_url: std::env::var("CARD_PROVIDER_URL")
                .unwrap_or_else(|_| "http://localhost:4242".into()),
            card_provider_secret: std::env::var("CARD_PROVIDER_SECRET").unwrap_or_default(),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override the paths and port, keeping everything else env-driven.
    /// Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
