//! Server configuration
//!
//! # Environment variables
//!
//! Every setting can be overridden through the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DATA_DIR | /var/lib/canteen | Directory holding the embedded database |
//! | BUSINESS_TIMEZONE | Asia/Jerusalem | Timezone for calendar-day policy windows |
//! | SERVICE_FEE | 2.0 | Fixed per-order surcharge, currency units |
//! | ENVIRONMENT | development | development \| staging \| production |
//!
//! # Example
//!
//! ```ignore
//! DATA_DIR=/data/canteen SERVICE_FEE=2.5 cargo run
//! ```

use chrono_tz::Tz;

/// Default per-order service fee in currency units
pub const DEFAULT_SERVICE_FEE: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the embedded database file
    pub data_dir: String,
    /// Business timezone; daily/monthly policy windows are calendar days here
    pub timezone: Tz,
    /// Fixed per-order surcharge added to every total
    pub service_fee: f64,
    /// Running environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/canteen".into()),
            timezone: std::env::var("BUSINESS_TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Asia::Jerusalem),
            service_fee: std::env::var("SERVICE_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVICE_FEE),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the data directory, keeping everything else from the env
    ///
    /// Commonly used in tests.
    pub fn with_overrides(data_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
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
