//! Typed configuration, loaded from the environment.
//!
//! All values come in through variables prefixed with `SHOPFRONT`, with
//! `__` separating nesting levels: `SHOPFRONT__SERVER__PORT` sets
//! `server.port`, `SHOPFRONT__PAYMENT__STRIPE_API_KEY` sets
//! `payment.stripe_api_key`. A `.env` file is honored in development.
//! Each section validates itself after loading, so a bad value fails at
//! startup rather than on the first request that needs it.
//!
//! ```no_run
//! use shopfront::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! config.validate().expect("configuration");
//! ```

mod database;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root configuration for the shopfront backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Read configuration from the process environment (and `.env`, if
    /// present).
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or a value does not
    /// parse into its typed field.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHOPFRONT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section. Called once at startup, before wiring.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Process environment is global; serialize the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const REQUIRED: &[(&str, &str)] = &[
        ("SHOPFRONT__DATABASE__URL", "postgresql://test@localhost/shop"),
        ("SHOPFRONT__PAYMENT__STRIPE_API_KEY", "sk_test_abc"),
        ("SHOPFRONT__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_abc"),
        ("SHOPFRONT__PAYMENT__STRIPE_PRICE_ID", "price_abc"),
    ];

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_LOCK.lock().unwrap();
        for (key, value) in REQUIRED.iter().chain(extra) {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        for (key, _) in REQUIRED.iter().chain(extra) {
            env::remove_var(key);
        }
        result
    }

    #[test]
    fn required_variables_produce_a_valid_config() {
        let config = load_with(&[]).expect("load");
        assert_eq!(config.database.url, "postgresql://test@localhost/shop");
        assert_eq!(config.payment.stripe_price_id, "price_abc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_section_falls_back_to_defaults() {
        let config = load_with(&[]).expect("load");
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(!config.is_production());
    }

    #[test]
    fn nested_overrides_reach_their_section() {
        let config = load_with(&[
            ("SHOPFRONT__SERVER__PORT", "3000"),
            ("SHOPFRONT__SERVER__ENVIRONMENT", "production"),
        ])
        .expect("load");
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
    }
}
