//! Configuration error types.

use thiserror::Error;

/// Failure while assembling configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Read(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A configuration value that parsed but cannot be used.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} is required but not set")]
    MissingRequired(&'static str),

    #[error("server port must be nonzero")]
    InvalidPort,

    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("database URL must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("database pool bounds are inverted (min > max)")]
    InvalidPoolSize,

    #[error("database pool larger than 100 connections")]
    PoolSizeTooLarge,

    #[error("Stripe secret keys start with sk_")]
    InvalidStripeKey,

    #[error("Stripe webhook signing secrets start with whsec_")]
    InvalidStripeWebhookSecret,

    #[error("Stripe price ids start with price_")]
    InvalidStripePriceId,
}
