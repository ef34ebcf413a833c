//! Shopfront - Subscription commerce backend
//!
//! Checkout initiation against Stripe, webhook-driven reconciliation of
//! subscription state into order records, and the status read path the
//! storefront consumes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
