//! Adapters - Implementations of the ports.
//!
//! Each submodule adapts one external technology to the port contracts:
//!
//! - `http` - axum routers, handlers, and DTOs
//! - `memory` - in-memory stores for tests and local development
//! - `postgres` - sqlx/PostgreSQL persistence
//! - `stripe` - Stripe REST client and a configurable mock provider

pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
