//! PostgreSQL adapter implementations.
//!
//! sqlx-backed implementations of the persistence ports. Every reconciling
//! mutation is a single `UPDATE ... WHERE <key>` statement, so concurrent
//! deliveries resolve last-write-wins per field at the database without
//! application-level locking.

mod order_store;
mod webhook_event_repository;

pub use order_store::PostgresOrderStore;
pub use webhook_event_repository::PostgresWebhookEventRepository;
