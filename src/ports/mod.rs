//! Ports - async trait per external collaborator.
//!
//! The application layer only ever sees these contracts; the adapters
//! supply the technology behind them.
//!
//! - `OrderStore` - Order persistence with idempotent set-style updates
//! - `PaymentProvider` - Payment gateway integration (Stripe)
//! - `WebhookEventRepository` - Processed-webhook audit and duplicate suppression

mod order_store;
mod payment_provider;
mod webhook_event_repository;

pub use order_store::{OrderStore, UpdateOutcome};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentErrorCode, PaymentProvider, PortalSession, ProviderSubscription,
};
pub use webhook_event_repository::{
    ProcessingResult, SaveResult, WebhookEventRecord, WebhookEventRepository,
};
