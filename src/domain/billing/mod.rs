//! Billing domain module.
//!
//! Everything needed to turn a raw Stripe webhook delivery into an order
//! mutation: the event envelope, per-kind payload decoding, signature
//! verification, and the webhook error taxonomy.
//!
//! # Module Structure
//!
//! - `stripe_event` - Event envelope and typed payloads
//! - `webhook_verifier` - Stripe-Signature verification (HMAC-SHA256)
//! - `webhook_errors` - Error taxonomy with retryability semantics

mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use stripe_event::{
    EventPayload, InvoiceObject, StripeEvent, StripeEventData, StripeEventType, SubscriptionObject,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, WebhookVerifier};

#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
