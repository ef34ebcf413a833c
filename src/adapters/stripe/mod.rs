//! Stripe adapter module.
//!
//! REST integration with the Stripe API plus a configurable mock provider
//! for tests. Webhook signature verification lives in the domain layer
//! (`domain::billing`), not here: the webhook endpoint verifies deliveries
//! before any adapter is involved.

mod api_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use api_types::{
    StripeCheckoutSession, StripeCustomer, StripePortalSession, StripeSubscription,
    StripeSubscriptionList,
};
pub use mock_payment_provider::{CancelCall, MockPaymentProvider};
pub use stripe_adapter::StripeAdapter;
