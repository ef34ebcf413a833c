//! Order domain module.
//!
//! An order records a customer's contact details together with the state of
//! their payment-provider subscription. Orders are created at checkout
//! initiation and mutated exclusively by webhook reconciliation.
//!
//! # Module Structure
//!
//! - `aggregate` - Order aggregate entity
//! - `status` - SubscriptionStatus values reported by the provider

mod aggregate;
mod status;

pub use aggregate::{ContactDetails, Order, ShippingAddress, SubscriptionProjection};
pub use status::SubscriptionStatus;
