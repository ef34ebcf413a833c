//! Order aggregate entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrderId;

use super::SubscriptionStatus;

/// Customer contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Shipping address captured at checkout.
///
/// Carried for fulfillment only; none of these fields participate in
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
}

/// An order: one customer's subscription purchase and fulfillment details.
///
/// Created with `status = pending` and no subscription ID when the customer
/// initiates checkout. From then on it is mutated exclusively by webhook
/// reconciliation, via set-style updates keyed on the customer ID (first
/// creation event) or the subscription ID (everything after). Orders are
/// never deleted; cancellation flips the status to a terminal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Internal record ID, immutable.
    pub id: OrderId,

    /// Payment-provider customer ID. Opaque, stable for the customer's lifetime.
    pub customer_id: String,

    /// Provider subscription ID; populated by the first creation event.
    pub subscription_id: Option<String>,

    /// Current subscription status (last-write-wins).
    pub status: SubscriptionStatus,

    /// Denormalized projection of `status == active`, except where an
    /// invoice event has overridden it directly.
    pub paid: bool,

    pub contact: ContactDetails,
    pub shipping: ShippingAddress,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The read-model projection served by the status query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionProjection {
    pub subscription_id: Option<String>,
    pub status: SubscriptionStatus,
    pub paid: bool,
}

impl Order {
    /// Creates a new pending order at checkout initiation.
    pub fn pending_checkout(
        customer_id: impl Into<String>,
        contact: ContactDetails,
        shipping: ShippingAddress,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            customer_id: customer_id.into(),
            subscription_id: None,
            status: SubscriptionStatus::Pending,
            paid: false,
            contact,
            shipping,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assigns the subscription created by the provider for this order's
    /// customer, along with its initial status.
    pub fn attach_subscription(
        &mut self,
        subscription_id: impl Into<String>,
        status: SubscriptionStatus,
    ) {
        self.subscription_id = Some(subscription_id.into());
        self.set_status(status);
    }

    /// Applies a subscription status, keeping the `paid` projection in sync.
    pub fn set_status(&mut self, status: SubscriptionStatus) {
        self.paid = status.is_paid();
        self.status = status;
        self.touch();
    }

    /// Overrides the `paid` flag without touching the status.
    ///
    /// Invoice events are authoritative for payment outcome but never for
    /// lifecycle state.
    pub fn set_paid(&mut self, paid: bool) {
        self.paid = paid;
        self.touch();
    }

    /// The projection served by the status query endpoint.
    pub fn projection(&self) -> SubscriptionProjection {
        SubscriptionProjection {
            subscription_id: self.subscription_id.clone(),
            status: self.status.clone(),
            paid: self.paid,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_contact() -> ContactDetails {
        ContactDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "+1 555 0100".to_string(),
        }
    }

    fn test_shipping() -> ShippingAddress {
        ShippingAddress {
            address: "1 Analytical Way".to_string(),
            zip_code: "94000".to_string(),
            state: "CA".to_string(),
            country: "US".to_string(),
        }
    }

    fn pending_order() -> Order {
        Order::pending_checkout("cus_123", test_contact(), test_shipping())
    }

    #[test]
    fn pending_checkout_starts_unpaid_without_subscription() {
        let order = pending_order();

        assert_eq!(order.customer_id, "cus_123");
        assert!(order.subscription_id.is_none());
        assert_eq!(order.status, SubscriptionStatus::Pending);
        assert!(!order.paid);
    }

    #[test]
    fn attach_subscription_sets_id_status_and_paid() {
        let mut order = pending_order();

        order.attach_subscription("sub_456", SubscriptionStatus::Active);

        assert_eq!(order.subscription_id.as_deref(), Some("sub_456"));
        assert_eq!(order.status, SubscriptionStatus::Active);
        assert!(order.paid);
    }

    #[test]
    fn attach_with_inactive_status_stays_unpaid() {
        let mut order = pending_order();

        order.attach_subscription("sub_456", SubscriptionStatus::Incomplete);

        assert!(!order.paid);
    }

    #[test]
    fn set_status_keeps_paid_projection_in_sync() {
        let mut order = pending_order();
        order.attach_subscription("sub_456", SubscriptionStatus::Active);

        order.set_status(SubscriptionStatus::PastDue);
        assert!(!order.paid);

        order.set_status(SubscriptionStatus::Active);
        assert!(order.paid);
    }

    #[test]
    fn set_paid_does_not_change_status() {
        let mut order = pending_order();
        order.attach_subscription("sub_456", SubscriptionStatus::Canceled);

        order.set_paid(true);

        assert_eq!(order.status, SubscriptionStatus::Canceled);
        assert!(order.paid);
    }

    #[test]
    fn projection_mirrors_order_state() {
        let mut order = pending_order();
        order.attach_subscription("sub_456", SubscriptionStatus::Active);

        let projection = order.projection();

        assert_eq!(projection.subscription_id.as_deref(), Some("sub_456"));
        assert_eq!(projection.status, SubscriptionStatus::Active);
        assert!(projection.paid);
    }

    proptest! {
        /// Applying the same status twice leaves the order exactly where
        /// one application does, and `paid` always matches the status.
        #[test]
        fn status_updates_are_idempotent(raw in "[a-z_]{1,20}") {
            let status = SubscriptionStatus::parse(&raw);

            let mut once = pending_order();
            once.attach_subscription("sub_p", status.clone());

            let mut twice = once.clone();
            twice.set_status(status.clone());

            prop_assert_eq!(&once.status, &twice.status);
            prop_assert_eq!(once.paid, twice.paid);
            prop_assert_eq!(once.paid, status.is_paid());
        }
    }
}
