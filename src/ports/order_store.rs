//! OrderStore port - Interface for order persistence.
//!
//! Every mutation after order creation is a set-style update keyed by a
//! stable matcher (customer ID for subscription attachment, subscription
//! ID afterwards), never an increment or append. Applying the same event
//! twice therefore leaves the store in the same state as applying it once,
//! and two deliveries racing on the same order resolve last-write-wins
//! without locking.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::order::{Order, SubscriptionStatus};

/// Result of a keyed set-style update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A matching order was updated.
    Applied,
    /// No order matched the key. Not an error; the caller decides whether
    /// to log or ignore.
    NoMatchingOrder,
}

/// Port for order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order (created at checkout initiation, status pending).
    async fn create(&self, order: &Order) -> Result<(), DomainError>;

    /// Find the order for a payment-provider customer ID.
    async fn find_by_customer_id(&self, customer_id: &str)
        -> Result<Option<Order>, DomainError>;

    /// Find the order holding a subscription ID.
    async fn find_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Order>, DomainError>;

    /// Assign a subscription to the order matched by customer ID, setting
    /// subscription ID, status, and the derived paid projection in one
    /// atomic operation.
    async fn attach_subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
        status: &SubscriptionStatus,
    ) -> Result<UpdateOutcome, DomainError>;

    /// Set status (and the derived paid projection) on the order matched
    /// by subscription ID.
    async fn update_subscription_status(
        &self,
        subscription_id: &str,
        status: &SubscriptionStatus,
    ) -> Result<UpdateOutcome, DomainError>;

    /// Set only the paid flag on the order matched by subscription ID.
    /// Status is left untouched; invoice events are not authoritative for
    /// lifecycle state.
    async fn set_paid(
        &self,
        subscription_id: &str,
        paid: bool,
    ) -> Result<UpdateOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn OrderStore) {}
    }

    #[test]
    fn update_outcome_equality() {
        assert_eq!(UpdateOutcome::Applied, UpdateOutcome::Applied);
        assert_ne!(UpdateOutcome::Applied, UpdateOutcome::NoMatchingOrder);
    }
}
