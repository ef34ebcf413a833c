//! GetSubscriptionStatusHandler - Local status projection read path.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::order::SubscriptionProjection;
use crate::ports::OrderStore;

/// Query for the persisted subscription projection of a customer.
#[derive(Debug, Clone)]
pub struct GetSubscriptionStatusQuery {
    pub customer_id: String,
}

pub struct GetSubscriptionStatusHandler {
    order_store: Arc<dyn OrderStore>,
}

impl GetSubscriptionStatusHandler {
    pub fn new(order_store: Arc<dyn OrderStore>) -> Self {
        Self { order_store }
    }

    /// A missing order is a not-found error, distinguished from a found
    /// order that happens to be unpaid.
    pub async fn handle(
        &self,
        query: GetSubscriptionStatusQuery,
    ) -> Result<SubscriptionProjection, DomainError> {
        if query.customer_id.is_empty() {
            return Err(DomainError::validation("customer_id is required"));
        }

        let order = self
            .order_store
            .find_by_customer_id(&query.customer_id)
            .await?
            .ok_or_else(|| {
                DomainError::order_not_found(format!("customer {}", query.customer_id))
            })?;

        Ok(order.projection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::order::{ContactDetails, Order, ShippingAddress, SubscriptionStatus};

    fn order_for(customer_id: &str) -> Order {
        Order::pending_checkout(
            customer_id,
            ContactDetails {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone_number: "+1 555 0100".to_string(),
            },
            ShippingAddress {
                address: "1 Analytical Way".to_string(),
                zip_code: "94000".to_string(),
                state: "CA".to_string(),
                country: "US".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn returns_projection_for_existing_order() {
        let store = Arc::new(InMemoryOrderStore::with_orders(vec![order_for("cus_1")]));
        store
            .attach_subscription("cus_1", "sub_1", &SubscriptionStatus::Active)
            .await
            .unwrap();
        let handler = GetSubscriptionStatusHandler::new(store);

        let projection = handler
            .handle(GetSubscriptionStatusQuery {
                customer_id: "cus_1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(projection.subscription_id.as_deref(), Some("sub_1"));
        assert_eq!(projection.status, SubscriptionStatus::Active);
        assert!(projection.paid);
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let handler = GetSubscriptionStatusHandler::new(Arc::new(InMemoryOrderStore::new()));

        let err = handler
            .handle(GetSubscriptionStatusQuery {
                customer_id: "cus_none".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn pending_order_is_found_but_unpaid() {
        let store = Arc::new(InMemoryOrderStore::with_orders(vec![order_for("cus_1")]));
        let handler = GetSubscriptionStatusHandler::new(store);

        let projection = handler
            .handle(GetSubscriptionStatusQuery {
                customer_id: "cus_1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(projection.status, SubscriptionStatus::Pending);
        assert!(!projection.paid);
        assert!(projection.subscription_id.is_none());
    }
}
