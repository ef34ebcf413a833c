//! GetSubscriptionDetailHandler - Provider-side subscription lookup.
//!
//! Distinct from the local status projection: this is the provider's own
//! view (cancel-at-period-end flag, period end), fetched live.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{PaymentProvider, ProviderSubscription};

/// Query for the provider-side subscription of a customer.
#[derive(Debug, Clone)]
pub struct GetSubscriptionDetailQuery {
    pub customer_id: String,
}

pub struct GetSubscriptionDetailHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl GetSubscriptionDetailHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    /// Returns `None` when the provider has no subscription for the
    /// customer; that is a valid answer, not an error.
    pub async fn handle(
        &self,
        query: GetSubscriptionDetailQuery,
    ) -> Result<Option<ProviderSubscription>, DomainError> {
        if query.customer_id.is_empty() {
            return Err(DomainError::validation("customer_id is required"));
        }

        let subscription = self
            .payment_provider
            .find_subscription_for_customer(&query.customer_id)
            .await?;

        Ok(subscription)
    }
}
