//! CreatePortalSessionHandler - Billing portal session creation.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{PaymentProvider, PortalSession};

/// Command to create a billing-portal session for a customer.
#[derive(Debug, Clone)]
pub struct CreatePortalSessionCommand {
    pub customer_id: String,
    pub return_url: String,
}

/// Handler for billing-portal session creation.
///
/// A pure pass-through: unknown customers are the provider's problem to
/// report, and provider errors surface as external-service failures.
pub struct CreatePortalSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePortalSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        cmd: CreatePortalSessionCommand,
    ) -> Result<PortalSession, DomainError> {
        if cmd.customer_id.is_empty() {
            return Err(DomainError::validation("customer_id is required"));
        }

        let session = self
            .payment_provider
            .create_portal_session(&cmd.customer_id, &cmd.return_url)
            .await?;

        tracing::info!(customer_id = %cmd.customer_id, "Created billing portal session");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn returns_portal_url_for_customer() {
        let handler = CreatePortalSessionHandler::new(Arc::new(MockPaymentProvider::new()));

        let session = handler
            .handle(CreatePortalSessionCommand {
                customer_id: "cus_1".to_string(),
                return_url: "https://shop.example.com/account".to_string(),
            })
            .await
            .unwrap();

        assert!(session.url.contains("cus_1"));
    }

    #[tokio::test]
    async fn empty_customer_id_is_a_validation_error() {
        let handler = CreatePortalSessionHandler::new(Arc::new(MockPaymentProvider::new()));

        let err = handler
            .handle(CreatePortalSessionCommand {
                customer_id: String::new(),
                return_url: "https://shop.example.com/account".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_external_service_error() {
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_fail(true);
        let handler = CreatePortalSessionHandler::new(provider);

        let err = handler
            .handle(CreatePortalSessionCommand {
                customer_id: "cus_1".to_string(),
                return_url: "https://shop.example.com/account".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }
}
