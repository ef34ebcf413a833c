//! Request/response DTOs for billing endpoints.

use serde::{Deserialize, Serialize};

use crate::ports::ProviderSubscription;

/// Minimal acknowledgment body for webhook deliveries.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /api/billing/portal request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalSessionRequest {
    pub customer_id: String,
    pub return_url: String,
}

/// POST /api/billing/portal response body.
#[derive(Debug, Serialize)]
pub struct PortalSessionResponse {
    pub portal_url: String,
}

/// GET /api/subscription query parameters.
#[derive(Debug, Deserialize)]
pub struct SubscriptionDetailParams {
    pub customer_id: String,
}

/// GET /api/subscription response body.
///
/// `subscription: null` is the valid "provider has none" answer.
#[derive(Debug, Serialize)]
pub struct SubscriptionDetailResponse {
    pub subscription: Option<SubscriptionDetail>,
}

/// Provider-side subscription view.
#[derive(Debug, Serialize)]
pub struct SubscriptionDetail {
    pub id: String,
    pub status: String,
    pub cancel_at_period_end: bool,
    pub current_period_end: Option<i64>,
}

impl From<ProviderSubscription> for SubscriptionDetail {
    fn from(sub: ProviderSubscription) -> Self {
        Self {
            id: sub.id,
            status: sub.status.to_string(),
            cancel_at_period_end: sub.cancel_at_period_end,
            current_period_end: sub.current_period_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::SubscriptionStatus;

    #[test]
    fn ack_serializes_to_received_true() {
        let json = serde_json::to_string(&WebhookAck { received: true }).unwrap();
        assert_eq!(json, r#"{"received":true}"#);
    }

    #[test]
    fn detail_response_serializes_null_subscription() {
        let json = serde_json::to_value(SubscriptionDetailResponse { subscription: None }).unwrap();
        assert!(json["subscription"].is_null());
    }

    #[test]
    fn detail_converts_from_provider_subscription() {
        let detail = SubscriptionDetail::from(ProviderSubscription {
            id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            status: SubscriptionStatus::Trialing,
            cancel_at_period_end: true,
            current_period_end: Some(1706745600),
        });

        assert_eq!(detail.status, "trialing");
        assert!(detail.cancel_at_period_end);
    }
}
