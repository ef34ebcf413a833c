//! Raw Stripe REST API response shapes.
//!
//! Reduced to the fields the adapter reads; Stripe sends far more.

use serde::Deserialize;

/// Customer as the REST API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Stripe Subscription object as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: String,
    pub status: String,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    pub current_period_end: Option<i64>,
}

/// List envelope for `GET /v1/subscriptions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscriptionList {
    #[serde(default)]
    pub data: Vec<StripeSubscription>,
}

/// Checkout session as the REST API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Stripe billing portal session object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePortalSession {
    pub id: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_deserializes_with_defaults() {
        let json = r#"{
            "id": "sub_123",
            "customer": "cus_456",
            "status": "active",
            "current_period_end": 1706745600
        }"#;

        let sub: StripeSubscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.id, "sub_123");
        assert!(!sub.cancel_at_period_end);
    }

    #[test]
    fn subscription_list_tolerates_empty_data() {
        let list: StripeSubscriptionList = serde_json::from_str(r#"{"object":"list"}"#).unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn checkout_session_url_is_optional() {
        let session: StripeCheckoutSession =
            serde_json::from_str(r#"{"id":"cs_123"}"#).unwrap();
        assert!(session.url.is_none());
    }
}
