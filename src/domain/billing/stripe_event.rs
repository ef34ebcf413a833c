//! Stripe webhook event types.
//!
//! The event envelope is shared across all event kinds; `data.object` is
//! polymorphic. Rather than reaching into the JSON ad hoc, each recognized
//! kind decodes its object into a concrete shape via [`StripeEvent::payload`],
//! so dispatch works over a tagged union.

use serde::{Deserialize, Serialize};

use super::webhook_errors::WebhookError;

/// Stripe webhook event envelope.
///
/// Only fields relevant to reconciliation are captured; everything else in
/// Stripe's event schema is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Provider event id (`evt_…`), stable across redeliveries.
    pub id: String,

    /// Raw kind string, e.g. `customer.subscription.created`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the provider emitted the event (Unix timestamp).
    pub created: i64,

    /// Kind-specific payload container.
    pub data: StripeEventData,

    /// False when the event was generated against test-mode keys.
    pub livemode: bool,

    /// API version the payload was rendered with.
    pub api_version: Option<String>,
}

/// Carrier for the kind-specific object inside the envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object the event is about; its shape depends on the kind.
    pub object: serde_json::Value,

    /// On update events, the old values of the changed attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

/// Event kinds the reconciliation handler recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Provider confirmed subscription creation.
    SubscriptionCreated,
    /// Subscription attributes changed (status, plan, ...).
    SubscriptionUpdated,
    /// Subscription was deleted/canceled.
    SubscriptionDeleted,
    /// A billing attempt cleared.
    InvoicePaymentSucceeded,
    /// A billing attempt bounced.
    InvoicePaymentFailed,
    /// Anything else; acknowledged without processing.
    Unknown,
}

impl StripeEventType {
    /// Map a raw kind string onto the recognized set.
    pub fn from_str(s: &str) -> Self {
        match s {
            "customer.subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            _ => Self::Unknown,
        }
    }

    /// Convert to the provider's event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::Unknown => "unknown",
        }
    }
}

/// Decoded `data.object`, one concrete shape per recognized event kind.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// Object for customer.subscription.* events.
    Subscription(SubscriptionObject),
    /// Object for invoice.* events.
    Invoice(InvoiceObject),
    /// Object for an unrecognized event kind; not decoded.
    Unrecognized,
}

/// Stripe Subscription object, reduced to reconciliation-relevant fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionObject {
    /// Subscription identifier (sub_...).
    pub id: String,

    /// Customer owning this subscription (cus_...).
    pub customer: String,

    /// Provider status string ("active", "past_due", ...).
    pub status: String,

    /// Whether the subscription is already set to cancel at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,

    /// When the current billing period runs out (Unix timestamp).
    pub current_period_end: Option<i64>,

    /// The priced items the subscription is billed for.
    #[serde(default)]
    pub items: SubscriptionItems,
}

impl SubscriptionObject {
    /// Price IDs across all subscription items.
    pub fn price_ids(&self) -> impl Iterator<Item = &str> {
        self.items.data.iter().map(|item| item.price.id.as_str())
    }
}

/// List wrapper Stripe puts around subscription items.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubscriptionItems {
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

/// One billed item on a subscription.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionItem {
    pub price: SubscriptionPrice,
}

/// Price reference on a subscription item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionPrice {
    pub id: String,
}

/// Stripe Invoice object, reduced to reconciliation-relevant fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceObject {
    /// Invoice identifier (in_...).
    pub id: String,

    /// Customer the invoice was issued to.
    pub customer: String,

    /// Subscription the invoice bills, if any.
    pub subscription: Option<String>,
}

impl StripeEvent {
    /// The recognized kind this event maps to.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_str(&self.event_type)
    }

    /// Decode `data.object` into the shape matching this event's kind.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` when the object does not match
    /// the shape the event kind promises.
    pub fn payload(&self) -> Result<EventPayload, WebhookError> {
        match self.parsed_type() {
            StripeEventType::SubscriptionCreated
            | StripeEventType::SubscriptionUpdated
            | StripeEventType::SubscriptionDeleted => {
                let object: SubscriptionObject =
                    serde_json::from_value(self.data.object.clone()).map_err(|e| {
                        WebhookError::ParseError(format!("invalid subscription object: {}", e))
                    })?;
                Ok(EventPayload::Subscription(object))
            }
            StripeEventType::InvoicePaymentSucceeded | StripeEventType::InvoicePaymentFailed => {
                let object: InvoiceObject =
                    serde_json::from_value(self.data.object.clone()).map_err(|e| {
                        WebhookError::ParseError(format!("invalid invoice object: {}", e))
                    })?;
                Ok(EventPayload::Invoice(object))
            }
            StripeEventType::Unknown => Ok(EventPayload::Unrecognized),
        }
    }
}

/// Assembles event fixtures for the unit tests below.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "customer.subscription.created".to_string(),
            created: 1704067200,
            object: serde_json::json!({}),
            livemode: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "customer.subscription.created",
            "created": 1704067200,
            "data": {
                "object": {}
            },
            "livemode": false,
            "api_version": "2024-06-20"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "customer.subscription.created");
        assert_eq!(event.created, 1704067200);
        assert!(!event.livemode);
    }

    #[test]
    fn deserialize_event_without_api_version() {
        let json = r#"{
            "id": "evt_no_version",
            "type": "invoice.payment_failed",
            "created": 1704067200,
            "data": { "object": {} },
            "livemode": true
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        assert!(event.api_version.is_none());
    }

    #[test]
    fn event_type_roundtrip() {
        let types = [
            StripeEventType::SubscriptionCreated,
            StripeEventType::SubscriptionUpdated,
            StripeEventType::SubscriptionDeleted,
            StripeEventType::InvoicePaymentSucceeded,
            StripeEventType::InvoicePaymentFailed,
        ];

        for event_type in types {
            assert_eq!(StripeEventType::from_str(event_type.as_str()), event_type);
        }
    }

    #[test]
    fn unrecognized_event_type_maps_to_unknown() {
        assert_eq!(
            StripeEventType::from_str("payment_intent.succeeded"),
            StripeEventType::Unknown
        );
    }

    #[test]
    fn subscription_payload_decodes() {
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.updated")
            .object(json!({
                "id": "sub_123",
                "customer": "cus_456",
                "status": "past_due",
                "cancel_at_period_end": false,
                "current_period_end": 1706745600,
                "items": {
                    "data": [
                        { "price": { "id": "price_monthly" } }
                    ]
                }
            }))
            .build();

        match event.payload().unwrap() {
            EventPayload::Subscription(sub) => {
                assert_eq!(sub.id, "sub_123");
                assert_eq!(sub.customer, "cus_456");
                assert_eq!(sub.status, "past_due");
                assert_eq!(sub.price_ids().collect::<Vec<_>>(), vec!["price_monthly"]);
            }
            other => panic!("expected subscription payload, got {:?}", other),
        }
    }

    #[test]
    fn subscription_payload_tolerates_missing_items() {
        let event = StripeEventBuilder::new()
            .object(json!({
                "id": "sub_minimal",
                "customer": "cus_1",
                "status": "active"
            }))
            .build();

        match event.payload().unwrap() {
            EventPayload::Subscription(sub) => {
                assert_eq!(sub.price_ids().count(), 0);
                assert!(!sub.cancel_at_period_end);
            }
            other => panic!("expected subscription payload, got {:?}", other),
        }
    }

    #[test]
    fn invoice_payload_decodes() {
        let event = StripeEventBuilder::new()
            .event_type("invoice.payment_succeeded")
            .object(json!({
                "id": "in_123",
                "customer": "cus_456",
                "subscription": "sub_789"
            }))
            .build();

        match event.payload().unwrap() {
            EventPayload::Invoice(invoice) => {
                assert_eq!(invoice.id, "in_123");
                assert_eq!(invoice.subscription.as_deref(), Some("sub_789"));
            }
            other => panic!("expected invoice payload, got {:?}", other),
        }
    }

    #[test]
    fn invoice_payload_without_subscription() {
        let event = StripeEventBuilder::new()
            .event_type("invoice.payment_failed")
            .object(json!({
                "id": "in_one_off",
                "customer": "cus_456",
                "subscription": null
            }))
            .build();

        match event.payload().unwrap() {
            EventPayload::Invoice(invoice) => assert!(invoice.subscription.is_none()),
            other => panic!("expected invoice payload, got {:?}", other),
        }
    }

    #[test]
    fn unknown_kind_payload_is_unrecognized() {
        let event = StripeEventBuilder::new()
            .event_type("charge.refunded")
            .object(json!({ "anything": "goes" }))
            .build();

        assert!(matches!(event.payload().unwrap(), EventPayload::Unrecognized));
    }

    #[test]
    fn mismatched_object_is_a_parse_error() {
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.created")
            .object(json!({ "not": "a subscription" }))
            .build();

        assert!(matches!(event.payload(), Err(WebhookError::ParseError(_))));
    }
}
