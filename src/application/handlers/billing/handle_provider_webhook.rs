//! HandleProviderWebhookHandler - Reconciles provider webhook deliveries
//! into order state.
//!
//! The pipeline per delivery: verify the signature over the raw bytes,
//! suppress duplicates via the processed-event record, dispatch on the
//! event kind, apply one set-style order update, record the outcome.
//! Verification failure short-circuits before any store access.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::billing::{
    EventPayload, StripeEvent, StripeEventType, SubscriptionObject, WebhookError, WebhookVerifier,
};
use crate::domain::order::SubscriptionStatus;
use crate::ports::{
    OrderStore, PaymentProvider, UpdateOutcome, WebhookEventRecord, WebhookEventRepository,
};

/// Command to process one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleProviderWebhookCommand {
    /// Raw request body, exactly as received. The signature is computed
    /// over these bytes; any re-encoding breaks verification.
    pub payload: Vec<u8>,
    /// Value of the Stripe-Signature header.
    pub signature: String,
}

/// Outcome of a processed delivery. Every variant is acknowledged with a
/// success response; failures are reported through `WebhookError` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleProviderWebhookResult {
    /// Subscription assigned to the order matched by customer id.
    SubscriptionAttached {
        subscription_id: String,
        status: SubscriptionStatus,
    },
    /// Status (and paid projection) updated on the order matched by
    /// subscription id.
    StatusUpdated {
        subscription_id: String,
        status: SubscriptionStatus,
    },
    /// Paid flag forced by an invoice event; status untouched.
    PaidFlagSet {
        subscription_id: String,
        paid: bool,
    },
    /// No order matched the event's key. Logged, acknowledged.
    NoMatchingOrder { matched_by: String },
    /// Event id was already processed; dispatch skipped.
    Duplicate,
    /// Unrecognized event kind, or an invoice with nothing to reconcile.
    Ignored,
}

/// Handler for inbound payment provider webhooks.
pub struct HandleProviderWebhookHandler {
    verifier: WebhookVerifier,
    order_store: Arc<dyn OrderStore>,
    payment_provider: Arc<dyn PaymentProvider>,
    webhook_events: Arc<dyn WebhookEventRepository>,
    non_renewing_price_ids: HashSet<String>,
}

impl HandleProviderWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        order_store: Arc<dyn OrderStore>,
        payment_provider: Arc<dyn PaymentProvider>,
        webhook_events: Arc<dyn WebhookEventRepository>,
        non_renewing_price_ids: HashSet<String>,
    ) -> Self {
        Self {
            verifier,
            order_store,
            payment_provider,
            webhook_events,
            non_renewing_price_ids,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleProviderWebhookCommand,
    ) -> Result<HandleProviderWebhookResult, WebhookError> {
        let event = self.verifier.verify_and_parse(&cmd.payload, &cmd.signature)?;

        if let Some(existing) = self.webhook_events.find_by_event_id(&event.id).await? {
            if existing.result.is_settled() {
                tracing::info!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    "Duplicate delivery; already processed"
                );
                return Ok(HandleProviderWebhookResult::Duplicate);
            }
        }

        let dispatched = self.dispatch(&event).await;
        self.record(&event, &dispatched).await?;

        match &dispatched {
            Ok(result) => {
                tracing::info!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    result = ?result,
                    "Webhook delivery processed"
                );
            }
            Err(e) => {
                tracing::error!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %e,
                    "Webhook dispatch failed"
                );
            }
        }

        dispatched
    }

    async fn dispatch(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleProviderWebhookResult, WebhookError> {
        match (event.parsed_type(), event.payload()?) {
            (StripeEventType::SubscriptionCreated, EventPayload::Subscription(sub)) => {
                self.apply_subscription_created(&sub).await
            }
            (StripeEventType::SubscriptionUpdated, EventPayload::Subscription(sub)) => {
                let status = SubscriptionStatus::parse(&sub.status);
                self.apply_status(&sub.id, status).await
            }
            (StripeEventType::SubscriptionDeleted, EventPayload::Subscription(sub)) => {
                // The deletion event is terminal regardless of the status
                // string the payload carries.
                self.apply_status(&sub.id, SubscriptionStatus::Canceled).await
            }
            (StripeEventType::InvoicePaymentSucceeded, EventPayload::Invoice(invoice)) => {
                self.apply_paid(invoice.subscription.as_deref(), &invoice.id, true)
                    .await
            }
            (StripeEventType::InvoicePaymentFailed, EventPayload::Invoice(invoice)) => {
                self.apply_paid(invoice.subscription.as_deref(), &invoice.id, false)
                    .await
            }
            (StripeEventType::Unknown, _) => {
                tracing::debug!(event_type = %event.event_type, "Unhandled event kind acknowledged");
                Ok(HandleProviderWebhookResult::Ignored)
            }
            _ => Err(WebhookError::ParseError(format!(
                "object shape does not match event kind {}",
                event.event_type
            ))),
        }
    }

    async fn apply_subscription_created(
        &self,
        sub: &SubscriptionObject,
    ) -> Result<HandleProviderWebhookResult, WebhookError> {
        let status = SubscriptionStatus::parse(&sub.status);
        let outcome = self
            .order_store
            .attach_subscription(&sub.customer, &sub.id, &status)
            .await?;

        // Non-renewing plans are scheduled to lapse after the first billing
        // period. The subscription exists provider-side whether or not an
        // order matched, so the instruction is independent of the outcome.
        if !sub.cancel_at_period_end && self.is_non_renewing(sub) {
            self.payment_provider
                .cancel_subscription(&sub.id, true)
                .await
                .map_err(|e| WebhookError::Provider(e.to_string()))?;
            tracing::info!(
                subscription_id = %sub.id,
                "Non-renewing plan scheduled to cancel at period end"
            );
        }

        match outcome {
            UpdateOutcome::Applied => Ok(HandleProviderWebhookResult::SubscriptionAttached {
                subscription_id: sub.id.clone(),
                status,
            }),
            UpdateOutcome::NoMatchingOrder => {
                tracing::warn!(
                    customer_id = %sub.customer,
                    subscription_id = %sub.id,
                    "No order for customer; subscription creation acknowledged without update"
                );
                Ok(HandleProviderWebhookResult::NoMatchingOrder {
                    matched_by: format!("customer {}", sub.customer),
                })
            }
        }
    }

    async fn apply_status(
        &self,
        subscription_id: &str,
        status: SubscriptionStatus,
    ) -> Result<HandleProviderWebhookResult, WebhookError> {
        let outcome = self
            .order_store
            .update_subscription_status(subscription_id, &status)
            .await?;

        match outcome {
            UpdateOutcome::Applied => Ok(HandleProviderWebhookResult::StatusUpdated {
                subscription_id: subscription_id.to_string(),
                status,
            }),
            UpdateOutcome::NoMatchingOrder => {
                tracing::warn!(
                    subscription_id,
                    "No order for subscription; status event acknowledged without update"
                );
                Ok(HandleProviderWebhookResult::NoMatchingOrder {
                    matched_by: format!("subscription {}", subscription_id),
                })
            }
        }
    }

    async fn apply_paid(
        &self,
        subscription_id: Option<&str>,
        invoice_id: &str,
        paid: bool,
    ) -> Result<HandleProviderWebhookResult, WebhookError> {
        let Some(subscription_id) = subscription_id else {
            tracing::debug!(invoice_id, "Invoice without subscription; nothing to reconcile");
            return Ok(HandleProviderWebhookResult::Ignored);
        };

        let outcome = self.order_store.set_paid(subscription_id, paid).await?;

        match outcome {
            UpdateOutcome::Applied => Ok(HandleProviderWebhookResult::PaidFlagSet {
                subscription_id: subscription_id.to_string(),
                paid,
            }),
            UpdateOutcome::NoMatchingOrder => {
                tracing::warn!(
                    subscription_id,
                    invoice_id,
                    "No order for subscription; invoice event acknowledged without update"
                );
                Ok(HandleProviderWebhookResult::NoMatchingOrder {
                    matched_by: format!("subscription {}", subscription_id),
                })
            }
        }
    }

    async fn record(
        &self,
        event: &StripeEvent,
        dispatched: &Result<HandleProviderWebhookResult, WebhookError>,
    ) -> Result<(), WebhookError> {
        let payload = serde_json::to_value(event).unwrap_or(serde_json::Value::Null);

        let record = match dispatched {
            Ok(HandleProviderWebhookResult::Duplicate) => return Ok(()),
            Ok(HandleProviderWebhookResult::Ignored) => WebhookEventRecord::ignored(
                &event.id,
                &event.event_type,
                "unhandled event kind",
                payload,
            ),
            Ok(HandleProviderWebhookResult::NoMatchingOrder { matched_by }) => {
                WebhookEventRecord::ignored(
                    &event.id,
                    &event.event_type,
                    format!("no matching order for {}", matched_by),
                    payload,
                )
            }
            Ok(_) => WebhookEventRecord::success(&event.id, &event.event_type, payload),
            Err(e) => {
                WebhookEventRecord::failed(&event.id, &event.event_type, e.to_string(), payload)
            }
        };

        self.webhook_events.save(record).await?;
        Ok(())
    }

    fn is_non_renewing(&self, sub: &SubscriptionObject) -> bool {
        sub.price_ids()
            .any(|price| self.non_renewing_price_ids.contains(price))
    }
}
