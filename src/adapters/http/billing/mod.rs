//! Billing HTTP endpoints, including the provider webhook.

mod dto;
mod handlers;
mod routes;

pub use dto::{PortalSessionRequest, PortalSessionResponse, SubscriptionDetailResponse, WebhookAck};
pub use routes::{billing_routes, webhook_routes};
