//! Billing handlers.
//!
//! - `handle_provider_webhook` - the reconciliation pipeline for inbound
//!   provider events
//! - `create_portal_session` - billing-portal session pass-through
//! - `get_subscription_detail` - provider-side subscription lookup

mod create_portal_session;
mod get_subscription_detail;
mod handle_provider_webhook;

pub use create_portal_session::{CreatePortalSessionCommand, CreatePortalSessionHandler};
pub use get_subscription_detail::{GetSubscriptionDetailHandler, GetSubscriptionDetailQuery};
pub use handle_provider_webhook::{
    HandleProviderWebhookCommand, HandleProviderWebhookHandler, HandleProviderWebhookResult,
};
