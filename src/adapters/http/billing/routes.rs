//! Axum routers for billing endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{create_portal_session, get_subscription_detail, handle_stripe_webhook};

/// Billing API routes, mounted under `/api`.
///
/// - `POST /billing/portal` - billing-portal session
/// - `GET /subscription` - provider-side subscription view
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/billing/portal", post(create_portal_session))
        .route("/subscription", get(get_subscription_detail))
}

/// Webhook routes, mounted under `/api/webhooks`.
///
/// Separate from the API routes: deliveries are authenticated by
/// signature, and the method router answers anything but POST with 405.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
