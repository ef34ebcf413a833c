//! Axum router for order endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{create_order, get_subscription_status};

/// Order API routes, mounted under `/api`.
///
/// - `POST /orders` - initiate checkout (creates the pending order)
/// - `GET /subscription-status` - local subscription projection
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/subscription-status", get(get_subscription_status))
}
