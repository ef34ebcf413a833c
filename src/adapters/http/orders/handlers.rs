//! HTTP handlers for order endpoints.

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::orders::{CreateCheckoutCommand, GetSubscriptionStatusQuery};

use super::super::{ApiError, AppState};
use super::dto::{
    CreateOrderRequest, CreateOrderResponse, SubscriptionStatusParams, SubscriptionStatusResponse,
};

/// POST /api/orders - Initiate checkout for a new customer.
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_checkout_handler();
    let cmd = CreateCheckoutCommand {
        contact: request.contact(),
        shipping: request.shipping(),
        success_url: request.success_url.clone(),
        cancel_url: request.cancel_url.clone(),
    };

    let result = handler.handle(cmd).await?;

    let response = CreateOrderResponse {
        order_id: result.order_id.to_string(),
        customer_id: result.customer_id,
        checkout_session_id: result.checkout_session.id,
        checkout_url: result.checkout_session.url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/subscription-status - Local projection for a customer.
pub async fn get_subscription_status(
    State(state): State<AppState>,
    Query(params): Query<SubscriptionStatusParams>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.subscription_status_handler();
    let query = GetSubscriptionStatusQuery {
        customer_id: params.customer_id,
    };

    let projection = handler.handle(query).await?;

    Ok(Json(SubscriptionStatusResponse::from(projection)))
}
