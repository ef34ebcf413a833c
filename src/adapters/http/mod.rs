//! HTTP adapter - axum routers, handlers, and DTOs.
//!
//! The webhook route lives under its own prefix because it is authenticated
//! by signature, not by anything a browser sends; everything else is the
//! JSON API the storefront consumes.

pub mod billing;
pub mod orders;

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;

use crate::application::handlers::billing::{
    CreatePortalSessionHandler, GetSubscriptionDetailHandler, HandleProviderWebhookHandler,
};
use crate::application::handlers::orders::{CreateCheckoutHandler, GetSubscriptionStatusHandler};
use crate::config::PaymentConfig;
use crate::domain::billing::WebhookVerifier;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{OrderStore, PaymentProvider, WebhookEventRepository};

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub order_store: Arc<dyn OrderStore>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    webhook_verifier: WebhookVerifier,
    checkout_price_id: String,
    non_renewing_price_ids: HashSet<String>,
}

impl AppState {
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        payment_provider: Arc<dyn PaymentProvider>,
        webhook_events: Arc<dyn WebhookEventRepository>,
        payment: &PaymentConfig,
    ) -> Self {
        Self {
            order_store,
            payment_provider,
            webhook_events,
            webhook_verifier: WebhookVerifier::new(payment.stripe_webhook_secret.clone()),
            checkout_price_id: payment.stripe_price_id.clone(),
            non_renewing_price_ids: payment.non_renewing_set(),
        }
    }

    pub fn webhook_handler(&self) -> HandleProviderWebhookHandler {
        HandleProviderWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.order_store.clone(),
            self.payment_provider.clone(),
            self.webhook_events.clone(),
            self.non_renewing_price_ids.clone(),
        )
    }

    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.order_store.clone(),
            self.payment_provider.clone(),
            self.checkout_price_id.clone(),
        )
    }

    pub fn subscription_status_handler(&self) -> GetSubscriptionStatusHandler {
        GetSubscriptionStatusHandler::new(self.order_store.clone())
    }

    pub fn portal_session_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(self.payment_provider.clone())
    }

    pub fn subscription_detail_handler(&self) -> GetSubscriptionDetailHandler {
        GetSubscriptionDetailHandler::new(self.payment_provider.clone())
    }
}

/// Build the complete API router.
pub fn api_router(state: AppState) -> Router {
    let api = orders::order_routes()
        .merge(billing::billing_routes())
        .nest("/webhooks", billing::webhook_routes());

    Router::new().nest("/api", api).with_state(state)
}

/// Standard JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error type converting domain errors to HTTP responses.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::OrderNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::ExternalServiceError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message);
        (status, Json(body)).into_response()
    }
}
