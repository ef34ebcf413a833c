//! HTTP handlers for billing endpoints.

use axum::extract::{Json, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::billing::{
    CreatePortalSessionCommand, GetSubscriptionDetailQuery, HandleProviderWebhookCommand,
};
use crate::domain::billing::WebhookError;

use super::super::{ApiError, AppState};
use super::dto::{
    PortalSessionRequest, PortalSessionResponse, SubscriptionDetailParams,
    SubscriptionDetailResponse, WebhookAck,
};

/// POST /api/webhooks/stripe - Provider webhook endpoint.
///
/// The body is taken as raw bytes; the signature covers them exactly, so
/// nothing may parse or transform the payload before verification.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookApiError(WebhookError::MissingField(
            "Stripe-Signature",
        )))?;

    let handler = state.webhook_handler();
    let cmd = HandleProviderWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler.handle(cmd).await?;

    Ok(Json(WebhookAck { received: true }))
}

/// POST /api/billing/portal - Create a billing-portal session.
pub async fn create_portal_session(
    State(state): State<AppState>,
    Json(request): Json<PortalSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.portal_session_handler();
    let cmd = CreatePortalSessionCommand {
        customer_id: request.customer_id,
        return_url: request.return_url,
    };

    let session = handler.handle(cmd).await?;

    Ok(Json(PortalSessionResponse {
        portal_url: session.url,
    }))
}

/// GET /api/subscription - Provider-side subscription lookup.
pub async fn get_subscription_detail(
    State(state): State<AppState>,
    Query(params): Query<SubscriptionDetailParams>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.subscription_detail_handler();
    let query = GetSubscriptionDetailQuery {
        customer_id: params.customer_id,
    };

    let subscription = handler.handle(query).await?;

    Ok(Json(SubscriptionDetailResponse {
        subscription: subscription.map(Into::into),
    }))
}

/// Webhook error response.
///
/// Deliberately plaintext rather than the JSON error envelope: the only
/// reader is the provider's delivery log, and the status code is what
/// drives its retry behavior. Dependency failures answer with a generic
/// body so store internals never leave the process.
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Webhook delivery failed");
            return (status, "Internal server error").into_response();
        }

        (status, format!("Webhook Error: {}", self.0)).into_response()
    }
}
