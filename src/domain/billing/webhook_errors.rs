//! The webhook error taxonomy.
//!
//! Each variant knows whether a retry could help and which HTTP status
//! to answer with. The status drives Stripe's delivery contract: a 5xx
//! asks for redelivery, a 4xx ends the attempt, so only true dependency
//! failures may map to 5xx.

use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while processing a delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The HMAC did not match; the payload is untrusted.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Delivery older than the replay window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signing timestamp ahead of now beyond the skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Signature header or event body did not parse.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A field the handler needs is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Deliberately skipped; not a failure.
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Order or audit store unreachable mid-dispatch.
    #[error("Database error: {0}")]
    Database(String),

    /// A provider call issued during dispatch failed.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl WebhookError {
    /// Whether redelivering the same payload could succeed.
    ///
    /// Only transient dependency failures qualify. Authenticity and
    /// payload problems are final; retrying an untrusted payload cannot
    /// make it trusted.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_) | WebhookError::Provider(_))
    }

    /// The status the webhook endpoint answers with.
    ///
    /// 2xx acknowledges, 4xx refuses for good, 5xx asks the provider to
    /// redeliver.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            // Skipped, but still acknowledged.
            WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::Database(_) | WebhookError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<crate::domain::foundation::DomainError> for WebhookError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticity_and_payload_errors() -> Vec<WebhookError> {
        vec![
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
            WebhookError::InvalidTimestamp,
            WebhookError::ParseError("bad json".to_string()),
            WebhookError::MissingField("customer"),
        ]
    }

    fn dependency_errors() -> Vec<WebhookError> {
        vec![
            WebhookError::Database("pool exhausted".to_string()),
            WebhookError::Provider("stripe timeout".to_string()),
        ]
    }

    #[test]
    fn only_dependency_failures_invite_a_retry() {
        for err in dependency_errors() {
            assert!(err.is_retryable(), "{} should retry", err);
        }
        for err in authenticity_and_payload_errors() {
            assert!(!err.is_retryable(), "{} should not retry", err);
        }
        assert!(!WebhookError::Ignored("unhandled".to_string()).is_retryable());
    }

    #[test]
    fn retryability_matches_the_status_class() {
        for err in dependency_errors() {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
        for err in authenticity_and_payload_errors() {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(
            WebhookError::Ignored("unhandled".to_string()).status_code(),
            StatusCode::OK
        );
    }

    #[test]
    fn messages_name_what_failed() {
        assert_eq!(WebhookError::InvalidSignature.to_string(), "Invalid signature");
        assert_eq!(
            WebhookError::MissingField("subscription").to_string(),
            "Missing field: subscription"
        );
        assert_eq!(
            WebhookError::ParseError("invalid JSON".to_string()).to_string(),
            "Parse error: invalid JSON"
        );
    }
}
