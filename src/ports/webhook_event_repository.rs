//! WebhookEventRepository port - Tracking of processed Stripe webhooks.
//!
//! Stripe may deliver the same webhook multiple times: network timeouts,
//! a 5xx from our endpoint, or a success response Stripe never received.
//! The order updates themselves are idempotent set operations, so replays
//! are harmless; this repository exists on top of that for auditing and
//! to suppress duplicate dispatches (including the provider call for
//! non-renewing plans, which should fire once).
//!
//! Race handling: two concurrent deliveries of the same event both
//! dispatch, and the store's PRIMARY KEY constraint decides who records
//! the result. The loser observes `AlreadyExists`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::DomainError;

/// How a webhook delivery was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingResult {
    /// Event was dispatched and applied.
    Success,
    /// Event was acknowledged without processing (unrecognized kind, or no
    /// matching order).
    Ignored,
    /// Dispatch failed; the delivery was answered with a retryable error.
    Failed,
}

impl ProcessingResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Ignored => "ignored",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "ignored" => Some(Self::Ignored),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether a recorded result settles the event for good.
    ///
    /// Failed deliveries are answered with a 5xx and will be retried by the
    /// provider; the retry must be allowed to dispatch again.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Ignored)
    }
}

/// One processed delivery, as remembered by the audit trail.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// Provider event id (`evt_…`); the deduplication key.
    pub event_id: String,

    /// Raw event kind string.
    pub event_type: String,

    /// When dispatch finished.
    pub processed_at: DateTime<Utc>,

    /// How dispatch ended.
    pub result: ProcessingResult,

    /// Why the event was ignored, or what failed.
    pub detail: Option<String>,

    /// The verified envelope, kept for later inspection.
    pub payload: serde_json::Value,
}

impl WebhookEventRecord {
    pub fn success(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: ProcessingResult::Success,
            detail: None,
            payload,
        }
    }

    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: ProcessingResult::Ignored,
            detail: Some(reason.into()),
            payload,
        }
    }

    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: ProcessingResult::Failed,
            detail: Some(error.into()),
            payload,
        }
    }
}

/// What happened to a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// First write for this event id.
    Inserted,
    /// A settled record for this event id already existed; nothing written.
    AlreadyExists,
}

/// Port for the processed-webhook audit trail.
///
/// Implementations lean on a uniqueness constraint over the event id so
/// concurrent writers need no coordination beyond the store's own.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Look up the record for a provider event id, if one exists.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Attempt to save a webhook event record.
    ///
    /// A settled record for the same event id wins: the save returns
    /// `AlreadyExists` and the stored record is untouched. An unsettled
    /// (failed) record is replaced by the retry's outcome.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;
}
