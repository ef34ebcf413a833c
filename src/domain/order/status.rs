//! Subscription status values.
//!
//! The status is reported by the payment provider and applied to orders
//! last-write-wins; unknown values are carried through verbatim so a new
//! provider status never breaks reconciliation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a subscription as reported by the payment provider.
///
/// `Pending` is the only locally-originated value, assigned when an order
/// is created at checkout initiation before the provider has confirmed
/// anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    /// Checkout initiated, no subscription confirmed yet.
    Pending,

    /// Subscription is current and paid.
    Active,

    /// Payment failed, provider is retrying.
    PastDue,

    /// Subscription was canceled. Terminal.
    Canceled,

    /// Payment retries exhausted.
    Unpaid,

    /// Initial payment not yet completed.
    Incomplete,

    /// Initial payment never completed. Terminal.
    IncompleteExpired,

    /// Subscription is in a trial period.
    Trialing,

    /// Collection paused by the merchant.
    Paused,

    /// Status string not recognized; preserved verbatim.
    Other(String),
}

impl SubscriptionStatus {
    /// Parse a provider status string.
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "unpaid" => Self::Unpaid,
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            "trialing" => Self::Trialing,
            "paused" => Self::Paused,
            other => Self::Other(other.to_string()),
        }
    }

    /// The provider-format status string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Trialing => "trialing",
            Self::Paused => "paused",
            Self::Other(s) => s,
        }
    }

    /// Whether this status counts as paid.
    ///
    /// `paid` on an order is a denormalized projection of exactly this
    /// predicate; the two must never disagree after a status update.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether this status ends the subscription lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Canceled | Self::IncompleteExpired)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for SubscriptionStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.as_str().to_string()
    }
}
