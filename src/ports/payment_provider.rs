//! PaymentProvider port - the payment gateway contract.
//!
//! Everything the shop needs from Stripe: customers, checkout and portal
//! sessions, and subscription lookup/cancellation. The provider is a
//! consumed collaborator; no payment logic lives on this side of the
//! boundary, and every operation is either a provider-idempotent create
//! or a plain read, so retries are safe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::order::SubscriptionStatus;

/// Port for the payment gateway.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Register a customer with the provider; the returned id keys all
    /// later calls and the local order record.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError>;

    /// Open a subscription-mode checkout session the customer completes
    /// in the provider's hosted UI.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Open a billing-portal session where the customer manages their
    /// subscription directly with the provider.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError>;

    /// The customer's current subscription as the provider sees it, or
    /// `None` when they have none.
    async fn find_subscription_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<ProviderSubscription>, PaymentError>;

    /// Cancel a subscription, either immediately or (`at_period_end`)
    /// when the paid-for period runs out.
    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<ProviderSubscription, PaymentError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Provider-side customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// `cus_…` id.
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    pub customer_id: String,
    pub price_id: String,
    /// Where the hosted checkout redirects on completion.
    pub success_url: String,
    /// Where it redirects when the customer backs out.
    pub cancel_url: String,
}

/// A live checkout session: the `cs_…` id plus the hosted URL to send
/// the customer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// A live billing-portal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

/// The provider's own view of a subscription, as returned by lookups and
/// cancellation. Richer than the local projection: it carries the
/// scheduled-cancellation flag and the period boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSubscription {
    /// `sub_…` id.
    pub id: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    pub cancel_at_period_end: bool,
    /// End of the current billing period (Unix timestamp).
    pub current_period_end: Option<i64>,
}

/// Failure of a provider call, categorized for retry decisions.
#[derive(Debug, Clone)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::NotFound => ErrorCode::OrderNotFound,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    /// Could not reach the provider at all.
    NetworkError,
    /// The provider rejected our API key.
    AuthenticationError,
    /// The referenced resource does not exist provider-side.
    NotFound,
    /// The provider is shedding load; back off and retry.
    RateLimitExceeded,
    /// Any other provider-reported failure.
    ProviderError,
}

impl PaymentErrorCode {
    /// Whether the same call may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        })
    }
}
