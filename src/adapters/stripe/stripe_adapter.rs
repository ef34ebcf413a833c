//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API using
//! form-encoded requests with basic auth, as Stripe's API expects. The API
//! key is held in a `SecretString` and never logged.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::PaymentConfig;
use crate::domain::order::SubscriptionStatus;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentErrorCode, PaymentProvider, PortalSession, ProviderSubscription,
};

use super::api_types::{
    StripeCheckoutSession, StripeCustomer, StripePortalSession, StripeSubscription,
    StripeSubscriptionList,
};

/// Stripe REST adapter.
pub struct StripeAdapter {
    api_key: SecretString,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl StripeAdapter {
    /// Create a new adapter with the given secret API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create an adapter from the payment configuration section.
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(config.stripe_api_key.clone())
    }

    /// Override the API base URL (for tests against a local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        Self::parse_response(path, response).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, PaymentError> {
        let url = format!("{}{}", self.api_base_url, path);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.api_key.expose_secret(), Option::<&str>::None)
            .query(query)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::parse_response(path, response).await.map(Some)
    }

    async fn parse_response<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PaymentError::new(
                PaymentErrorCode::RateLimitExceeded,
                "Stripe rate limit exceeded",
            ));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PaymentError::new(
                PaymentErrorCode::AuthenticationError,
                "Stripe rejected the API key",
            ));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(path, status = %status, error = %error_text, "Stripe API call failed");
            return Err(PaymentError::provider(format!(
                "Stripe API error ({}): {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }

    fn to_provider_subscription(sub: StripeSubscription) -> ProviderSubscription {
        ProviderSubscription {
            id: sub.id,
            customer_id: sub.customer,
            status: SubscriptionStatus::parse(&sub.status),
            cancel_at_period_end: sub.cancel_at_period_end,
            current_period_end: sub.current_period_end,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let mut params = vec![("email", request.email.clone())];
        if let Some(name) = &request.name {
            params.push(("name", name.clone()));
        }
        if let Some(phone) = &request.phone {
            params.push(("phone", phone.clone()));
        }

        let customer: StripeCustomer = self.post_form("/v1/customers", &params).await?;

        tracing::info!(customer_id = %customer.id, "Created Stripe customer");

        Ok(Customer {
            id: customer.id,
            email: customer.email.unwrap_or(request.email),
            name: customer.name.or(request.name),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = vec![
            ("mode", "subscription".to_string()),
            ("customer", request.customer_id.clone()),
            ("line_items[0][price]", request.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
        ];

        let session: StripeCheckoutSession =
            self.post_form("/v1/checkout/sessions", &params).await?;

        let url = session.url.ok_or_else(|| {
            PaymentError::provider("Checkout session response carried no URL")
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        let params = vec![
            ("customer", customer_id.to_string()),
            ("return_url", return_url.to_string()),
        ];

        let portal: StripePortalSession = self
            .post_form("/v1/billing_portal/sessions", &params)
            .await?;

        Ok(PortalSession {
            id: portal.id,
            url: portal.url,
        })
    }

    async fn find_subscription_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<ProviderSubscription>, PaymentError> {
        let list: Option<StripeSubscriptionList> = self
            .get(
                "/v1/subscriptions",
                &[("customer", customer_id), ("status", "all"), ("limit", "1")],
            )
            .await?;

        Ok(list
            .and_then(|l| l.data.into_iter().next())
            .map(Self::to_provider_subscription))
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<ProviderSubscription, PaymentError> {
        let sub: StripeSubscription = if at_period_end {
            self.post_form(
                &format!("/v1/subscriptions/{}", subscription_id),
                &[("cancel_at_period_end", "true".to_string())],
            )
            .await?
        } else {
            let url = format!("{}/v1/subscriptions/{}", self.api_base_url, subscription_id);
            let response = self
                .http_client
                .delete(&url)
                .basic_auth(self.api_key.expose_secret(), Option::<&str>::None)
                .send()
                .await
                .map_err(|e| PaymentError::network(e.to_string()))?;
            Self::parse_response("/v1/subscriptions (delete)", response).await?
        };

        tracing::info!(
            subscription_id = %sub.id,
            at_period_end,
            "Canceled Stripe subscription"
        );

        Ok(Self::to_provider_subscription(sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_defaults_to_stripe_api() {
        let adapter = StripeAdapter::new("sk_test_key");
        assert_eq!(adapter.api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn base_url_can_be_overridden() {
        let adapter = StripeAdapter::new("sk_test_key").with_base_url("http://localhost:12111");
        assert_eq!(adapter.api_base_url, "http://localhost:12111");
    }

    #[test]
    fn subscription_conversion_maps_status() {
        let sub = StripeSubscription {
            id: "sub_1".to_string(),
            customer: "cus_1".to_string(),
            status: "past_due".to_string(),
            cancel_at_period_end: true,
            current_period_end: Some(1706745600),
        };

        let converted = StripeAdapter::to_provider_subscription(sub);

        assert_eq!(converted.status, SubscriptionStatus::PastDue);
        assert!(converted.cancel_at_period_end);
        assert_eq!(converted.current_period_end, Some(1706745600));
    }

    #[test]
    fn unknown_status_is_preserved() {
        let sub = StripeSubscription {
            id: "sub_1".to_string(),
            customer: "cus_1".to_string(),
            status: "brand_new_status".to_string(),
            cancel_at_period_end: false,
            current_period_end: None,
        };

        let converted = StripeAdapter::to_provider_subscription(sub);
        assert_eq!(converted.status.as_str(), "brand_new_status");
    }
}
