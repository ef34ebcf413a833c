//! Configurable mock payment provider for tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::order::SubscriptionStatus;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentProvider, PortalSession, ProviderSubscription,
};

/// A recorded `cancel_subscription` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelCall {
    pub subscription_id: String,
    pub at_period_end: bool,
}

/// Mock payment provider.
///
/// Records every call and hands back canned responses. Tests assert on the
/// recorded calls (most importantly the cancel-at-period-end instruction,
/// which must fire exactly once per non-renewing subscription creation).
pub struct MockPaymentProvider {
    customer_counter: AtomicU64,
    created_customers: Mutex<Vec<CreateCustomerRequest>>,
    checkout_requests: Mutex<Vec<CreateCheckoutRequest>>,
    cancel_calls: Mutex<Vec<CancelCall>>,
    subscription: Mutex<Option<ProviderSubscription>>,
    fail: AtomicBool,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            customer_counter: AtomicU64::new(0),
            created_customers: Mutex::new(Vec::new()),
            checkout_requests: Mutex::new(Vec::new()),
            cancel_calls: Mutex::new(Vec::new()),
            subscription: Mutex::new(None),
            fail: AtomicBool::new(false),
        }
    }

    /// Preset the subscription returned by `find_subscription_for_customer`.
    pub fn with_subscription(self, subscription: ProviderSubscription) -> Self {
        *self.subscription.lock().unwrap() = Some(subscription);
        self
    }

    /// Make every subsequent call fail, simulating a provider outage.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn created_customers(&self) -> Vec<CreateCustomerRequest> {
        self.created_customers.lock().unwrap().clone()
    }

    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.checkout_requests.lock().unwrap().clone()
    }

    pub fn cancel_calls(&self) -> Vec<CancelCall> {
        self.cancel_calls.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), PaymentError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PaymentError::network("mock provider unreachable"));
        }
        Ok(())
    }
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.check_available()?;
        let n = self.customer_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let customer = Customer {
            id: format!("cus_mock_{}", n),
            email: request.email.clone(),
            name: request.name.clone(),
        };
        self.created_customers.lock().unwrap().push(request);
        Ok(customer)
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.check_available()?;
        let session = CheckoutSession {
            id: "cs_mock_1".to_string(),
            url: "https://checkout.example.com/cs_mock_1".to_string(),
        };
        self.checkout_requests.lock().unwrap().push(request);
        Ok(session)
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        _return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        self.check_available()?;
        Ok(PortalSession {
            id: "bps_mock_1".to_string(),
            url: format!("https://billing.example.com/{}", customer_id),
        })
    }

    async fn find_subscription_for_customer(
        &self,
        _customer_id: &str,
    ) -> Result<Option<ProviderSubscription>, PaymentError> {
        self.check_available()?;
        Ok(self.subscription.lock().unwrap().clone())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<ProviderSubscription, PaymentError> {
        self.check_available()?;
        self.cancel_calls.lock().unwrap().push(CancelCall {
            subscription_id: subscription_id.to_string(),
            at_period_end,
        });
        Ok(ProviderSubscription {
            id: subscription_id.to_string(),
            customer_id: "cus_mock_1".to_string(),
            status: if at_period_end {
                SubscriptionStatus::Active
            } else {
                SubscriptionStatus::Canceled
            },
            cancel_at_period_end: at_period_end,
            current_period_end: Some(1706745600),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_cancel_calls() {
        let provider = MockPaymentProvider::new();

        provider.cancel_subscription("sub_1", true).await.unwrap();

        let calls = provider.cancel_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].subscription_id, "sub_1");
        assert!(calls[0].at_period_end);
    }

    #[tokio::test]
    async fn create_customer_assigns_unique_ids() {
        let provider = MockPaymentProvider::new();
        let request = CreateCustomerRequest {
            email: "a@example.com".to_string(),
            name: None,
            phone: None,
        };

        let first = provider.create_customer(request.clone()).await.unwrap();
        let second = provider.create_customer(request).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(provider.created_customers().len(), 2);
    }

    #[tokio::test]
    async fn fail_flag_breaks_every_call() {
        let provider = MockPaymentProvider::new();
        provider.set_fail(true);

        let result = provider.cancel_subscription("sub_1", true).await;

        assert!(result.is_err());
        assert!(provider.cancel_calls().is_empty());
    }

    #[tokio::test]
    async fn preset_subscription_is_returned() {
        let provider = MockPaymentProvider::new().with_subscription(ProviderSubscription {
            id: "sub_9".to_string(),
            customer_id: "cus_9".to_string(),
            status: SubscriptionStatus::Active,
            cancel_at_period_end: false,
            current_period_end: None,
        });

        let found = provider
            .find_subscription_for_customer("cus_9")
            .await
            .unwrap();

        assert_eq!(found.unwrap().id, "sub_9");
    }
}
