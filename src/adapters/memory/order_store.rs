//! In-memory implementation of the OrderStore port.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::order::{Order, SubscriptionStatus};
use crate::ports::{OrderStore, UpdateOutcome};

/// In-memory order store.
///
/// Orders live in a `Vec` behind an async `RwLock`; lookups scan. Updates go
/// through the aggregate's own mutators so the paid projection logic exists
/// in exactly one place.
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
    fail: AtomicBool,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Pre-populate the store.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with a database error, to
    /// simulate an unreachable store.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored orders.
    pub async fn all(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::database("order store unreachable"));
        }
        Ok(())
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        self.check_available()?;
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Order>, DomainError> {
        self.check_available()?;
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.customer_id == customer_id).cloned())
    }

    async fn find_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Order>, DomainError> {
        self.check_available()?;
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .find(|o| o.subscription_id.as_deref() == Some(subscription_id))
            .cloned())
    }

    async fn attach_subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
        status: &SubscriptionStatus,
    ) -> Result<UpdateOutcome, DomainError> {
        self.check_available()?;
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.customer_id == customer_id) {
            Some(order) => {
                order.attach_subscription(subscription_id, status.clone());
                Ok(UpdateOutcome::Applied)
            }
            None => Ok(UpdateOutcome::NoMatchingOrder),
        }
    }

    async fn update_subscription_status(
        &self,
        subscription_id: &str,
        status: &SubscriptionStatus,
    ) -> Result<UpdateOutcome, DomainError> {
        self.check_available()?;
        let mut orders = self.orders.write().await;
        match orders
            .iter_mut()
            .find(|o| o.subscription_id.as_deref() == Some(subscription_id))
        {
            Some(order) => {
                order.set_status(status.clone());
                Ok(UpdateOutcome::Applied)
            }
            None => Ok(UpdateOutcome::NoMatchingOrder),
        }
    }

    async fn set_paid(
        &self,
        subscription_id: &str,
        paid: bool,
    ) -> Result<UpdateOutcome, DomainError> {
        self.check_available()?;
        let mut orders = self.orders.write().await;
        match orders
            .iter_mut()
            .find(|o| o.subscription_id.as_deref() == Some(subscription_id))
        {
            Some(order) => {
                order.set_paid(paid);
                Ok(UpdateOutcome::Applied)
            }
            None => Ok(UpdateOutcome::NoMatchingOrder),
        }
    }
}
