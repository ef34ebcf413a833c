//! CreateCheckoutHandler - Checkout initiation.
//!
//! Creates the provider customer and checkout session first; the pending
//! order is only persisted once both provider calls have succeeded, so a
//! provider failure leaves no local state behind.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::{ContactDetails, Order, ShippingAddress};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, OrderStore, PaymentProvider,
};

/// Command to initiate checkout for a new customer.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub contact: ContactDetails,
    pub shipping: ShippingAddress,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of checkout initiation.
#[derive(Debug, Clone)]
pub struct CreateCheckoutResult {
    pub order_id: OrderId,
    pub customer_id: String,
    pub checkout_session: CheckoutSession,
}

pub struct CreateCheckoutHandler {
    order_store: Arc<dyn OrderStore>,
    payment_provider: Arc<dyn PaymentProvider>,
    price_id: String,
}

impl CreateCheckoutHandler {
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        payment_provider: Arc<dyn PaymentProvider>,
        price_id: impl Into<String>,
    ) -> Self {
        Self {
            order_store,
            payment_provider,
            price_id: price_id.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CreateCheckoutResult, DomainError> {
        if cmd.contact.email.is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if cmd.contact.name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                email: cmd.contact.email.clone(),
                name: Some(cmd.contact.name.clone()),
                phone: Some(cmd.contact.phone_number.clone()),
            })
            .await?;

        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                customer_id: customer.id.clone(),
                price_id: self.price_id.clone(),
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
            })
            .await?;

        let order = Order::pending_checkout(customer.id.clone(), cmd.contact, cmd.shipping);
        self.order_store.create(&order).await?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %customer.id,
            checkout_session_id = %session.id,
            "Checkout initiated"
        );

        Ok(CreateCheckoutResult {
            order_id: order.id,
            customer_id: customer.id,
            checkout_session: session,
        })
    }
}
