//! Request/response DTOs for order endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::order::{ContactDetails, ShippingAddress, SubscriptionProjection};

/// POST /api/orders request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CreateOrderRequest {
    pub fn contact(&self) -> ContactDetails {
        ContactDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    pub fn shipping(&self) -> ShippingAddress {
        ShippingAddress {
            address: self.address.clone(),
            zip_code: self.zip_code.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
        }
    }
}

/// POST /api/orders response body.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub customer_id: String,
    pub checkout_session_id: String,
    pub checkout_url: String,
}

/// GET /api/subscription-status query parameters.
#[derive(Debug, Deserialize)]
pub struct SubscriptionStatusParams {
    pub customer_id: String,
}

/// GET /api/subscription-status response body.
#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub subscription_id: Option<String>,
    pub status: String,
    pub paid: bool,
}

impl From<SubscriptionProjection> for SubscriptionStatusResponse {
    fn from(projection: SubscriptionProjection) -> Self {
        Self {
            subscription_id: projection.subscription_id,
            status: projection.status.to_string(),
            paid: projection.paid,
        }
    }
}
