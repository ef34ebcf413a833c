//! Order HTTP endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateOrderRequest, CreateOrderResponse, SubscriptionStatusResponse};
pub use routes::order_routes;
