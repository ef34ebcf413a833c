//! PostgreSQL implementation of the OrderStore port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::{ContactDetails, Order, ShippingAddress, SubscriptionStatus};
use crate::ports::{OrderStore, UpdateOutcome};

/// PostgreSQL order store.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: String,
    subscription_id: Option<String>,
    status: String,
    paid: bool,
    name: String,
    email: String,
    phone_number: String,
    address: String,
    zip_code: String,
    state: String,
    country: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: OrderId::from_uuid(row.id),
            customer_id: row.customer_id,
            subscription_id: row.subscription_id,
            status: SubscriptionStatus::parse(&row.status),
            paid: row.paid,
            contact: ContactDetails {
                name: row.name,
                email: row.email,
                phone_number: row.phone_number,
            },
            shipping: ShippingAddress {
                address: row.address,
                zip_code: row.zip_code,
                state: row.state,
                country: row.country,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_ORDER: &str = r#"
    SELECT id, customer_id, subscription_id, status, paid,
           name, email, phone_number, address, zip_code, state, country,
           created_at, updated_at
    FROM orders
"#;

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_id, subscription_id, status, paid,
                name, email, phone_number, address, zip_code, state, country,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(&order.customer_id)
        .bind(&order.subscription_id)
        .bind(order.status.as_str())
        .bind(order.paid)
        .bind(&order.contact.name)
        .bind(&order.contact.email)
        .bind(&order.contact.phone_number)
        .bind(&order.shipping.address)
        .bind(&order.shipping.zip_code)
        .bind(&order.shipping.state)
        .bind(&order.shipping.country)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create order", e))?;

        Ok(())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{} WHERE customer_id = $1", SELECT_ORDER))
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find order by customer", e))?;

        Ok(row.map(Order::from))
    }

    async fn find_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{} WHERE subscription_id = $1", SELECT_ORDER))
                .bind(subscription_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find order by subscription", e))?;

        Ok(row.map(Order::from))
    }

    async fn attach_subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
        status: &SubscriptionStatus,
    ) -> Result<UpdateOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                subscription_id = $2,
                status = $3,
                paid = $4,
                updated_at = now()
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .bind(subscription_id)
        .bind(status.as_str())
        .bind(status.is_paid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to attach subscription", e))?;

        Ok(outcome(result.rows_affected()))
    }

    async fn update_subscription_status(
        &self,
        subscription_id: &str,
        status: &SubscriptionStatus,
    ) -> Result<UpdateOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = $2,
                paid = $3,
                updated_at = now()
            WHERE subscription_id = $1
            "#,
        )
        .bind(subscription_id)
        .bind(status.as_str())
        .bind(status.is_paid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update subscription status", e))?;

        Ok(outcome(result.rows_affected()))
    }

    async fn set_paid(
        &self,
        subscription_id: &str,
        paid: bool,
    ) -> Result<UpdateOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                paid = $2,
                updated_at = now()
            WHERE subscription_id = $1
            "#,
        )
        .bind(subscription_id)
        .bind(paid)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to set paid flag", e))?;

        Ok(outcome(result.rows_affected()))
    }
}

fn outcome(rows_affected: u64) -> UpdateOutcome {
    if rows_affected == 0 {
        UpdateOutcome::NoMatchingOrder
    } else {
        UpdateOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_means_no_matching_order() {
        assert_eq!(outcome(0), UpdateOutcome::NoMatchingOrder);
        assert_eq!(outcome(1), UpdateOutcome::Applied);
    }

    #[test]
    fn row_conversion_preserves_projection() {
        let now = Utc::now();
        let row = OrderRow {
            id: Uuid::new_v4(),
            customer_id: "cus_1".to_string(),
            subscription_id: Some("sub_1".to_string()),
            status: "active".to_string(),
            paid: true,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "+1 555 0100".to_string(),
            address: "1 Analytical Way".to_string(),
            zip_code: "94000".to_string(),
            state: "CA".to_string(),
            country: "US".to_string(),
            created_at: now,
            updated_at: now,
        };

        let order = Order::from(row);

        assert_eq!(order.status, SubscriptionStatus::Active);
        assert!(order.paid);
        assert_eq!(order.subscription_id.as_deref(), Some("sub_1"));
    }

    #[test]
    fn row_conversion_carries_unknown_status_through() {
        let now = Utc::now();
        let row = OrderRow {
            id: Uuid::new_v4(),
            customer_id: "cus_1".to_string(),
            subscription_id: None,
            status: "some_future_status".to_string(),
            paid: false,
            name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            address: String::new(),
            zip_code: String::new(),
            state: String::new(),
            country: String::new(),
            created_at: now,
            updated_at: now,
        };

        let order = Order::from(row);
        assert_eq!(order.status.as_str(), "some_future_status");
    }
}
