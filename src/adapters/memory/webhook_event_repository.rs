//! In-memory implementation of the WebhookEventRepository port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{SaveResult, WebhookEventRecord, WebhookEventRepository};

/// In-memory processed-webhook store.
///
/// Mirrors the PostgreSQL adapter's conflict handling: a settled record
/// (success or ignored) wins over any later write for the same event id,
/// while a failed record may be replaced by the retry's outcome.
pub struct InMemoryWebhookEventRepository {
    records: RwLock<HashMap<String, WebhookEventRecord>>,
    fail: AtomicBool,
}

impl InMemoryWebhookEventRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with a database error.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored records.
    pub async fn all(&self) -> Vec<WebhookEventRecord> {
        self.records.read().await.values().cloned().collect()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::database("webhook event store unreachable"));
        }
        Ok(())
    }
}

impl Default for InMemoryWebhookEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.get(event_id).cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.get(&record.event_id) {
            Some(existing) if existing.result.is_settled() => Ok(SaveResult::AlreadyExists),
            _ => {
                records.insert(record.event_id.clone(), record);
                Ok(SaveResult::Inserted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryWebhookEventRepository::new();
        let record =
            WebhookEventRecord::success("evt_1", "customer.subscription.created", json!({}));

        assert_eq!(repo.save(record).await.unwrap(), SaveResult::Inserted);

        let found = repo.find_by_event_id("evt_1").await.unwrap().unwrap();
        assert_eq!(found.event_type, "customer.subscription.created");
        assert!(repo.find_by_event_id("evt_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn settled_record_wins_over_duplicate_save() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.save(WebhookEventRecord::success("evt_1", "t", json!({})))
            .await
            .unwrap();

        let result = repo
            .save(WebhookEventRecord::ignored("evt_1", "t", "dup", json!({})))
            .await
            .unwrap();

        assert_eq!(result, SaveResult::AlreadyExists);
        let found = repo.find_by_event_id("evt_1").await.unwrap().unwrap();
        assert!(found.detail.is_none());
    }

    #[tokio::test]
    async fn failed_record_is_replaced_by_retry_outcome() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.save(WebhookEventRecord::failed("evt_1", "t", "db down", json!({})))
            .await
            .unwrap();

        let result = repo
            .save(WebhookEventRecord::success("evt_1", "t", json!({})))
            .await
            .unwrap();

        assert_eq!(result, SaveResult::Inserted);
        let found = repo.find_by_event_id("evt_1").await.unwrap().unwrap();
        assert!(found.result.is_settled());
    }

    #[tokio::test]
    async fn set_fail_makes_operations_error() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.set_fail(true);
        assert!(repo.find_by_event_id("evt_1").await.is_err());
    }
}
