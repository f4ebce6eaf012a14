use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::{StoreError, StoreResult, SubmissionStore};
use crate::metrics::record_store_operation;
use crate::models::Submission;

/// MongoDB-backed submission log. Rows go into a single insert-only
/// collection; cleared status is derived with a filtered count.
pub struct MongoSubmissionStore {
    database: Database,
    collection: Collection<Submission>,
    timeout: Duration,
}

impl MongoSubmissionStore {
    pub const COLLECTION: &'static str = "submissions";

    pub fn new(database: Database, timeout: Duration) -> Self {
        let collection = database.collection::<Submission>(Self::COLLECTION);
        Self {
            database,
            collection,
            timeout,
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

#[async_trait]
impl SubmissionStore for MongoSubmissionStore {
    async fn append(&self, row: &Submission) -> StoreResult<()> {
        let result = tokio::time::timeout(self.timeout, self.collection.insert_one(row)).await;

        match result {
            Ok(Ok(_)) => {
                record_store_operation("append", "ok");
                Ok(())
            }
            Ok(Err(e)) => {
                record_store_operation("append", "error");
                Err(StoreError::Append(e.to_string()))
            }
            Err(_) => {
                record_store_operation("append", "timeout");
                Err(StoreError::Timeout(self.timeout_ms()))
            }
        }
    }

    async fn count_matching(
        &self,
        team_id: &str,
        problem_id: &str,
        is_clear: bool,
    ) -> StoreResult<u64> {
        let filter = doc! {
            "team_id": team_id,
            "problem_id": problem_id,
            "is_clear": is_clear,
        };

        let result =
            tokio::time::timeout(self.timeout, self.collection.count_documents(filter)).await;

        match result {
            Ok(Ok(count)) => {
                record_store_operation("count", "ok");
                Ok(count)
            }
            Ok(Err(e)) => {
                record_store_operation("count", "error");
                Err(StoreError::Query(e.to_string()))
            }
            Err(_) => {
                record_store_operation("count", "timeout");
                Err(StoreError::Timeout(self.timeout_ms()))
            }
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        tokio::time::timeout(self.timeout, self.database.run_command(doc! { "ping": 1 }))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout_ms()))?
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }
}
