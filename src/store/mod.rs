pub mod airtable;

use crate::attendance::record::StoredRecord;
use crate::config::StoreConfig;
use crate::database;
use crate::error::StoreError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Append-only attendance storage. Implementations never update or delete
/// rows and match `email` case-insensitively.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, record: &StoredRecord) -> Result<(), StoreError>;

    /// Most recent records for one user, newest first.
    async fn query_recent(
        &self,
        email: &str,
        limit: usize,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Action label of the user's newest record.
    async fn query_latest(&self, email: &str) -> Result<Option<String>, StoreError> {
        let mut records = self.query_recent(email, 1).await?;
        Ok(records.pop().map(|record| record.action))
    }
}

pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match config {
        StoreConfig::Sqlite { database_url } => {
            let pool = database::create_connection(database_url).await?;
            tracing::info!("Using SQLite record store at {}", database_url);
            Ok(Arc::new(database::SqliteStore::new(pool)))
        }
        StoreConfig::Airtable(settings) => {
            tracing::info!(
                "Using Airtable record store base={} table={}",
                settings.base_id,
                settings.table_id
            );
            Ok(Arc::new(airtable::AirtableStore::new(settings.clone())?))
        }
    }
}
