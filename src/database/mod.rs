pub mod migrations;
pub mod models;
pub mod queries;

use crate::attendance::record::StoredRecord;
use crate::error::StoreError;
use crate::store::RecordStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use std::time::Duration;

pub async fn create_connection(database_url: &str) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // Every connection to an in-memory database gets its own empty database.
    let in_memory = database_url.contains(":memory:");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(connect_options).await?;

    // Run migrations
    migrations::run_migrations(&pool).await?;

    Ok(pool)
}

/// Tabular-database backend for the record store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn append(&self, record: &StoredRecord) -> Result<(), StoreError> {
        queries::insert_attendance_record(&self.pool, record).await?;
        Ok(())
    }

    async fn query_recent(
        &self,
        email: &str,
        limit: usize,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let rows = queries::get_recent_records(&self.pool, email, limit).await?;
        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }

    async fn query_latest(&self, email: &str) -> Result<Option<String>, StoreError> {
        Ok(queries::get_latest_action(&self.pool, email).await?)
    }
}
