//! `SequenceStore` capability backed by Postgres.
//!
//! Thin wrapper over the query functions in this crate; sqlx errors are
//! flattened into `StoreError` so the engine sees every failure as
//! store-unavailable.

use pga_sequence::{SequenceStore, StoreError};
use sqlx::PgPool;
use tracing::debug;

pub struct PgSequenceStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgSequenceStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

fn store_err(e: anyhow::Error) -> StoreError {
    StoreError::new(format!("{e:#}"))
}

impl SequenceStore for PgSequenceStore<'_> {
    async fn latest_identifier(
        &self,
        identifier_prefix: &str,
    ) -> Result<Option<String>, StoreError> {
        let latest = crate::latest_document_identifier(self.pool, identifier_prefix)
            .await
            .map_err(store_err)?;
        debug!(prefix = identifier_prefix, latest = ?latest, "latest identifier lookup");
        Ok(latest)
    }

    async fn counter_value(&self, sequence_name: &str) -> Result<Option<i64>, StoreError> {
        let row = crate::fetch_counter(self.pool, sequence_name)
            .await
            .map_err(store_err)?;
        Ok(row.map(|r| r.value))
    }

    async fn put_counter(&self, sequence_name: &str, value: i64) -> Result<(), StoreError> {
        crate::put_counter(self.pool, sequence_name, value)
            .await
            .map_err(store_err)
    }

    async fn bump_counter(&self, sequence_name: &str) -> Result<i64, StoreError> {
        crate::bump_counter(self.pool, sequence_name)
            .await
            .map_err(store_err)
    }
}
