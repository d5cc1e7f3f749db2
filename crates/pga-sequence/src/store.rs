use crate::StoreError;

/// Narrow store capability consumed by the sequence engine.
///
/// Only the operations the engine actually needs: latest-identifier lookup
/// for one family, and counter get/put/bump by key. Concrete impls live
/// outside this crate (Postgres in pga-db, in-memory fake in pga-testkit);
/// the engine never constructs its own connection.
#[allow(async_fn_in_trait)]
pub trait SequenceStore {
    /// Identifier of the most-recently-created document in the family, or
    /// `None` when no document carries an identifier yet.
    async fn latest_identifier(&self, identifier_prefix: &str)
        -> Result<Option<String>, StoreError>;

    /// Current counter value, or `None` when the counter row does not exist.
    async fn counter_value(&self, sequence_name: &str) -> Result<Option<i64>, StoreError>;

    /// Idempotent upsert: create the counter at `value` or overwrite it
    /// unconditionally.
    async fn put_counter(&self, sequence_name: &str, value: i64) -> Result<(), StoreError>;

    /// Atomically increment the counter (creating it at 1 when absent) and
    /// return the new value.
    async fn bump_counter(&self, sequence_name: &str) -> Result<i64, StoreError>;
}
