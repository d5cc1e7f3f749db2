//! pga-testkit
//!
//! In-memory `SequenceStore` fake for unit and scenario testing. The
//! reconciler receives its store capability from the caller, so tests can
//! inject this fake instead of a live database.
//!
//! The fake counts store calls (to prove argument validation happens
//! before any store access) and supports failure injection (to exercise
//! the store-unavailable path).

use pga_sequence::{SequenceStore, StoreError};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    latest: Option<String>,
    counters: BTreeMap<String, i64>,
    fail_reason: Option<String>,
    calls: u32,
}

/// In-memory store with one identifier family.
#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
}

impl FakeStore {
    /// A store with no documents and no counters (fresh system).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store whose most-recently-created document carries `identifier`.
    pub fn with_latest(identifier: &str) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().latest = Some(identifier.to_string());
        store
    }

    /// Pre-seed a counter row.
    pub fn seed_counter(&self, sequence_name: &str, value: i64) {
        self.inner
            .lock()
            .unwrap()
            .counters
            .insert(sequence_name.to_string(), value);
    }

    /// Make every subsequent store call fail with the given reason.
    pub fn fail_with(&self, reason: &str) {
        self.inner.lock().unwrap().fail_reason = Some(reason.to_string());
    }

    /// Number of store calls made so far.
    pub fn call_count(&self) -> u32 {
        self.inner.lock().unwrap().calls
    }

    /// Current value of a counter, if the row exists.
    pub fn counter(&self, sequence_name: &str) -> Option<i64> {
        self.inner.lock().unwrap().counters.get(sequence_name).copied()
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if let Some(reason) = &inner.fail_reason {
            return Err(StoreError::new(reason.clone()));
        }
        Ok(inner)
    }
}

impl SequenceStore for FakeStore {
    async fn latest_identifier(
        &self,
        _identifier_prefix: &str,
    ) -> Result<Option<String>, StoreError> {
        let inner = self.enter()?;
        Ok(inner.latest.clone())
    }

    async fn counter_value(&self, sequence_name: &str) -> Result<Option<i64>, StoreError> {
        let inner = self.enter()?;
        Ok(inner.counters.get(sequence_name).copied())
    }

    async fn put_counter(&self, sequence_name: &str, value: i64) -> Result<(), StoreError> {
        let mut inner = self.enter()?;
        inner.counters.insert(sequence_name.to_string(), value);
        Ok(())
    }

    async fn bump_counter(&self, sequence_name: &str) -> Result<i64, StoreError> {
        let mut inner = self.enter()?;
        let v = inner.counters.entry(sequence_name.to_string()).or_insert(0);
        *v += 1;
        Ok(*v)
    }
}
