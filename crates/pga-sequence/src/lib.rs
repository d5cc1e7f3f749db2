//! pga-sequence
//!
//! Sequential document-number issuance and drift reconciliation.
//!
//! Architectural decisions:
//! - Counter state is owned by the record store, never cached in-process
//! - Reconcile trusts the single most-recently-created identifier
//! - Malformed identifiers degrade to a zero target, never to a failure
//! - Counter write is an unconditional idempotent upsert
//! - Store access flows through the `SequenceStore` capability only
//!
//! Target derivation is deterministic, pure logic. The only IO happens
//! inside the capability supplied by the caller.

mod engine;
mod error;
mod format;
mod store;
mod types;

pub use engine::{derive_target, mint, reconcile};
pub use error::{ReconcileError, StoreError};
pub use format::{format_identifier, parse_identifier, SUFFIX_PAD_WIDTH};
pub use store::SequenceStore;
pub use types::*;
