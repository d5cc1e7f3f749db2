use std::fmt;

/// Failure reported by a [`SequenceStore`][crate::SequenceStore] capability.
///
/// Carries a human-readable reason only; the engine maps every store
/// failure to [`ReconcileError::StoreUnavailable`]. Store implementations
/// decide what detail to surface (connection refused, timeout, etc.).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreError {
    reason: String,
}

impl StoreError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.reason)
    }
}

impl std::error::Error for StoreError {}

/// Failure surfaced by [`reconcile`][crate::reconcile] and
/// [`mint`][crate::mint].
///
/// Per-record parse mismatches are NOT here: a malformed latest identifier
/// degrades to the zero-value fallback
/// ([`TargetSource::MalformedIdentifier`][crate::TargetSource]) and never
/// propagates as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// Bad input: empty sequence name or identifier prefix. Raised before
    /// any store call is made.
    InvalidArgument(String),

    /// The record store could not be reached or the call failed.
    StoreUnavailable(String),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ReconcileError::StoreUnavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ReconcileError {}

impl From<StoreError> for ReconcileError {
    fn from(e: StoreError) -> Self {
        ReconcileError::StoreUnavailable(e.reason().to_string())
    }
}
