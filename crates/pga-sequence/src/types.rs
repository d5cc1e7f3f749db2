use serde::{Deserialize, Serialize};

/// How a reconcile target value was derived from the latest identifier.
///
/// Carried in [`ReconcileOutcome`] so operators can distinguish a genuine
/// fresh-system zero from a malformed-identifier fallback zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// The latest identifier matched `<PREFIX>-<digits>`; the target is its
    /// numeric suffix.
    Parsed { suffix: i64 },

    /// No document in the family carries an identifier yet (fresh system).
    NoRecords,

    /// The latest identifier did not match the expected pattern. The raw
    /// value is kept as evidence; the target falls back to zero.
    MalformedIdentifier { raw: String },
}

impl TargetSource {
    /// The counter value this derivation prescribes.
    pub fn value(&self) -> i64 {
        match self {
            TargetSource::Parsed { suffix } => *suffix,
            TargetSource::NoRecords => 0,
            TargetSource::MalformedIdentifier { .. } => 0,
        }
    }

    /// `true` when the target came from a well-formed identifier.
    pub fn is_parsed(&self) -> bool {
        matches!(self, TargetSource::Parsed { .. })
    }
}

/// Result of one reconcile run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// The counter's key.
    pub sequence_name: String,

    /// Counter value before the write. `None` means the counter row did not
    /// exist and was created by this reconcile.
    pub previous_value: Option<i64>,

    /// Counter value after the write.
    pub new_value: i64,

    /// How `new_value` was derived.
    pub source: TargetSource,
}

impl ReconcileOutcome {
    /// `true` when the write re-set the value the counter already held.
    pub fn is_noop(&self) -> bool {
        self.previous_value == Some(self.new_value)
    }
}

/// Result of minting one identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedIdentifier {
    /// The counter's key.
    pub sequence_name: String,

    /// The formatted identifier, e.g. `PED-00043`.
    pub identifier: String,

    /// The counter value backing the identifier's numeric suffix.
    pub value: i64,
}
