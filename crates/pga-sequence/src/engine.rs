use tracing::warn;

use crate::format::{format_identifier, parse_identifier};
use crate::store::SequenceStore;
use crate::{MintedIdentifier, ReconcileError, ReconcileOutcome, TargetSource};

fn validate_args(sequence_name: &str, identifier_prefix: &str) -> Result<(), ReconcileError> {
    if sequence_name.trim().is_empty() {
        return Err(ReconcileError::InvalidArgument(
            "sequence_name must not be empty".to_string(),
        ));
    }
    if identifier_prefix.trim().is_empty() {
        return Err(ReconcileError::InvalidArgument(
            "identifier_prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Deterministic target derivation:
/// - no latest identifier => 0 (fresh system)
/// - identifier matches `<prefix>-<digits>` => its numeric suffix
/// - anything else => 0, recorded as a malformed-identifier fallback
pub fn derive_target(identifier_prefix: &str, latest: Option<&str>) -> TargetSource {
    match latest {
        None => TargetSource::NoRecords,
        Some(raw) => match parse_identifier(identifier_prefix, raw) {
            Some(suffix) => TargetSource::Parsed { suffix },
            None => TargetSource::MalformedIdentifier {
                raw: raw.to_string(),
            },
        },
    }
}

/// Reconcile the counter for `sequence_name` against the latest identifier
/// in the `identifier_prefix` family.
///
/// Read-then-write: look up the latest identifier, derive the target value,
/// read the previous counter value (if any), then upsert the target
/// unconditionally. Safe to run repeatedly: a second run with no
/// intervening record changes re-writes the same value.
///
/// "No records found" is a valid state and yields `new_value = 0`. A
/// malformed latest identifier also yields 0; it is logged at WARN and
/// surfaced in [`ReconcileOutcome::source`], never as an error. Store
/// failures abort before any counter write.
pub async fn reconcile<S: SequenceStore>(
    store: &S,
    sequence_name: &str,
    identifier_prefix: &str,
) -> Result<ReconcileOutcome, ReconcileError> {
    validate_args(sequence_name, identifier_prefix)?;

    let latest = store.latest_identifier(identifier_prefix).await?;
    let source = derive_target(identifier_prefix, latest.as_deref());

    if let TargetSource::MalformedIdentifier { raw } = &source {
        warn!(
            sequence = sequence_name,
            identifier = raw.as_str(),
            "latest identifier does not match {identifier_prefix}-<digits>; counter resets to 0"
        );
    }

    let previous_value = store.counter_value(sequence_name).await?;
    let new_value = source.value();
    store.put_counter(sequence_name, new_value).await?;

    Ok(ReconcileOutcome {
        sequence_name: sequence_name.to_string(),
        previous_value,
        new_value,
        source,
    })
}

/// Mint the next identifier in the family.
///
/// Increments the counter through the store (atomic on the store side,
/// creating the counter at 1 when absent) and formats the result. After a
/// clean [`reconcile`], the minted suffix is `counter + 1` and never
/// collides with a historical identifier.
pub async fn mint<S: SequenceStore>(
    store: &S,
    sequence_name: &str,
    identifier_prefix: &str,
) -> Result<MintedIdentifier, ReconcileError> {
    validate_args(sequence_name, identifier_prefix)?;

    let value = store.bump_counter(sequence_name).await?;

    Ok(MintedIdentifier {
        sequence_name: sequence_name.to_string(),
        identifier: format_identifier(identifier_prefix, value),
        value,
    })
}
