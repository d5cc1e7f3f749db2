//! pga-roles
//!
//! Idempotent role permission-set reconciliation.
//!
//! Architectural decisions:
//! - Audit never mutates; reconcile writes the union only
//! - Unexpected permissions are reported, never revoked
//! - Output ordering is stable (sorted, deduplicated)
//!
//! Deterministic, pure logic. No IO. Store access lives in pga-db.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Evidence from auditing one role against a required permission set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionReport {
    pub role_name: String,

    /// Required permissions the role does not hold (sorted).
    pub missing: Vec<String>,

    /// Permissions the role holds beyond the required set (sorted).
    /// Informational only; reconciliation never removes them.
    pub unexpected: Vec<String>,
}

impl PermissionReport {
    /// `true` when the role already covers the required set.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Audit a role's current permissions against the required set.
///
/// Inputs may contain duplicates and arrive in any order; the report is
/// sorted and deduplicated so the same inputs always produce the same
/// output.
pub fn audit(role_name: &str, current: &[String], required: &[String]) -> PermissionReport {
    let have: BTreeSet<&str> = current.iter().map(String::as_str).collect();
    let want: BTreeSet<&str> = required.iter().map(String::as_str).collect();

    let missing: Vec<String> = want
        .difference(&have)
        .map(|p| p.to_string())
        .collect();
    let unexpected: Vec<String> = have
        .difference(&want)
        .map(|p| p.to_string())
        .collect();

    PermissionReport {
        role_name: role_name.to_string(),
        missing,
        unexpected,
    }
}

/// The write-back value for reconciliation: union of current and required,
/// sorted and deduplicated. Applying the plan twice is a no-op.
pub fn apply_plan(current: &[String], required: &[String]) -> Vec<String> {
    let mut union: BTreeSet<String> = current.iter().cloned().collect();
    union.extend(required.iter().cloned());
    union.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn audit_covered_role_is_clean() {
        let r = audit(
            "admin",
            &perms(&["pedidos.read", "pedidos.write"]),
            &perms(&["pedidos.read"]),
        );
        assert!(r.is_clean());
        assert_eq!(r.unexpected, perms(&["pedidos.write"]));
    }

    #[test]
    fn audit_reports_missing_sorted() {
        let r = audit(
            "ventas",
            &perms(&["cotizaciones.read"]),
            &perms(&["pedidos.write", "pedidos.read"]),
        );
        assert!(!r.is_clean());
        assert_eq!(r.missing, perms(&["pedidos.read", "pedidos.write"]));
    }

    #[test]
    fn audit_dedupes_inputs() {
        let r = audit(
            "ventas",
            &perms(&["pedidos.read", "pedidos.read"]),
            &perms(&["pedidos.read", "pedidos.read", "pedidos.write"]),
        );
        assert_eq!(r.missing, perms(&["pedidos.write"]));
        assert!(r.unexpected.is_empty());
    }

    #[test]
    fn apply_plan_is_idempotent() {
        let current = perms(&["cotizaciones.read"]);
        let required = perms(&["pedidos.read", "pedidos.write"]);

        let once = apply_plan(&current, &required);
        let twice = apply_plan(&once, &required);
        assert_eq!(once, twice);
        assert_eq!(
            once,
            perms(&["cotizaciones.read", "pedidos.read", "pedidos.write"])
        );
    }

    #[test]
    fn apply_plan_never_removes() {
        let current = perms(&["legacy.export"]);
        let required = perms(&["pedidos.read"]);
        let plan = apply_plan(&current, &required);
        assert!(plan.contains(&"legacy.export".to_string()));
    }
}
