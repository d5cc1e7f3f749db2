//! Target derivation at the public API surface.

use pga_sequence::{derive_target, format_identifier, TargetSource};

#[test]
fn latest_identifier_drives_target() {
    assert_eq!(
        derive_target("PED", Some("PED-00042")),
        TargetSource::Parsed { suffix: 42 }
    );
}

#[test]
fn formatted_identifiers_always_parse_back() {
    for n in [0i64, 1, 9, 99_999, 100_000, 987_654_321] {
        let id = format_identifier("PED", n);
        assert_eq!(
            derive_target("PED", Some(&id)),
            TargetSource::Parsed { suffix: n },
            "identifier={id}"
        );
    }
}

#[test]
fn absent_and_malformed_both_prescribe_zero() {
    assert_eq!(derive_target("PED", None).value(), 0);
    assert_eq!(derive_target("PED", Some("PED-abc")).value(), 0);
    assert_eq!(derive_target("PED", Some("XYZ-001")).value(), 0);
}
