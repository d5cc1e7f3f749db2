//! Identifier format: `<PREFIX>-<digits>`, suffix zero-padded to a fixed
//! minimum width (`PED-00001`). Parsing is strict: exact prefix, one dash,
//! ASCII digits only. Anything else is "no usable sequence found".

/// Minimum digit width of a formatted identifier suffix.
pub const SUFFIX_PAD_WIDTH: usize = 5;

/// Format `value` as an identifier in the given family.
///
/// The suffix is zero-padded to [`SUFFIX_PAD_WIDTH`] digits and grows past
/// that width rather than truncating.
pub fn format_identifier(prefix: &str, value: i64) -> String {
    format!("{prefix}-{value:0width$}", width = SUFFIX_PAD_WIDTH)
}

/// Parse an identifier against `^<prefix>-<digits>$`.
///
/// Returns the numeric suffix, or `None` when the identifier does not
/// belong to the family or the suffix is not a plain unsigned number.
/// Suffixes too large for `i64` are treated as malformed, not as errors.
pub fn parse_identifier(prefix: &str, identifier: &str) -> Option<i64> {
    let rest = identifier.strip_prefix(prefix)?;
    let digits = rest.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()
}
