//! Stable digests of plain values, for build-cache fingerprints.

use serde_json::Value;

/// BLAKE3 digest (hex) of the compact JSON encoding of `value`.
///
/// Object keys are emitted in sorted order, so two values that compare equal
/// always produce the same checksum.
///
/// ```
/// use quill_core::checksum;
/// use serde_json::json;
///
/// assert_eq!(checksum(&json!({"a": 1, "b": 2})), checksum(&json!({"b": 2, "a": 1})));
/// assert_ne!(checksum(&json!([1, 2])), checksum(&json!([2, 1])));
/// ```
pub fn checksum(value: &Value) -> String {
    blake3::hash(value.to_string().as_bytes()).to_string()
}
