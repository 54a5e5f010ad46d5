//! Identifier format checks.

/// Length of a hex-encoded 12-byte object identifier.
pub const OBJECT_ID_LEN: usize = 24;

/// Returns `true` when `id` is a 24-character hexadecimal object identifier.
pub fn is_object_id(id: &str) -> bool {
    id.len() == OBJECT_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}
