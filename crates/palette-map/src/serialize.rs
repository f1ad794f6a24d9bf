//! Token stream serialization.
//!
//! The per-cell tokens are joined with a single comma, no trailing
//! delimiter, no whitespace. Splitting on the comma recovers the exact
//! token sequence, so the serialized form is fully invertible given the
//! grid dimensions and traversal order.

/// Join tokens into the serialized wire string.
pub fn serialize_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(token.as_ref());
    }
    out
}

/// Split a serialized wire string back into its token sequence.
///
/// Inverse of [`serialize_tokens`] for any non-empty token sequence.
pub fn split_tokens(data: &str) -> Vec<&str> {
    if data.is_empty() {
        return Vec::new();
    }
    data.split(',').collect()
}
