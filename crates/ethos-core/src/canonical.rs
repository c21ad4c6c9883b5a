//! Canonical JSON encoding for deterministic hashing and signing.
//!
//! This module converts a [`serde_json::Value`] into a single deterministic
//! byte sequence: two semantically equal values (same keys and values,
//! regardless of original key order) always produce identical bytes, and any
//! semantic difference produces different bytes. These bytes are the exact
//! input to hashing and signing, so the entire integrity guarantee rests on
//! the rules below being applied identically by signer and verifier.
//!
//! # Canonicalization Rules
//!
//! 1. Object keys are sorted lexicographically by their exact string value
//!    (UTF-8 byte order, which equals code-point order) at every nesting
//!    level
//! 2. No whitespace between tokens: `","` and `":"` separators only
//! 3. Strings are emitted with minimal JSON escaping and full UTF-8
//!    fidelity; non-ASCII characters are not escaped
//! 4. Numbers use `serde_json`'s shortest-round-trip formatting
//! 5. Empty containers encode as `{}` and `[]`
//!
//! # Recursion Limit
//!
//! To prevent stack overflow from deeply nested input, a maximum recursion
//! depth of 128 levels is enforced. Exceeding it is an error, never a panic.
//!
//! # Example
//!
//! ```
//! use ethos_core::canonical::canonical_json_bytes;
//! use serde_json::json;
//!
//! let value = json!({"zebra": 1, "apple": [true, null]});
//! let bytes = canonical_json_bytes(&value).unwrap();
//! assert_eq!(bytes, br#"{"apple":[true,null],"zebra":1}"#);
//! ```

use serde_json::Value;
use thiserror::Error;

/// Maximum nesting depth accepted by the canonicalizer.
pub const MAX_DEPTH: usize = 128;

/// Errors that can occur during canonical JSON encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanonicalizeError {
    /// The recursion depth limit was exceeded.
    ///
    /// Returned when the value is nested deeper than [`MAX_DEPTH`] levels.
    /// The limit exists to keep hostile input from overflowing the stack.
    #[error("recursion limit exceeded: value nested deeper than {max_depth} levels")]
    RecursionLimitExceeded {
        /// The maximum depth that was exceeded.
        max_depth: usize,
    },

    /// A scalar token could not be serialized.
    ///
    /// `serde_json` emits string and number tokens; a failure here indicates
    /// a value that cannot be represented in JSON at all.
    #[error("token serialization failed: {detail}")]
    Serialize {
        /// Description of the underlying serialization failure.
        detail: String,
    },
}

/// Encodes a JSON value into its canonical byte sequence.
///
/// # Errors
///
/// Returns [`CanonicalizeError::RecursionLimitExceeded`] for values nested
/// deeper than [`MAX_DEPTH`] levels, or [`CanonicalizeError::Serialize`] if
/// a scalar token cannot be emitted.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizeError> {
    let mut buf = Vec::with_capacity(128);
    write_canonical(value, &mut buf, 0)?;
    Ok(buf)
}

/// Emits a scalar token through `serde_json` so escaping and number
/// formatting match the ecosystem serializer exactly.
fn write_token<T: serde::Serialize>(token: &T, buf: &mut Vec<u8>) -> Result<(), CanonicalizeError> {
    serde_json::to_writer(&mut *buf, token).map_err(|e| CanonicalizeError::Serialize {
        detail: e.to_string(),
    })
}

fn write_canonical(
    value: &Value,
    buf: &mut Vec<u8>,
    depth: usize,
) -> Result<(), CanonicalizeError> {
    if depth > MAX_DEPTH {
        return Err(CanonicalizeError::RecursionLimitExceeded {
            max_depth: MAX_DEPTH,
        });
    }

    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => write_token(n, buf)?,
        Value::String(s) => write_token(s, buf)?,
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_canonical(item, buf, depth + 1)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            // Sorted explicitly rather than relying on the map's internal
            // ordering, which depends on serde_json feature flags.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by_key(|(key, _)| *key);

            buf.push(b'{');
            for (i, (key, child)) in entries.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_token(key, buf)?;
                buf.push(b':');
                write_canonical(child, buf, depth + 1)?;
            }
            buf.push(b'}');
        }
    }

    Ok(())
}
