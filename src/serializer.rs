//! Exchange-format serialization.
//!
//! The AST's field types are the wire schema (see [`crate::ast`]):
//! arrays, booleans, and numbers are whatever the node structs declare,
//! and every other field serializes as an escaped JSON string. A new
//! node field is classified the moment it is declared; there is no
//! structural sniffing of values at serialization time.

use crate::ast::Root;

/// Error produced when the tree cannot be rendered as JSON.
#[derive(Debug, thiserror::Error)]
#[error("failed to serialize AST: {0}")]
pub struct SerializeError(#[from] serde_json::Error);

/// Serialize a parsed tree to compact JSON.
///
/// # Errors
///
/// Returns `SerializeError` if the underlying JSON writer fails; with
/// the tree built by [`crate::parse`] this cannot happen in practice.
pub fn to_json(root: &Root) -> Result<String, SerializeError> {
    Ok(serde_json::to_string(root)?)
}

/// Serialize a parsed tree to human-readable, indented JSON.
///
/// # Errors
///
/// Returns `SerializeError` if the underlying JSON writer fails.
pub fn to_json_pretty(root: &Root) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(root)?)
}
