//! Positional result rows shared by every engine.
//!
//! Each client converts its native row into a `Vec<serde_json::Value>`
//! holding strings, integers, booleans or nulls. Dialect decoders then read
//! fields by position through the helpers below, which tolerate the small
//! representation differences between drivers (an integer flag may arrive
//! as `1` or `"1"`, a text column as a byte string turned into text).

use serde_json::Value;

use crate::errors::GenError;

pub type Row = Vec<Value>;

/// Fails unless `row` has exactly `expected` fields.
pub fn expect_width(row: &Row, expected: usize, what: &str) -> Result<(), GenError> {
    if row.len() != expected {
        return Err(GenError::Query(format!(
            "{} row has {} fields, expected {}",
            what,
            row.len(),
            expected
        )));
    }
    Ok(())
}

/// A non-null driver value none of the supported Rust types could decode.
pub fn undecodable(idx: usize, type_name: &str) -> GenError {
    GenError::Query(format!(
        "field {} has unsupported type {}",
        idx, type_name
    ))
}

fn field<'a>(row: &'a Row, idx: usize) -> Result<&'a Value, GenError> {
    row.get(idx)
        .ok_or_else(|| GenError::Query(format!("missing field {} in row", idx)))
}

/// Nullable text field.
pub fn opt_text(row: &Row, idx: usize) -> Result<Option<String>, GenError> {
    match field(row, idx)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(GenError::Query(format!(
            "field {} is not text: {}",
            idx, other
        ))),
    }
}

/// Non-null text field.
pub fn text(row: &Row, idx: usize) -> Result<String, GenError> {
    opt_text(row, idx)?.ok_or_else(|| GenError::Query(format!("field {} is null", idx)))
}

/// Text field where null reads as empty.
pub fn text_or_empty(row: &Row, idx: usize) -> Result<String, GenError> {
    Ok(opt_text(row, idx)?.unwrap_or_default())
}

/// Non-null integer field.
pub fn int(row: &Row, idx: usize) -> Result<i64, GenError> {
    match field(row, idx)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| GenError::Query(format!("field {} is not an integer: {}", idx, n))),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| GenError::Query(format!("field {} is not an integer: {}", idx, s))),
        other => Err(GenError::Query(format!(
            "field {} is not an integer: {}",
            idx, other
        ))),
    }
}
