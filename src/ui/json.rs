//! JSON encoding helpers.
//!
//! Result types derive `Serialize`, so keys come out in field declaration
//! order. Percentages and rates go through [`two_decimals`] to get the
//! fixed `12.30` form that consumers and golden files expect.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::{HostError, Result};

/// Serialize an `f64` as a JSON number with exactly two decimals.
///
/// Non-finite values have no JSON form and are written as `null`.
pub fn two_decimals<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !value.is_finite() {
        return serializer.serialize_none();
    }
    let raw = RawValue::from_string(format!("{:.2}", value)).map_err(S::Error::custom)?;
    raw.serialize(serializer)
}

/// Encode a result object as compact JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(HostError::from)
}

/// `{"error":"<code>"}` payload
pub fn error_payload(code: &str) -> String {
    serde_json::json!({ "error": code }).to_string()
}
