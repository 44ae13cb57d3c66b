//! Field-level checks shared by the request payloads.
//!
//! Each check names the request field it validates so the resulting
//! [Error::Validation] can be shown next to the offending input.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::{Date, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";
const DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// Unwrap a required field or report it as missing.
pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(|| Error::validation(field, REQUIRED_MESSAGE))
}

/// Treat a blank query parameter as if it was not sent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Reject `value` if it is longer than `max_length` user-perceived characters.
pub(crate) fn check_max_length(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), Error> {
    if value.graphemes(true).count() > max_length {
        return Err(Error::validation(
            field,
            format!("Ensure this field has no more than {max_length} characters."),
        ));
    }

    Ok(())
}

/// Parse an ISO 8601 calendar date, e.g. "2025-05-17".
pub(crate) fn parse_date(field: &'static str, value: &str) -> Result<Date, Error> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::validation(field, DATE_FORMAT_MESSAGE))
}

/// Parse a date sent as a JSON value. Only strings can hold a date.
pub(crate) fn date_value(field: &'static str, value: &Value) -> Result<Date, Error> {
    match value {
        Value::String(text) => parse_date(field, text),
        _ => Err(Error::validation(field, DATE_FORMAT_MESSAGE)),
    }
}

/// Take the text out of a JSON string value.
pub(crate) fn string_value(field: &'static str, value: Value) -> Result<String, Error> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(Error::validation(field, "Not a valid string.")),
    }
}

/// The name of a JSON value's type for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize a field that distinguishes between absent and explicit `null`.
///
/// Use together with `#[serde(default)]`: an absent key becomes `None`,
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
