//! Field parser/validator: typed extraction of fields from untyped JSON objects.
//!
//! Scalar `try_*` parsers turn one raw JSON value into a typed value or a
//! conversion error text. [`JsonObjectExt`] applies them per field with the
//! mandatory/optional policy and attaches the key and label to any failure.
//!
//! `null` is treated exactly like an absent property.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::custom_data::CustomData;
use crate::error::{FieldError, ParseError};
use crate::hooks::SerializeHooks;
use crate::set::ValueSet;
use crate::value_object::JsonValueObject;

/// Untyped JSON object as received from the wire.
pub type JsonObject = Map<String, Value>;

/// Wire name of the extension payload carried by every value object.
pub const CUSTOM_DATA: &str = "customData";

// ----------------------------------------------------------------------------
// Scalar parsers
// ----------------------------------------------------------------------------

/// A JSON string, trimmed. May be empty.
pub fn try_text(raw: &Value) -> Result<String, String> {
    match raw {
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(format!("expected a string, got {other}")),
    }
}

pub fn try_bool(raw: &Value) -> Result<bool, String> {
    raw.as_bool()
        .ok_or_else(|| format!("expected a boolean, got {raw}"))
}

fn try_integer(raw: &Value) -> Result<i64, String> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("expected an integer, got {n}")),
        other => Err(format!("expected an integer, got {other}")),
    }
}

pub fn try_i32(raw: &Value) -> Result<i32, String> {
    let n = try_integer(raw)?;
    i32::try_from(n).map_err(|e| format!("{n}: {e}"))
}

pub fn try_u32(raw: &Value) -> Result<u32, String> {
    let n = try_integer(raw)?;
    u32::try_from(n).map_err(|e| format!("{n}: {e}"))
}

pub fn try_u8(raw: &Value) -> Result<u8, String> {
    let n = try_integer(raw)?;
    u8::try_from(n).map_err(|e| format!("{n}: {e}"))
}

/// A JSON number as an exact decimal. Scientific notation is accepted.
pub fn try_decimal(raw: &Value) -> Result<Decimal, String> {
    match raw {
        Value::Number(n) => {
            let literal = n.to_string();
            Decimal::from_str(&literal)
                .or_else(|_| Decimal::from_scientific(&literal))
                .map_err(|e| format!("{literal}: {e}"))
        }
        other => Err(format!("expected a number, got {other}")),
    }
}

/// An RFC 3339 timestamp string, normalised to UTC.
pub fn try_timestamp(raw: &Value) -> Result<DateTime<Utc>, String> {
    let text = raw
        .as_str()
        .ok_or_else(|| format!("expected a timestamp string, got {raw}"))?;
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("{text}: {e}"))
}

/// A string naming an enumeration member, using the type's serde wire names.
pub fn try_enum<E: DeserializeOwned>(raw: &Value) -> Result<E, String> {
    match raw {
        Value::String(s) => serde_json::from_value(Value::String(s.trim().to_string())).map_err(|e| e.to_string()),
        other => Err(format!("expected a string, got {other}")),
    }
}

// ----------------------------------------------------------------------------
// Emission helpers
// ----------------------------------------------------------------------------

/// A decimal as a JSON number literal with every digit and its scale kept.
///
/// Relies on serde_json's `arbitrary_precision`, so nothing passes through `f64`.
pub fn decimal_to_json(value: &Decimal) -> Value {
    serde_json::Number::from_str(&value.to_string())
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Wire spelling of an enumeration member.
pub fn enum_to_json<E: Serialize>(value: &E) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

pub fn timestamp_to_json(value: &DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Emit a collection of value objects as a JSON array, applying `hooks` to
/// every element.
pub fn objects_to_json<'a, T, I>(items: I, hooks: &SerializeHooks) -> Value
where
    T: JsonValueObject,
    I: IntoIterator<Item = &'a T>,
{
    Value::Array(items.into_iter().map(|item| item.to_json_with(hooks)).collect())
}

/// Insert the `customData` property when an extension payload is present.
pub fn put_custom_data(json: &mut JsonObject, custom_data: Option<&CustomData>, hooks: &SerializeHooks) {
    if let Some(custom_data) = custom_data {
        json.insert(CUSTOM_DATA.to_string(), custom_data.to_json_with(hooks));
    }
}

// ----------------------------------------------------------------------------
// Field parsers
// ----------------------------------------------------------------------------

/// Per-field parsing over a JSON object.
pub trait JsonObjectExt {
    /// The raw value of `key`, with `null` treated as absent.
    fn present(&self, key: &str) -> Option<&Value>;

    fn parse_mandatory<T, F>(&self, key: &str, label: &str, try_parse: F) -> Result<T, FieldError>
    where
        F: FnOnce(&Value) -> Result<T, String>,
    {
        let raw = self.present(key).ok_or_else(|| FieldError::missing(key, label))?;
        try_parse(raw).map_err(|detail| FieldError::invalid(key, label, detail))
    }

    /// Absence is success with `None`; a present but invalid value is an error.
    fn parse_optional<T, F>(&self, key: &str, label: &str, try_parse: F) -> Result<Option<T>, FieldError>
    where
        F: FnOnce(&Value) -> Result<T, String>,
    {
        match self.present(key) {
            None => Ok(None),
            Some(raw) => try_parse(raw)
                .map(Some)
                .map_err(|detail| FieldError::invalid(key, label, detail)),
        }
    }

    /// Trimmed free text that must not be empty.
    fn parse_mandatory_text(&self, key: &str, label: &str) -> Result<String, FieldError> {
        let text = self.parse_mandatory(key, label, try_text)?;
        if text.is_empty() {
            return Err(FieldError::invalid(key, label, "must not be empty"));
        }
        Ok(text)
    }

    /// Trimmed free text; empty-after-trim counts as absent.
    fn parse_optional_text(&self, key: &str, label: &str) -> Result<Option<String>, FieldError> {
        Ok(self
            .parse_optional(key, label, try_text)?
            .filter(|text| !text.is_empty()))
    }

    fn parse_mandatory_object<T: JsonValueObject>(&self, key: &str, label: &str) -> Result<T, FieldError> {
        let raw = self.present(key).ok_or_else(|| FieldError::missing(key, label))?;
        T::try_parse(raw, None).map_err(|e| FieldError::nested(key, label, e))
    }

    fn parse_optional_object<T: JsonValueObject>(&self, key: &str, label: &str) -> Result<Option<T>, FieldError> {
        match self.present(key) {
            None => Ok(None),
            Some(raw) => T::try_parse(raw, None)
                .map(Some)
                .map_err(|e| FieldError::nested(key, label, e)),
        }
    }

    /// A JSON array parsed into an ordered sequence. Must be present; may be empty.
    fn parse_mandatory_list<T: JsonValueObject>(&self, key: &str, label: &str) -> Result<Vec<T>, FieldError> {
        let raw = self.present(key).ok_or_else(|| FieldError::missing(key, label))?;
        parse_elements(key, label, raw)
    }

    fn parse_optional_list<T: JsonValueObject>(&self, key: &str, label: &str) -> Result<Option<Vec<T>>, FieldError> {
        self.present(key)
            .map(|raw| parse_elements(key, label, raw))
            .transpose()
    }

    /// A JSON array parsed into a deduplicated set. Must be present; may be empty.
    fn parse_mandatory_set<T: JsonValueObject>(&self, key: &str, label: &str) -> Result<ValueSet<T>, FieldError> {
        self.parse_mandatory_list(key, label)
            .map(|items| items.into_iter().collect())
    }

    fn parse_optional_set<T: JsonValueObject>(&self, key: &str, label: &str) -> Result<Option<ValueSet<T>>, FieldError> {
        Ok(self
            .parse_optional_list(key, label)?
            .map(|items| items.into_iter().collect()))
    }

    fn parse_custom_data(&self) -> Result<Option<CustomData>, FieldError> {
        self.parse_optional_object(CUSTOM_DATA, "custom data")
    }
}

impl JsonObjectExt for JsonObject {
    fn present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| !value.is_null())
    }
}

/// Each element is parsed on its own; one bad element fails the whole field.
fn parse_elements<T: JsonValueObject>(key: &str, label: &str, raw: &Value) -> Result<Vec<T>, FieldError> {
    let elements = raw
        .as_array()
        .ok_or_else(|| FieldError::invalid(key, label, format!("expected a JSON array, got {raw}")))?;

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            T::try_parse(element, None).map_err(|e| match e {
                ParseError::Invariant { source, .. } => FieldError::Invariant(source),
                ParseError::Invalid { detail, .. } => FieldError::invalid_element(key, label, index, detail),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("fixture must be an object"),
        }
    }

    #[test]
    fn mandatory_missing_names_key_and_label() {
        let json = object(json!({}));
        let err = json.parse_mandatory("evseId", "EVSE identification", try_u32).unwrap_err();
        assert_eq!(err, FieldError::missing("evseId", "EVSE identification"));
        assert!(err.to_string().contains("evseId"));
    }

    #[test]
    fn optional_absent_is_not_conflated_with_invalid() {
        let json = object(json!({"isGridCritical": "yes"}));
        assert_eq!(json.parse_optional("isLocalGeneration", "local generation", try_bool), Ok(None));
        assert!(json.parse_optional("isGridCritical", "grid critical", try_bool).is_err());
    }

    #[test]
    fn null_counts_as_absent() {
        let json = object(json!({"instance": null}));
        assert_eq!(json.parse_optional_text("instance", "instance"), Ok(None));
        assert!(matches!(
            json.parse_mandatory_text("instance", "instance"),
            Err(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn text_is_trimmed_and_empty_optional_becomes_absent() {
        let json = object(json!({"name": "  EVSE  ", "instance": "   "}));
        assert_eq!(json.parse_mandatory_text("name", "name"), Ok("EVSE".to_string()));
        assert_eq!(json.parse_optional_text("instance", "instance"), Ok(None));
    }

    #[test]
    fn malformed_literal_includes_conversion_error() {
        let json = object(json!({"connectorId": -1}));
        let err = json.parse_mandatory("connectorId", "connector", try_u32).unwrap_err();
        match err {
            FieldError::Invalid { key, detail, .. } => {
                assert_eq!(key, "connectorId");
                assert!(detail.starts_with("-1"));
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn decimals_accept_scientific_and_reject_strings() {
        assert_eq!(try_decimal(&json!(1.5)), Ok(Decimal::new(15, 1)));
        assert_eq!(try_decimal(&json!(1e3)), Ok(Decimal::from(1000)));
        assert!(try_decimal(&json!("1.5")).is_err());
    }

    #[test]
    fn timestamps_are_normalised_to_utc() {
        let ts = try_timestamp(&json!("2024-05-01T12:00:00+02:00")).unwrap();
        assert_eq!(timestamp_to_json(&ts), json!("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn integral_decimals_emit_as_integers() {
        assert_eq!(decimal_to_json(&Decimal::from(22000)), json!(22000));
        assert_eq!(decimal_to_json(&Decimal::new(1210, 1)), json!(121.0));
    }

    #[test]
    fn decimals_keep_every_digit() {
        let raw: Value = serde_json::from_str("12345678901234567.5").unwrap();
        let value = try_decimal(&raw).unwrap();
        assert_eq!(value, Decimal::from_str("12345678901234567.5").unwrap());
        assert_eq!(decimal_to_json(&value), raw);
        assert_eq!(decimal_to_json(&value).to_string(), "12345678901234567.5");

        let tiny = Decimal::from_str("0.0000000001").unwrap();
        assert_eq!(try_decimal(&decimal_to_json(&tiny)), Ok(tiny));
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    enum Phase {
        #[serde(rename = "L1-N")]
        L1N,
        L2,
    }

    #[test]
    fn enums_use_wire_spelling() {
        assert_eq!(try_enum::<Phase>(&json!(" L1-N ")), Ok(Phase::L1N));
        assert!(try_enum::<Phase>(&json!("L1N")).unwrap_err().contains("unknown variant"));
        assert!(try_enum::<Phase>(&json!(2)).is_err());
        assert_eq!(enum_to_json(&Phase::L2), json!("L2"));
    }

    #[test]
    fn custom_data_absent_by_default() {
        let json = object(json!({"name": "x"}));
        assert_eq!(json.parse_custom_data(), Ok(None));
    }

    #[test]
    fn mandatory_collection_must_be_an_array() {
        let json = object(json!({"items": {"vendorId": "x"}}));
        let err = json.parse_mandatory_list::<CustomData>("items", "items").unwrap_err();
        assert!(matches!(err, FieldError::Invalid { .. }));

        let json = object(json!({"items": []}));
        assert_eq!(json.parse_mandatory_list::<CustomData>("items", "items"), Ok(vec![]));
    }

    #[test]
    fn one_bad_element_fails_the_whole_set() {
        let json = object(json!({"items": [{"vendorId": "a"}, {"noVendor": true}]}));
        let err = json.parse_mandatory_set::<CustomData>("items", "items").unwrap_err();
        assert!(matches!(err, FieldError::InvalidElement { index: 1, .. }));
    }
}
