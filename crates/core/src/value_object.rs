//! Value object contract: equality by value, wire-format parsing and emission.
//!
//! Value objects are immutable aggregates of named fields, defined entirely by
//! their values. Every type here corresponds to one JSON object on the wire.

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::custom_data::CustomData;
use crate::error::{DomainError, DomainResult, FieldError, ParseError};
use crate::hash::StableHash;
use crate::hooks::{CustomJsonParser, SerializeHooks};
use crate::json::JsonObject;

/// A value object exchanged as a JSON object.
///
/// ## Construction
///
/// Instances come from a public constructor (program logic) or from
/// [`try_parse`](Self::try_parse) / [`parse`](Self::parse) (wire data). Either
/// way every mandatory field is validated, free text is trimmed, and the
/// structural hash is computed exactly once. Fields never change afterwards.
///
/// ## Equality and hashing
///
/// `Eq` covers every field including the extension payload. `Hash` and
/// [`StableHash`] both expose the cached hash, so equal values always share a
/// hash code. String comparison policy (exact or case-insensitive) is decided
/// per field by each type.
///
/// ## Implementing
///
/// Implementors provide only the per-field logic:
/// [`from_json_fields`](Self::from_json_fields) and
/// [`to_json_fields`](Self::to_json_fields). The error boundary and the
/// customization hooks are supplied by the provided methods.
pub trait JsonValueObject: Clone + Eq + Hash + Debug + StableHash + Sized + 'static {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Parse all fields in a fixed order, stopping at the first failure, then
    /// run the constructor.
    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError>;

    /// Default field-by-field emission. Nested value objects must be emitted
    /// with `to_json_with(hooks)` so hooks reach every level.
    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject;

    /// The optional extension payload.
    fn custom_data(&self) -> Option<&CustomData>;

    /// Parse a JSON value, never panicking.
    ///
    /// When `custom_parser` is given, its return value replaces the default
    /// instance.
    fn try_parse(json: &Value, custom_parser: Option<&CustomJsonParser<Self>>) -> Result<Self, ParseError> {
        parse_boundary(Self::TYPE_NAME, json, custom_parser, Self::from_json_fields)
    }

    /// Parse JSON text. Syntax errors use the same error channel as
    /// [`try_parse`](Self::try_parse).
    fn parse(text: &str, custom_parser: Option<&CustomJsonParser<Self>>) -> Result<Self, ParseError> {
        let json: Value =
            serde_json::from_str(text).map_err(|e| ParseError::invalid(Self::TYPE_NAME, e.to_string()))?;
        Self::try_parse(&json, custom_parser)
    }

    fn to_json(&self) -> Value {
        self.to_json_with(&SerializeHooks::default())
    }

    /// Emit JSON, letting a registered serializer hook for `Self` replace the
    /// default object.
    fn to_json_with(&self, hooks: &SerializeHooks) -> Value {
        Value::Object(hooks.apply(self, self.to_json_fields(hooks)))
    }
}

/// The single error boundary around a parse.
///
/// Rejects non-objects, lifts field errors into `type_name`'s error channel,
/// applies the parser hook, and converts any panic raised on the way into
/// [`ParseError::Invalid`].
pub fn parse_boundary<T, F>(
    type_name: &'static str,
    json: &Value,
    custom_parser: Option<&CustomJsonParser<T>>,
    parse_fields: F,
) -> Result<T, ParseError>
where
    F: FnOnce(&JsonObject) -> Result<T, FieldError>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let object = json
            .as_object()
            .ok_or_else(|| ParseError::invalid(type_name, format!("expected a JSON object, got {json}")))?;

        let parsed = parse_fields(object).map_err(|e| ParseError::from_field(type_name, e))?;

        Ok(match custom_parser {
            Some(hook) => hook(object, parsed),
            None => parsed,
        })
    }));

    let result = outcome.unwrap_or_else(|payload| {
        let detail = panic_message(payload.as_ref());
        tracing::warn!(type_name, detail = %detail, "panic while parsing JSON representation");
        Err(ParseError::invalid(type_name, detail))
    });

    if let Err(err) = &result {
        tracing::debug!(type_name, error = %err, "rejected JSON representation");
    }
    result
}

/// Trim text for a mandatory field. Empty after trimming is a validation error.
///
/// Constructors apply the same rule the parser applies to mandatory text, so
/// every constructed value can be emitted and parsed back.
pub fn mandatory_text(label: &str, value: impl Into<String>) -> DomainResult<String> {
    let text = value.into().trim().to_string();
    if text.is_empty() {
        return Err(DomainError::validation(format!("{label} must not be empty")));
    }
    Ok(text)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unexpected failure while parsing".to_string()
    }
}
