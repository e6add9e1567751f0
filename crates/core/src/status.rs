//! Generic status wrapper for open, caller-defined status enumerations.
//!
//! The status type carries no wire format of its own, so parsing and emission
//! go through a caller-supplied [`StatusCodec`]. New status codes can be added
//! without touching the wrapper.

use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::custom_data::CustomData;
use crate::error::{DomainResult, FieldError, ParseError};
use crate::hash::{HashComposer, StableHash, ignore_case, opt_eq_ignore_case};
use crate::hooks::{CustomJsonParser, SerializeHooks};
use crate::json::{JsonObject, JsonObjectExt, put_custom_data};
use crate::value_object::{mandatory_text, parse_boundary};

/// Parse/emit strategy for a status type.
pub trait StatusCodec<S> {
    /// Raw JSON value to status, or a conversion error text.
    fn try_parse(&self, raw: &Value) -> Result<S, String>;

    /// Wire spelling of a status.
    fn to_wire(&self, status: &S) -> String;
}

/// A [`StatusCodec`] built from two functions.
pub struct FnStatusCodec<P, W> {
    parse: P,
    to_wire: W,
}

impl<P, W> FnStatusCodec<P, W> {
    pub fn new(parse: P, to_wire: W) -> Self {
        Self { parse, to_wire }
    }
}

impl<S, P, W> StatusCodec<S> for FnStatusCodec<P, W>
where
    P: Fn(&Value) -> Result<S, String>,
    W: Fn(&S) -> String,
{
    fn try_parse(&self, raw: &Value) -> Result<S, String> {
        (self.parse)(raw)
    }

    fn to_wire(&self, status: &S) -> String {
        (self.to_wire)(status)
    }
}

/// Identified status report parametrised over its status type.
///
/// Wire shape: `{"id", "status", "reasonCode"?, "additionalInfo"?, "customData"?}`.
/// `id` and `additionalInfo` compare exactly; `reasonCode` ignores case.
/// The status contributes to the hash through its own [`StableHash`].
#[derive(Debug, Clone)]
pub struct TypedStatus<S> {
    id: String,
    status: S,
    reason_code: Option<String>,
    additional_info: Option<String>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl<S> TypedStatus<S>
where
    S: Clone + Eq + StableHash + 'static,
{
    pub const TYPE_NAME: &'static str = "TypedStatus";

    pub fn new(
        id: impl Into<String>,
        status: S,
        reason_code: Option<String>,
        additional_info: Option<String>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        let id = mandatory_text("identification", id)?;
        let reason_code = non_empty(reason_code);
        let additional_info = non_empty(additional_info);

        let hash = HashComposer::new()
            .field(3, &id)
            .field(5, &status)
            .field(7, &ignore_case(reason_code.as_deref()))
            .field(11, &additional_info)
            .finish(custom_data.as_ref());

        Ok(Self {
            id,
            status,
            reason_code,
            additional_info,
            custom_data,
            hash,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn reason_code(&self) -> Option<&str> {
        self.reason_code.as_deref()
    }

    pub fn additional_info(&self) -> Option<&str> {
        self.additional_info.as_deref()
    }

    pub fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }

    /// Parse with the given codec; `custom_parser` replaces the default result.
    pub fn try_parse<C: StatusCodec<S>>(
        json: &Value,
        codec: &C,
        custom_parser: Option<&CustomJsonParser<Self>>,
    ) -> Result<Self, ParseError> {
        parse_boundary(Self::TYPE_NAME, json, custom_parser, |json| {
            let id = json.parse_mandatory_text("id", "identification")?;
            let status = json.parse_mandatory("status", "status", |raw| codec.try_parse(raw))?;
            let reason_code = json.parse_optional_text("reasonCode", "reason code")?;
            let additional_info = json.parse_optional_text("additionalInfo", "additional information")?;
            let custom_data = json.parse_custom_data()?;

            Ok::<_, FieldError>(Self::new(id, status, reason_code, additional_info, custom_data)?)
        })
    }

    pub fn parse<C: StatusCodec<S>>(
        text: &str,
        codec: &C,
        custom_parser: Option<&CustomJsonParser<Self>>,
    ) -> Result<Self, ParseError> {
        let json: Value =
            serde_json::from_str(text).map_err(|e| ParseError::invalid(Self::TYPE_NAME, e.to_string()))?;
        Self::try_parse(&json, codec, custom_parser)
    }

    pub fn to_json<C: StatusCodec<S>>(&self, codec: &C) -> Value {
        self.to_json_with(codec, &SerializeHooks::default())
    }

    pub fn to_json_with<C: StatusCodec<S>>(&self, codec: &C, hooks: &SerializeHooks) -> Value {
        let mut json = JsonObject::new();
        json.insert("id".to_string(), Value::String(self.id.clone()));
        json.insert("status".to_string(), Value::String(codec.to_wire(&self.status)));
        if let Some(reason_code) = &self.reason_code {
            json.insert("reasonCode".to_string(), Value::String(reason_code.clone()));
        }
        if let Some(additional_info) = &self.additional_info {
            json.insert("additionalInfo".to_string(), Value::String(additional_info.clone()));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);

        Value::Object(hooks.apply(self, json))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<S: Eq> PartialEq for TypedStatus<S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.id == other.id
                && self.status == other.status
                && opt_eq_ignore_case(self.reason_code.as_deref(), other.reason_code.as_deref())
                && self.additional_info == other.additional_info
                && self.custom_data == other.custom_data)
    }
}

impl<S: Eq> Eq for TypedStatus<S> {}

impl<S> Hash for TypedStatus<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<S> StableHash for TypedStatus<S> {
    fn stable_hash(&self) -> u64 {
        self.hash
    }
}
