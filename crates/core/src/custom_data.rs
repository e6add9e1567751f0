//! Extension payload carried by every value object.

use serde_json::Value;

use crate::error::{DomainResult, FieldError};
use crate::hash::{HashComposer, StableHash};
use crate::hooks::SerializeHooks;
use crate::json::{JsonObject, JsonObjectExt};
use crate::value_object::{JsonValueObject, mandatory_text};

const VENDOR_ID: &str = "vendorId";

/// Opaque, schema-free vendor extension (`customData` on the wire).
///
/// Only `vendorId` is required; every other property is kept verbatim and
/// never interpreted. Participates in the equality and hash of its owner.
#[derive(Debug, Clone)]
pub struct CustomData {
    vendor_id: String,
    properties: JsonObject,
    hash: u64,
}

impl CustomData {
    pub fn new(vendor_id: impl Into<String>, properties: JsonObject) -> DomainResult<Self> {
        let vendor_id = mandatory_text("vendor identification", vendor_id)?;
        let mut properties = properties;
        properties.remove(VENDOR_ID);

        let hash = HashComposer::new()
            .field(3, &vendor_id)
            .field(5, &Value::Object(properties.clone()))
            .finish(None);

        Ok(Self {
            vendor_id,
            properties,
            hash,
        })
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    /// All vendor properties except `vendorId`.
    pub fn properties(&self) -> &JsonObject {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

crate::impl_cached_hash!(CustomData);

impl PartialEq for CustomData {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.vendor_id == other.vendor_id
                && self.properties == other.properties)
    }
}

impl Eq for CustomData {}

impl JsonValueObject for CustomData {
    const TYPE_NAME: &'static str = "CustomData";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let vendor_id = json.parse_mandatory_text(VENDOR_ID, "vendor identification")?;
        Ok(Self::new(vendor_id, json.clone())?)
    }

    fn to_json_fields(&self, _hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert(VENDOR_ID.to_string(), Value::String(self.vendor_id.clone()));
        for (key, value) in &self.properties {
            json.insert(key.clone(), value.clone());
        }
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        None
    }
}
