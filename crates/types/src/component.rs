//! Device-model addressing: EVSE, component and variable.

use serde_json::Value;

use ocppvo_core::hash::{IgnoreCase, eq_ignore_case, ignore_case, opt_eq_ignore_case};
use ocppvo_core::json::{put_custom_data, try_u32};
use ocppvo_core::{
    CustomData, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject, SerializeHooks,
    mandatory_text,
};

/// EVSE, optionally narrowed to one connector.
#[derive(Debug, Clone)]
pub struct Evse {
    id: u32,
    connector_id: Option<u32>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl Evse {
    pub fn new(id: u32, connector_id: Option<u32>, custom_data: Option<CustomData>) -> Self {
        let hash = HashComposer::new()
            .field(3, &id)
            .field(5, &connector_id)
            .finish(custom_data.as_ref());

        Self {
            id,
            connector_id,
            custom_data,
            hash,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn connector_id(&self) -> Option<u32> {
        self.connector_id
    }
}

ocppvo_core::impl_cached_hash!(Evse);

impl PartialEq for Evse {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.id == other.id
                && self.connector_id == other.connector_id
                && self.custom_data == other.custom_data)
    }
}

impl Eq for Evse {}

impl JsonValueObject for Evse {
    const TYPE_NAME: &'static str = "EVSE";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let id = json.parse_mandatory("id", "EVSE identification", try_u32)?;
        let connector_id = json.parse_optional("connectorId", "connector identification", try_u32)?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(id, connector_id, custom_data))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("id".into(), Value::from(self.id));
        if let Some(connector_id) = self.connector_id {
            json.insert("connectorId".into(), Value::from(connector_id));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// A physical or logical component of a charging station.
///
/// `name` and `instance` are human-entered and compare case-insensitively.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    instance: Option<String>,
    evse: Option<Evse>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        instance: Option<String>,
        evse: Option<Evse>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        let name = mandatory_text("component name", name)?;
        let instance = instance
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());

        let hash = HashComposer::new()
            .field(3, &IgnoreCase(&name))
            .field(5, &ignore_case(instance.as_deref()))
            .field(7, &evse)
            .finish(custom_data.as_ref());

        Ok(Self {
            name,
            instance,
            evse,
            custom_data,
            hash,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub fn evse(&self) -> Option<&Evse> {
        self.evse.as_ref()
    }
}

ocppvo_core::impl_cached_hash!(Component);

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && eq_ignore_case(&self.name, &other.name)
                && opt_eq_ignore_case(self.instance(), other.instance())
                && self.evse == other.evse
                && self.custom_data == other.custom_data)
    }
}

impl Eq for Component {}

impl JsonValueObject for Component {
    const TYPE_NAME: &'static str = "Component";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let name = json.parse_mandatory_text("name", "component name")?;
        let instance = json.parse_optional_text("instance", "component instance")?;
        let evse = json.parse_optional_object::<Evse>("evse", "EVSE")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(name, instance, evse, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("name".into(), Value::String(self.name.clone()));
        if let Some(instance) = &self.instance {
            json.insert("instance".into(), Value::String(instance.clone()));
        }
        if let Some(evse) = &self.evse {
            json.insert("evse".into(), evse.to_json_with(hooks));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// A variable of a component. Compared case-insensitively.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    instance: Option<String>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl Variable {
    pub fn new(name: impl Into<String>, instance: Option<String>, custom_data: Option<CustomData>) -> DomainResult<Self> {
        let name = mandatory_text("variable name", name)?;
        let instance = instance
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());

        let hash = HashComposer::new()
            .field(3, &IgnoreCase(&name))
            .field(5, &ignore_case(instance.as_deref()))
            .finish(custom_data.as_ref());

        Ok(Self {
            name,
            instance,
            custom_data,
            hash,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }
}

ocppvo_core::impl_cached_hash!(Variable);

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && eq_ignore_case(&self.name, &other.name)
                && opt_eq_ignore_case(self.instance(), other.instance())
                && self.custom_data == other.custom_data)
    }
}

impl Eq for Variable {}

impl JsonValueObject for Variable {
    const TYPE_NAME: &'static str = "Variable";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let name = json.parse_mandatory_text("name", "variable name")?;
        let instance = json.parse_optional_text("instance", "variable instance")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(name, instance, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("name".into(), Value::String(self.name.clone()));
        if let Some(instance) = &self.instance {
            json.insert("instance".into(), Value::String(instance.clone()));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}
