//! Variable monitors as reported by a charging station.

use rust_decimal::Decimal;
use serde_json::Value;

use ocppvo_core::json::{
    decimal_to_json, enum_to_json, objects_to_json, put_custom_data, try_bool, try_decimal, try_enum, try_i32,
    try_u8,
};
use ocppvo_core::{
    CustomData, DomainError, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject,
    SerializeHooks, ValueSet,
};

use crate::component::{Component, Variable};
use crate::enums::MonitorType;

/// Most severe level. Severities run from 0 (danger) to 9 (debug).
pub const MAX_SEVERITY: u8 = 9;

fn check_severity(severity: u8) -> Result<u8, String> {
    if severity > MAX_SEVERITY {
        return Err(format!("severity {severity} is outside 0..={MAX_SEVERITY}"));
    }
    Ok(severity)
}

#[derive(Debug, Clone)]
pub struct VariableMonitoring {
    id: i32,
    transaction: bool,
    value: Decimal,
    monitor_type: MonitorType,
    severity: u8,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl VariableMonitoring {
    pub fn new(
        id: i32,
        transaction: bool,
        value: Decimal,
        monitor_type: MonitorType,
        severity: u8,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        let severity = check_severity(severity).map_err(DomainError::validation)?;

        let hash = HashComposer::new()
            .field(3, &id)
            .field(5, &transaction)
            .field(7, &value)
            .field(11, &monitor_type)
            .field(13, &severity)
            .finish(custom_data.as_ref());

        Ok(Self {
            id,
            transaction,
            value,
            monitor_type,
            severity,
            custom_data,
            hash,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn transaction(&self) -> bool {
        self.transaction
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn monitor_type(&self) -> MonitorType {
        self.monitor_type
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }
}

ocppvo_core::impl_cached_hash!(VariableMonitoring);

impl PartialEq for VariableMonitoring {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.id == other.id
                && self.transaction == other.transaction
                && self.value == other.value
                && self.monitor_type == other.monitor_type
                && self.severity == other.severity
                && self.custom_data == other.custom_data)
    }
}

impl Eq for VariableMonitoring {}

impl JsonValueObject for VariableMonitoring {
    const TYPE_NAME: &'static str = "VariableMonitoring";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let id = json.parse_mandatory("id", "monitor identification", try_i32)?;
        let transaction = json.parse_mandatory("transaction", "transaction flag", try_bool)?;
        let value = json.parse_mandatory("value", "monitor value", try_decimal)?;
        let monitor_type = json.parse_mandatory("type", "monitor type", try_enum)?;
        let severity = json.parse_mandatory("severity", "severity", |raw| try_u8(raw).and_then(check_severity))?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(id, transaction, value, monitor_type, severity, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("id".into(), Value::from(self.id));
        json.insert("transaction".into(), Value::Bool(self.transaction));
        json.insert("value".into(), decimal_to_json(&self.value));
        json.insert("type".into(), enum_to_json(&self.monitor_type));
        json.insert("severity".into(), Value::from(self.severity));
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// The monitors configured on one component variable.
///
/// `variableMonitoring` is a set: order on the wire does not affect equality.
#[derive(Debug, Clone)]
pub struct MonitoringData {
    component: Component,
    variable: Variable,
    variable_monitoring: ValueSet<VariableMonitoring>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl MonitoringData {
    pub fn new(
        component: Component,
        variable: Variable,
        variable_monitoring: impl IntoIterator<Item = VariableMonitoring>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        let variable_monitoring: ValueSet<_> = variable_monitoring.into_iter().collect();
        if variable_monitoring.is_empty() {
            return Err(DomainError::invariant("monitoring data needs at least one variable monitor"));
        }

        let hash = HashComposer::new()
            .field(3, &component)
            .field(5, &variable)
            .field(7, &variable_monitoring)
            .finish(custom_data.as_ref());

        Ok(Self {
            component,
            variable,
            variable_monitoring,
            custom_data,
            hash,
        })
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn variable_monitoring(&self) -> &ValueSet<VariableMonitoring> {
        &self.variable_monitoring
    }

    /// Monitor with the given id, if configured.
    pub fn monitor(&self, id: i32) -> Option<&VariableMonitoring> {
        self.variable_monitoring.iter().find(|monitor| monitor.id == id)
    }
}

ocppvo_core::impl_cached_hash!(MonitoringData);

impl PartialEq for MonitoringData {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.component == other.component
                && self.variable == other.variable
                && self.variable_monitoring == other.variable_monitoring
                && self.custom_data == other.custom_data)
    }
}

impl Eq for MonitoringData {}

impl JsonValueObject for MonitoringData {
    const TYPE_NAME: &'static str = "MonitoringData";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let component = json.parse_mandatory_object::<Component>("component", "component")?;
        let variable = json.parse_mandatory_object::<Variable>("variable", "variable")?;
        let variable_monitoring =
            json.parse_mandatory_set::<VariableMonitoring>("variableMonitoring", "variable monitoring")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(component, variable, variable_monitoring, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("component".into(), self.component.to_json_with(hooks));
        json.insert("variable".into(), self.variable.to_json_with(hooks));
        json.insert(
            "variableMonitoring".into(),
            objects_to_json(&self.variable_monitoring, hooks),
        );
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}
