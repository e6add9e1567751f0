//! Meter values and their sampled values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use ocppvo_core::json::{
    decimal_to_json, enum_to_json, objects_to_json, put_custom_data, timestamp_to_json, try_decimal, try_enum,
    try_i32, try_timestamp,
};
use ocppvo_core::{
    CustomData, DomainError, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject,
    SerializeHooks, mandatory_text,
};

use crate::enums::{Location, Measurand, Phase, ReadingContext};

/// Unit used when none is given on the wire.
pub const DEFAULT_UNIT: &str = "Wh";

/// A signed meter reading. All fields are opaque encodings and compare exactly.
#[derive(Debug, Clone)]
pub struct SignedMeterValue {
    signed_meter_data: String,
    signing_method: String,
    encoding_method: String,
    public_key: Option<String>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl SignedMeterValue {
    pub fn new(
        signed_meter_data: impl Into<String>,
        signing_method: impl Into<String>,
        encoding_method: impl Into<String>,
        public_key: Option<String>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        let signed_meter_data = mandatory_text("signed meter data", signed_meter_data)?;
        let signing_method = mandatory_text("signing method", signing_method)?;
        let encoding_method = mandatory_text("encoding method", encoding_method)?;
        let public_key = public_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let hash = HashComposer::new()
            .field(3, &signed_meter_data)
            .field(5, &signing_method)
            .field(7, &encoding_method)
            .field(11, &public_key)
            .finish(custom_data.as_ref());

        Ok(Self {
            signed_meter_data,
            signing_method,
            encoding_method,
            public_key,
            custom_data,
            hash,
        })
    }

    pub fn signed_meter_data(&self) -> &str {
        &self.signed_meter_data
    }

    pub fn signing_method(&self) -> &str {
        &self.signing_method
    }

    pub fn encoding_method(&self) -> &str {
        &self.encoding_method
    }

    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }
}

ocppvo_core::impl_cached_hash!(SignedMeterValue);

impl PartialEq for SignedMeterValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.signed_meter_data == other.signed_meter_data
                && self.signing_method == other.signing_method
                && self.encoding_method == other.encoding_method
                && self.public_key == other.public_key
                && self.custom_data == other.custom_data)
    }
}

impl Eq for SignedMeterValue {}

impl JsonValueObject for SignedMeterValue {
    const TYPE_NAME: &'static str = "SignedMeterValue";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let signed_meter_data = json.parse_mandatory_text("signedMeterData", "signed meter data")?;
        let signing_method = json.parse_mandatory_text("signingMethod", "signing method")?;
        let encoding_method = json.parse_mandatory_text("encodingMethod", "encoding method")?;
        let public_key = json.parse_optional_text("publicKey", "public key")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(
            signed_meter_data,
            signing_method,
            encoding_method,
            public_key,
            custom_data,
        )?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("signedMeterData".into(), Value::String(self.signed_meter_data.clone()));
        json.insert("signingMethod".into(), Value::String(self.signing_method.clone()));
        json.insert("encodingMethod".into(), Value::String(self.encoding_method.clone()));
        if let Some(key) = &self.public_key {
            json.insert("publicKey".into(), Value::String(key.clone()));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// Unit and power-of-ten multiplier of a sampled value.
///
/// Absent properties take their defaults (`Wh`, multiplier `0`) at
/// construction, so `{}` and `{"unit":"Wh","multiplier":0}` are equal.
#[derive(Debug, Clone)]
pub struct UnitOfMeasure {
    unit: String,
    multiplier: i32,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl UnitOfMeasure {
    pub fn new(unit: Option<String>, multiplier: Option<i32>, custom_data: Option<CustomData>) -> Self {
        let unit = unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());
        let multiplier = multiplier.unwrap_or(0);

        let hash = HashComposer::new()
            .field(3, &unit)
            .field(5, &multiplier)
            .finish(custom_data.as_ref());

        Self {
            unit,
            multiplier,
            custom_data,
            hash,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }
}

impl Default for UnitOfMeasure {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

ocppvo_core::impl_cached_hash!(UnitOfMeasure);

impl PartialEq for UnitOfMeasure {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.unit == other.unit
                && self.multiplier == other.multiplier
                && self.custom_data == other.custom_data)
    }
}

impl Eq for UnitOfMeasure {}

impl JsonValueObject for UnitOfMeasure {
    const TYPE_NAME: &'static str = "UnitOfMeasure";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let unit = json.parse_optional_text("unit", "unit")?;
        let multiplier = json.parse_optional("multiplier", "multiplier", try_i32)?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(unit, multiplier, custom_data))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("unit".into(), Value::String(self.unit.clone()));
        json.insert("multiplier".into(), Value::from(self.multiplier));
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// A single measured value.
#[derive(Debug, Clone)]
pub struct SampledValue {
    value: Decimal,
    context: Option<ReadingContext>,
    measurand: Option<Measurand>,
    phase: Option<Phase>,
    location: Option<Location>,
    signed_meter_value: Option<SignedMeterValue>,
    unit_of_measure: Option<UnitOfMeasure>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl SampledValue {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        value: Decimal,
        context: Option<ReadingContext>,
        measurand: Option<Measurand>,
        phase: Option<Phase>,
        location: Option<Location>,
        signed_meter_value: Option<SignedMeterValue>,
        unit_of_measure: Option<UnitOfMeasure>,
        custom_data: Option<CustomData>,
    ) -> Self {
        let hash = HashComposer::new()
            .field(3, &value)
            .field(5, &context)
            .field(7, &measurand)
            .field(11, &phase)
            .field(13, &location)
            .field(17, &signed_meter_value)
            .field(19, &unit_of_measure)
            .finish(custom_data.as_ref());

        Self {
            value,
            context,
            measurand,
            phase,
            location,
            signed_meter_value,
            unit_of_measure,
            custom_data,
            hash,
        }
    }

    /// A plain reading with every optional property absent.
    pub fn reading(value: Decimal, measurand: Option<Measurand>) -> Self {
        Self::new(value, None, measurand, None, None, None, None, None)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn context(&self) -> Option<ReadingContext> {
        self.context
    }

    pub fn measurand(&self) -> Option<Measurand> {
        self.measurand
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn signed_meter_value(&self) -> Option<&SignedMeterValue> {
        self.signed_meter_value.as_ref()
    }

    pub fn unit_of_measure(&self) -> Option<&UnitOfMeasure> {
        self.unit_of_measure.as_ref()
    }
}

ocppvo_core::impl_cached_hash!(SampledValue);

impl PartialEq for SampledValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.value == other.value
                && self.context == other.context
                && self.measurand == other.measurand
                && self.phase == other.phase
                && self.location == other.location
                && self.signed_meter_value == other.signed_meter_value
                && self.unit_of_measure == other.unit_of_measure
                && self.custom_data == other.custom_data)
    }
}

impl Eq for SampledValue {}

impl JsonValueObject for SampledValue {
    const TYPE_NAME: &'static str = "SampledValue";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let value = json.parse_mandatory("value", "value", try_decimal)?;
        let context = json.parse_optional("context", "reading context", try_enum)?;
        let measurand = json.parse_optional("measurand", "measurand", try_enum)?;
        let phase = json.parse_optional("phase", "phase", try_enum)?;
        let location = json.parse_optional("location", "location", try_enum)?;
        let signed_meter_value =
            json.parse_optional_object::<SignedMeterValue>("signedMeterValue", "signed meter value")?;
        let unit_of_measure = json.parse_optional_object::<UnitOfMeasure>("unitOfMeasure", "unit of measure")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(
            value,
            context,
            measurand,
            phase,
            location,
            signed_meter_value,
            unit_of_measure,
            custom_data,
        ))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("value".into(), decimal_to_json(&self.value));
        if let Some(context) = &self.context {
            json.insert("context".into(), enum_to_json(context));
        }
        if let Some(measurand) = &self.measurand {
            json.insert("measurand".into(), enum_to_json(measurand));
        }
        if let Some(phase) = &self.phase {
            json.insert("phase".into(), enum_to_json(phase));
        }
        if let Some(location) = &self.location {
            json.insert("location".into(), enum_to_json(location));
        }
        if let Some(signed) = &self.signed_meter_value {
            json.insert("signedMeterValue".into(), signed.to_json_with(hooks));
        }
        if let Some(unit) = &self.unit_of_measure {
            json.insert("unitOfMeasure".into(), unit.to_json_with(hooks));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// Sampled values taken at one point in time. At least one sample is required.
#[derive(Debug, Clone)]
pub struct MeterValue {
    timestamp: DateTime<Utc>,
    sampled_value: Vec<SampledValue>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl MeterValue {
    pub fn new(
        timestamp: DateTime<Utc>,
        sampled_value: Vec<SampledValue>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        if sampled_value.is_empty() {
            return Err(DomainError::invariant("a meter value needs at least one sampled value"));
        }

        let hash = HashComposer::new()
            .field(3, &timestamp)
            .field(5, &sampled_value)
            .finish(custom_data.as_ref());

        Ok(Self {
            timestamp,
            sampled_value,
            custom_data,
            hash,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn sampled_value(&self) -> &[SampledValue] {
        &self.sampled_value
    }

    /// First sample for `measurand`.
    pub fn sample_for(&self, measurand: Measurand) -> Option<&SampledValue> {
        self.sampled_value
            .iter()
            .find(|sample| sample.measurand == Some(measurand))
    }
}

ocppvo_core::impl_cached_hash!(MeterValue);

impl PartialEq for MeterValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.timestamp == other.timestamp
                && self.sampled_value == other.sampled_value
                && self.custom_data == other.custom_data)
    }
}

impl Eq for MeterValue {}

impl JsonValueObject for MeterValue {
    const TYPE_NAME: &'static str = "MeterValue";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let timestamp = json.parse_mandatory("timestamp", "timestamp", try_timestamp)?;
        let sampled_value = json.parse_mandatory_list::<SampledValue>("sampledValue", "sampled values")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(timestamp, sampled_value, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("timestamp".into(), timestamp_to_json(&self.timestamp));
        json.insert("sampledValue".into(), objects_to_json(&self.sampled_value, hooks));
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}
