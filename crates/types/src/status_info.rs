//! Status details and connector status reports.

use serde_json::Value;

use ocppvo_core::hash::{IgnoreCase, eq_ignore_case};
use ocppvo_core::json::{put_custom_data, try_enum};
use ocppvo_core::{
    CustomData, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject, SerializeHooks,
    StatusCodec, TypedStatus, mandatory_text,
};

use crate::enums::ConnectorStatus;

/// More information about a status returned in a response.
///
/// `reasonCode` is a predefined code and ignores case; `additionalInfo` is
/// kept and compared verbatim.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    reason_code: String,
    additional_info: Option<String>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl StatusInfo {
    pub fn new(reason_code: impl Into<String>, additional_info: Option<String>, custom_data: Option<CustomData>) -> DomainResult<Self> {
        let reason_code = mandatory_text("reason code", reason_code)?;
        let additional_info = additional_info
            .map(|info| info.trim().to_string())
            .filter(|info| !info.is_empty());

        let hash = HashComposer::new()
            .field(3, &IgnoreCase(&reason_code))
            .field(5, &additional_info)
            .finish(custom_data.as_ref());

        Ok(Self {
            reason_code,
            additional_info,
            custom_data,
            hash,
        })
    }

    pub fn reason_code(&self) -> &str {
        &self.reason_code
    }

    pub fn additional_info(&self) -> Option<&str> {
        self.additional_info.as_deref()
    }
}

ocppvo_core::impl_cached_hash!(StatusInfo);

impl PartialEq for StatusInfo {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && eq_ignore_case(&self.reason_code, &other.reason_code)
                && self.additional_info == other.additional_info
                && self.custom_data == other.custom_data)
    }
}

impl Eq for StatusInfo {}

impl JsonValueObject for StatusInfo {
    const TYPE_NAME: &'static str = "StatusInfo";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let reason_code = json.parse_mandatory_text("reasonCode", "reason code")?;
        let additional_info = json.parse_optional_text("additionalInfo", "additional information")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(reason_code, additional_info, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("reasonCode".into(), Value::String(self.reason_code.clone()));
        if let Some(info) = &self.additional_info {
            json.insert("additionalInfo".into(), Value::String(info.clone()));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// Status wrapper instantiated for connector availability.
pub type ConnectorStatusReport = TypedStatus<ConnectorStatus>;

/// Wire codec for [`ConnectorStatus`] inside a [`TypedStatus`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectorStatusCodec;

impl StatusCodec<ConnectorStatus> for ConnectorStatusCodec {
    fn try_parse(&self, raw: &Value) -> Result<ConnectorStatus, String> {
        try_enum(raw)
    }

    fn to_wire(&self, status: &ConnectorStatus) -> String {
        status.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reason_code_ignores_case() {
        let a = StatusInfo::new("NoCable", None, None).unwrap();
        let b = StatusInfo::new("NOCABLE", None, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn additional_info_is_exact() {
        let a = StatusInfo::new("Busy", Some("Try later".into()), None).unwrap();
        let b = StatusInfo::new("Busy", Some("try later".into()), None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn connector_status_report_round_trips() {
        let raw = json!({"id": "CS-1/1", "status": "Faulted", "reasonCode": "GroundFailure"});
        let report = ConnectorStatusReport::try_parse(&raw, &ConnectorStatusCodec, None).unwrap();

        assert_eq!(*report.status(), ConnectorStatus::Faulted);
        assert_eq!(report.to_json(&ConnectorStatusCodec), raw);
    }

    #[test]
    fn connector_status_report_rejects_unknown_status() {
        let raw = json!({"id": "CS-1/1", "status": "Exploded"});
        assert!(ConnectorStatusReport::try_parse(&raw, &ConnectorStatusCodec, None).is_err());
    }
}
