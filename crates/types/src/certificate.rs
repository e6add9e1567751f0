//! Certificate hash data and certificate chains.
//!
//! Hash values and serial numbers are opaque encodings and compare exactly.

use serde_json::Value;

use ocppvo_core::json::{enum_to_json, objects_to_json, put_custom_data, try_enum};
use ocppvo_core::{
    CustomData, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject, SerializeHooks,
    ValueSet, mandatory_text,
};

use crate::enums::{GetCertificateIdUse, HashAlgorithm};

/// Identifies a certificate by hashes of its issuer and its serial number.
#[derive(Debug, Clone)]
pub struct CertificateHashData {
    hash_algorithm: HashAlgorithm,
    issuer_name_hash: String,
    issuer_key_hash: String,
    serial_number: String,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl CertificateHashData {
    pub fn new(
        hash_algorithm: HashAlgorithm,
        issuer_name_hash: impl Into<String>,
        issuer_key_hash: impl Into<String>,
        serial_number: impl Into<String>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        let issuer_name_hash = mandatory_text("issuer name hash", issuer_name_hash)?;
        let issuer_key_hash = mandatory_text("issuer key hash", issuer_key_hash)?;
        let serial_number = mandatory_text("serial number", serial_number)?;

        let hash = HashComposer::new()
            .field(3, &hash_algorithm)
            .field(5, &issuer_name_hash)
            .field(7, &issuer_key_hash)
            .field(11, &serial_number)
            .finish(custom_data.as_ref());

        Ok(Self {
            hash_algorithm,
            issuer_name_hash,
            issuer_key_hash,
            serial_number,
            custom_data,
            hash,
        })
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn issuer_name_hash(&self) -> &str {
        &self.issuer_name_hash
    }

    pub fn issuer_key_hash(&self) -> &str {
        &self.issuer_key_hash
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

ocppvo_core::impl_cached_hash!(CertificateHashData);

impl PartialEq for CertificateHashData {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.hash_algorithm == other.hash_algorithm
                && self.issuer_name_hash == other.issuer_name_hash
                && self.issuer_key_hash == other.issuer_key_hash
                && self.serial_number == other.serial_number
                && self.custom_data == other.custom_data)
    }
}

impl Eq for CertificateHashData {}

impl JsonValueObject for CertificateHashData {
    const TYPE_NAME: &'static str = "CertificateHashData";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let hash_algorithm = json.parse_mandatory("hashAlgorithm", "hash algorithm", try_enum)?;
        let issuer_name_hash = json.parse_mandatory_text("issuerNameHash", "issuer name hash")?;
        let issuer_key_hash = json.parse_mandatory_text("issuerKeyHash", "issuer key hash")?;
        let serial_number = json.parse_mandatory_text("serialNumber", "serial number")?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(
            hash_algorithm,
            issuer_name_hash,
            issuer_key_hash,
            serial_number,
            custom_data,
        )?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("hashAlgorithm".into(), enum_to_json(&self.hash_algorithm));
        json.insert("issuerNameHash".into(), Value::String(self.issuer_name_hash.clone()));
        json.insert("issuerKeyHash".into(), Value::String(self.issuer_key_hash.clone()));
        json.insert("serialNumber".into(), Value::String(self.serial_number.clone()));
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// Hash data of a certificate plus the hash data of its child certificates.
///
/// Children form a set: duplicates collapse and order is irrelevant. An empty
/// set is emitted as an absent property.
#[derive(Debug, Clone)]
pub struct CertificateHashDataChain {
    certificate_type: GetCertificateIdUse,
    certificate_hash_data: CertificateHashData,
    child_certificate_hash_data: ValueSet<CertificateHashData>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl CertificateHashDataChain {
    pub fn new(
        certificate_type: GetCertificateIdUse,
        certificate_hash_data: CertificateHashData,
        child_certificate_hash_data: impl IntoIterator<Item = CertificateHashData>,
        custom_data: Option<CustomData>,
    ) -> Self {
        let child_certificate_hash_data: ValueSet<_> = child_certificate_hash_data.into_iter().collect();

        let hash = HashComposer::new()
            .field(3, &certificate_type)
            .field(5, &certificate_hash_data)
            .field(7, &child_certificate_hash_data)
            .finish(custom_data.as_ref());

        Self {
            certificate_type,
            certificate_hash_data,
            child_certificate_hash_data,
            custom_data,
            hash,
        }
    }

    pub fn certificate_type(&self) -> GetCertificateIdUse {
        self.certificate_type
    }

    pub fn certificate_hash_data(&self) -> &CertificateHashData {
        &self.certificate_hash_data
    }

    pub fn child_certificate_hash_data(&self) -> &ValueSet<CertificateHashData> {
        &self.child_certificate_hash_data
    }
}

ocppvo_core::impl_cached_hash!(CertificateHashDataChain);

impl PartialEq for CertificateHashDataChain {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.certificate_type == other.certificate_type
                && self.certificate_hash_data == other.certificate_hash_data
                && self.child_certificate_hash_data == other.child_certificate_hash_data
                && self.custom_data == other.custom_data)
    }
}

impl Eq for CertificateHashDataChain {}

impl JsonValueObject for CertificateHashDataChain {
    const TYPE_NAME: &'static str = "CertificateHashDataChain";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let certificate_type = json.parse_mandatory("certificateType", "certificate type", try_enum)?;
        let certificate_hash_data =
            json.parse_mandatory_object::<CertificateHashData>("certificateHashData", "certificate hash data")?;
        let children = json
            .parse_optional_set::<CertificateHashData>("childCertificateHashData", "child certificate hash data")?
            .unwrap_or_default();
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(certificate_type, certificate_hash_data, children, custom_data))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("certificateType".into(), enum_to_json(&self.certificate_type));
        json.insert("certificateHashData".into(), self.certificate_hash_data.to_json_with(hooks));
        if !self.child_certificate_hash_data.is_empty() {
            json.insert(
                "childCertificateHashData".into(),
                objects_to_json(&self.child_certificate_hash_data, hooks),
            );
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}
