//! Public constructors enforce the same rules as the parser, so every
//! constructed value can be emitted and parsed back.

use ocppvo_core::{CustomData, DomainError, JsonObject, JsonValueObject};
use ocppvo_types::{
    CertificateHashData, Component, ConnectorStatus, ConnectorStatusCodec, ConnectorStatusReport, HashAlgorithm,
    SignedMeterValue, StatusInfo, TaxRate, Variable,
};
use rust_decimal::Decimal;

fn is_validation<T: std::fmt::Debug>(result: Result<T, DomainError>) -> bool {
    matches!(result, Err(DomainError::Validation(_)))
}

#[test]
fn blank_mandatory_text_is_rejected() {
    assert!(is_validation(Component::new(" ", None, None, None)));
    assert!(is_validation(Variable::new("\t", None, None)));
    assert!(is_validation(StatusInfo::new("", Some("details".into()), None)));
    assert!(is_validation(TaxRate::new("  ", Decimal::from(20), None, None)));
    assert!(is_validation(CertificateHashData::new(HashAlgorithm::Sha256, "aa", " ", "01", None)));
    assert!(is_validation(SignedMeterValue::new("data", "", "OCMF", None, None)));
    assert!(is_validation(ConnectorStatusReport::new(" ", ConnectorStatus::Available, None, None, None)));
    assert!(is_validation(CustomData::new("", JsonObject::new())));
}

#[test]
fn validation_message_names_the_field() {
    let err = CertificateHashData::new(HashAlgorithm::Sha384, "aa", "bb", "  ", None).unwrap_err();
    assert!(err.to_string().contains("serial number"));
}

#[test]
fn constructed_values_parse_back() {
    let status = StatusInfo::new(" Busy ", Some(" later ".into()), None).unwrap();
    assert_eq!(StatusInfo::try_parse(&status.to_json(), None).unwrap(), status);

    let signed = SignedMeterValue::new(" T0NNRg== ", "ECDSA", "OCMF", Some("  ".into()), None).unwrap();
    assert_eq!(signed.public_key(), None);
    assert_eq!(SignedMeterValue::try_parse(&signed.to_json(), None).unwrap(), signed);

    let report = ConnectorStatusReport::new("1", ConnectorStatus::Faulted, Some("Overheat".into()), None, None).unwrap();
    let back = ConnectorStatusReport::try_parse(&report.to_json(&ConnectorStatusCodec), &ConnectorStatusCodec, None).unwrap();
    assert_eq!(back, report);
}
