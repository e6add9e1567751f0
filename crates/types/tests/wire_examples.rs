//! Documented wire examples, checked end to end.

use std::collections::HashSet;

use ocppvo_core::{JsonValueObject, StableHash};
use ocppvo_types::{CertificateHashData, ChargingLimit, ChargingLimitSource, Component, Price};
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn charging_limit_omits_absent_flags() {
    let limit = ChargingLimit::parse(r#"{"chargingLimitSource":"EMS","isGridCritical":true}"#, None).unwrap();

    assert_eq!(limit.charging_limit_source(), ChargingLimitSource::Ems);
    assert_eq!(limit.is_grid_critical(), Some(true));
    assert_eq!(limit.is_local_generation(), None);

    let json = limit.to_json();
    assert_eq!(json, json!({"chargingLimitSource": "EMS", "isGridCritical": true}));
    assert!(json.get("isLocalGeneration").is_none());
}

#[test]
fn price_plus_zero_is_the_same_price() {
    let price = Price::parse(
        r#"{"exclTax":100.0,"inclTax":121.0,"taxRate":[{"type":"VAT","tax":21.0}]}"#,
        None,
    )
    .unwrap();

    assert_eq!(price.excl_tax(), Decimal::from(100));
    assert_eq!(price.incl_tax(), Some(Decimal::from(121)));
    assert_eq!(price.tax_rates().len(), 1);
    assert_eq!(&price + &Price::zero(), price);
    assert_eq!(price.compare_to(&price), std::cmp::Ordering::Equal);

    let cheaper = Price::new(Decimal::from(90), Some(Decimal::from(200)), Vec::new(), None);
    assert!(cheaper < price);

    let same_excl_lower_incl = Price::new(Decimal::from(100), Some(Decimal::from(110)), Vec::new(), None);
    assert!(same_excl_lower_incl < price);
}

#[test]
fn certificate_hash_data_without_algorithm_is_rejected() {
    let raw = json!({
        "issuerNameHash": "a1b2",
        "issuerKeyHash": "c3d4",
        "serialNumber": "0042"
    });

    let err = CertificateHashData::try_parse(&raw, None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("The given JSON representation of CertificateHashData is invalid:"));
    assert!(msg.contains("hash algorithm"));
}

#[test]
fn component_names_compare_without_case() {
    let upper = Component::parse(r#"{"name":"EVSE"}"#, None).unwrap();
    let lower = Component::parse(r#"{"name":"evse"}"#, None).unwrap();

    assert_eq!(upper, lower);
    assert_eq!(upper.stable_hash(), lower.stable_hash());

    let set: HashSet<_> = [upper, lower].into_iter().collect();
    assert_eq!(set.len(), 1);
}
