//! Round-trip and equality/hash consistency properties.

use ocppvo_core::{JsonValueObject, StableHash};
use ocppvo_types::{
    CertificateHashData, CertificateHashDataChain, ChargingSchedulePeriod, Component, Evse, GetCertificateIdUse,
    HashAlgorithm, Price, StatusInfo, TaxRate, Variable,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn arb_evse() -> impl Strategy<Value = Evse> {
    (0u32..1000, proptest::option::of(0u32..16)).prop_map(|(id, connector)| Evse::new(id, connector, None))
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000, 0u32..4).prop_map(|(units, scale)| Decimal::new(units, scale))
}

/// Up to 19 significant digits and 10 decimal places, beyond what an `f64` keeps.
fn arb_precise_amount() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u32..=10).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn arb_hash_algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Sha256),
        Just(HashAlgorithm::Sha384),
        Just(HashAlgorithm::Sha512),
    ]
}

fn arb_hash_data() -> impl Strategy<Value = CertificateHashData> {
    (arb_hash_algorithm(), "[0-9a-f]{4,16}", "[0-9a-f]{4,16}", "[0-9A-F]{1,8}").prop_map(
        |(algorithm, name_hash, key_hash, serial)| CertificateHashData::new(algorithm, name_hash, key_hash, serial, None).unwrap(),
    )
}

fn arb_tax_rate() -> impl Strategy<Value = TaxRate> {
    ("[A-Za-z]{2,8}", arb_amount(), proptest::option::of(0u32..4))
        .prop_map(|(tax_type, tax, stack)| TaxRate::new(tax_type, tax, stack, None).unwrap())
}

fn arb_price() -> impl Strategy<Value = Price> {
    (arb_amount(), proptest::option::of(arb_amount()), proptest::collection::vec(arb_tax_rate(), 0..4))
        .prop_map(|(excl, incl, rates)| Price::new(excl, incl, rates, None))
}

fn round_trips<T: JsonValueObject>(value: &T) -> bool {
    T::try_parse(&value.to_json(), None).as_ref() == Ok(value)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn evse_round_trips(evse in arb_evse()) {
        prop_assert!(round_trips(&evse));
    }

    #[test]
    fn component_round_trips(
        name in "[A-Za-z][A-Za-z0-9]{0,15}",
        instance in proptest::option::of("[A-Za-z0-9]{1,8}"),
        evse in proptest::option::of(arb_evse()),
    ) {
        let component = Component::new(name, instance, evse, None).unwrap();
        prop_assert!(round_trips(&component));
    }

    #[test]
    fn case_insensitive_names_agree_on_eq_and_hash(name in "[A-Za-z]{1,16}") {
        let lower = Variable::new(name.to_lowercase(), None, None).unwrap();
        let upper = Variable::new(name.to_uppercase(), None, None).unwrap();
        prop_assert_eq!(&lower, &upper);
        prop_assert_eq!(lower.stable_hash(), upper.stable_hash());
    }

    #[test]
    fn status_info_round_trips(
        reason in "[A-Za-z]{1,20}",
        info in proptest::option::of("[A-Za-z ]{0,40}"),
    ) {
        let status = StatusInfo::new(reason, info, None).unwrap();
        prop_assert!(round_trips(&status));
    }

    #[test]
    fn schedule_period_round_trips(
        start in 0i32..86_400,
        limit in arb_amount(),
        phases in proptest::option::of(1i32..=3),
    ) {
        let period = ChargingSchedulePeriod::new(start, limit, phases, None, None);
        prop_assert!(round_trips(&period));
    }

    #[test]
    fn price_round_trips_and_keeps_tax_rate_order(price in arb_price()) {
        prop_assert!(round_trips(&price));
    }

    #[test]
    fn high_precision_amounts_round_trip(
        excl in arb_precise_amount(),
        incl in proptest::option::of(arb_precise_amount()),
        tax in arb_precise_amount(),
    ) {
        let rate = TaxRate::new("VAT", tax, None, None).unwrap();
        let price = Price::new(excl, incl, vec![rate], None);
        let back = Price::try_parse(&price.to_json(), None).unwrap();
        prop_assert_eq!(back.excl_tax(), excl);
        prop_assert_eq!(back.incl_tax(), incl);
        prop_assert_eq!(&back, &price);
    }

    #[test]
    fn price_plus_zero_is_identity(price in arb_price()) {
        let sum = &price + &Price::zero();
        let zero_first = &Price::zero() + &price;
        prop_assert_eq!(sum.stable_hash(), price.stable_hash());
        prop_assert_eq!(&zero_first, &price);
        prop_assert_eq!(sum, price);
    }

    #[test]
    fn chain_children_ignore_order_and_duplicates(
        root in arb_hash_data(),
        children in proptest::collection::vec(arb_hash_data(), 0..6),
    ) {
        let forward = CertificateHashDataChain::new(
            GetCertificateIdUse::V2gCertificateChain,
            root.clone(),
            children.clone(),
            None,
        );
        let mut reversed_children = children.clone();
        reversed_children.reverse();
        reversed_children.extend(children.iter().cloned());
        let reversed = CertificateHashDataChain::new(
            GetCertificateIdUse::V2gCertificateChain,
            root,
            reversed_children,
            None,
        );

        prop_assert_eq!(&forward, &reversed);
        prop_assert_eq!(forward.stable_hash(), reversed.stable_hash());
        prop_assert!(round_trips(&forward));
    }

    #[test]
    fn equal_values_share_hash_after_reparse(data in arb_hash_data()) {
        let reparsed = CertificateHashData::try_parse(&data.to_json(), None).unwrap();
        prop_assert_eq!(data.stable_hash(), reparsed.stable_hash());
        prop_assert_eq!(data, reparsed);
    }
}
