//! Tariff prices and tax rates.

use std::cmp::Ordering;
use std::ops::Add;

use rust_decimal::Decimal;
use serde_json::Value;

use ocppvo_core::hash::{IgnoreCase, eq_ignore_case};
use ocppvo_core::json::{decimal_to_json, objects_to_json, put_custom_data, try_decimal, try_u32};
use ocppvo_core::{
    CustomData, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject, SerializeHooks,
    mandatory_text,
};

/// A tax applied to a price, in percent.
///
/// `type` is a descriptive name ("VAT", "federal") and ignores case.
#[derive(Debug, Clone)]
pub struct TaxRate {
    tax_type: String,
    tax: Decimal,
    stack: Option<u32>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl TaxRate {
    pub fn new(tax_type: impl Into<String>, tax: Decimal, stack: Option<u32>, custom_data: Option<CustomData>) -> DomainResult<Self> {
        let tax_type = mandatory_text("tax type", tax_type)?;

        let hash = HashComposer::new()
            .field(3, &IgnoreCase(&tax_type))
            .field(5, &tax)
            .field(7, &stack)
            .finish(custom_data.as_ref());

        Ok(Self {
            tax_type,
            tax,
            stack,
            custom_data,
            hash,
        })
    }

    pub fn tax_type(&self) -> &str {
        &self.tax_type
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn stack(&self) -> Option<u32> {
        self.stack
    }

    /// Orders by tax percentage, then stack level, then type name.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.tax
            .cmp(&other.tax)
            .then_with(|| self.stack.cmp(&other.stack))
            .then_with(|| self.tax_type.to_lowercase().cmp(&other.tax_type.to_lowercase()))
    }
}

ocppvo_core::impl_cached_hash!(TaxRate);

impl PartialEq for TaxRate {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && eq_ignore_case(&self.tax_type, &other.tax_type)
                && self.tax == other.tax
                && self.stack == other.stack
                && self.custom_data == other.custom_data)
    }
}

impl Eq for TaxRate {}

impl PartialOrd for TaxRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.compare_to(other) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

impl JsonValueObject for TaxRate {
    const TYPE_NAME: &'static str = "TaxRate";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let tax_type = json.parse_mandatory_text("type", "tax type")?;
        let tax = json.parse_mandatory("tax", "tax percentage", try_decimal)?;
        let stack = json.parse_optional("stack", "stack level", try_u32)?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(tax_type, tax, stack, custom_data)?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("type".into(), Value::String(self.tax_type.clone()));
        json.insert("tax".into(), decimal_to_json(&self.tax));
        if let Some(stack) = self.stack {
            json.insert("stack".into(), Value::from(stack));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// A price, excluding and optionally including taxes.
///
/// Tax rates are an ordered sequence; an empty sequence is emitted as an
/// absent property.
#[derive(Debug, Clone)]
pub struct Price {
    excl_tax: Decimal,
    incl_tax: Option<Decimal>,
    tax_rates: Vec<TaxRate>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl Price {
    pub fn new(
        excl_tax: Decimal,
        incl_tax: Option<Decimal>,
        tax_rates: Vec<TaxRate>,
        custom_data: Option<CustomData>,
    ) -> Self {
        let hash = HashComposer::new()
            .field(3, &excl_tax)
            .field(5, &incl_tax)
            .field(7, &tax_rates)
            .finish(custom_data.as_ref());

        Self {
            excl_tax,
            incl_tax,
            tax_rates,
            custom_data,
            hash,
        }
    }

    /// The additive identity.
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, None, Vec::new(), None)
    }

    pub fn excl_tax(&self) -> Decimal {
        self.excl_tax
    }

    pub fn incl_tax(&self) -> Option<Decimal> {
        self.incl_tax
    }

    pub fn tax_rates(&self) -> &[TaxRate] {
        &self.tax_rates
    }

    /// Orders by the amount excluding taxes, then including taxes (absent
    /// first), then by the number of tax rates.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.excl_tax
            .cmp(&other.excl_tax)
            .then_with(|| self.incl_tax.cmp(&other.incl_tax))
            .then_with(|| self.tax_rates.len().cmp(&other.tax_rates.len()))
    }

    /// Sum of two prices, or `None` on decimal overflow.
    ///
    /// Amounts add up; an absent `inclTax` on one side takes the other side's
    /// value. Tax rates of `other` that `self` does not carry are appended. The
    /// extension payload of `self` wins over that of `other`.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let excl_tax = self.excl_tax.checked_add(other.excl_tax)?;
        let incl_tax = match (self.incl_tax, other.incl_tax) {
            (Some(a), Some(b)) => Some(a.checked_add(b)?),
            (a, b) => a.or(b),
        };

        // Only rates already on the left are skipped; repeats on the right are kept.
        let mut tax_rates = self.tax_rates.clone();
        tax_rates.extend(
            other
                .tax_rates
                .iter()
                .filter(|rate| !self.tax_rates.contains(*rate))
                .cloned(),
        );

        let custom_data = self.custom_data.clone().or_else(|| other.custom_data.clone());
        Some(Self::new(excl_tax, incl_tax, tax_rates, custom_data))
    }
}

ocppvo_core::impl_cached_hash!(Price);

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.excl_tax == other.excl_tax
                && self.incl_tax == other.incl_tax
                && self.tax_rates == other.tax_rates
                && self.custom_data == other.custom_data)
    }
}

impl Eq for Price {}

/// `None` when [`compare_to`](Price::compare_to) ties but the prices differ
/// in other fields, keeping `<`/`>` consistent with `==`.
impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.compare_to(other) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

impl Add for &Price {
    type Output = Price;

    /// Panics on decimal overflow; use [`Price::checked_add`] to avoid it.
    fn add(self, other: &Price) -> Price {
        match self.checked_add(other) {
            Some(sum) => sum,
            None => panic!("price addition overflowed"),
        }
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, other: Price) -> Price {
        &self + &other
    }
}

impl JsonValueObject for Price {
    const TYPE_NAME: &'static str = "Price";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let excl_tax = json.parse_mandatory("exclTax", "price excluding taxes", try_decimal)?;
        let incl_tax = json.parse_optional("inclTax", "price including taxes", try_decimal)?;
        // Singular `taxRate` is accepted when `taxRates` is absent.
        let tax_rates = match json.parse_optional_list::<TaxRate>("taxRates", "tax rates")? {
            Some(rates) => rates,
            None => json
                .parse_optional_list::<TaxRate>("taxRate", "tax rates")?
                .unwrap_or_default(),
        };
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(excl_tax, incl_tax, tax_rates, custom_data))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("exclTax".into(), decimal_to_json(&self.excl_tax));
        if let Some(incl_tax) = &self.incl_tax {
            json.insert("inclTax".into(), decimal_to_json(incl_tax));
        }
        if !self.tax_rates.is_empty() {
            json.insert("taxRates".into(), objects_to_json(&self.tax_rates, hooks));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn vat(percent: &str) -> TaxRate {
        TaxRate::new("VAT", dec(percent), None, None).unwrap()
    }

    #[test]
    fn adding_zero_is_identity() {
        let price = Price::new(dec("100.0"), Some(dec("121.0")), vec![vat("21.0")], None);
        assert_eq!(&price + &Price::zero(), price);
        assert_eq!(&Price::zero() + &price, price);
    }

    #[test]
    fn zero_is_identity_on_both_sides_with_repeated_rates() {
        let price = Price::new(dec("40"), None, vec![vat("19"), vat("19")], None);
        assert_eq!(&Price::zero() + &price, price);
        assert_eq!(&price + &Price::zero(), price);
        assert_eq!((&Price::zero() + &price).tax_rates().len(), 2);
    }

    #[test]
    fn addition_sums_amounts_and_merges_tax_rates() {
        let a = Price::new(dec("10"), Some(dec("12.1")), vec![vat("21")], None);
        let b = Price::new(dec("5"), None, vec![vat("21"), TaxRate::new("city", dec("1"), Some(1), None).unwrap()], None);
        let sum = a + b;

        assert_eq!(sum.excl_tax(), dec("15"));
        assert_eq!(sum.incl_tax(), Some(dec("12.1")));
        assert_eq!(sum.tax_rates().len(), 2);
    }

    #[test]
    fn checked_add_reports_overflow() {
        let max = Price::new(Decimal::MAX, None, vec![], None);
        assert!(max.checked_add(&max).is_none());
    }

    #[test]
    fn ordering_uses_excl_then_incl_then_rate_count() {
        let cheap = Price::new(dec("1"), Some(dec("5")), vec![], None);
        let pricey = Price::new(dec("2"), Some(dec("1")), vec![], None);
        assert!(cheap < pricey);

        let no_incl = Price::new(dec("1"), None, vec![], None);
        assert!(no_incl < cheap);

        let taxed = Price::new(dec("1"), Some(dec("5")), vec![vat("21")], None);
        assert_eq!(cheap.compare_to(&taxed), Ordering::Less);
    }

    #[test]
    fn tie_on_compare_to_without_equality_is_unordered() {
        let a = Price::new(dec("1"), None, vec![vat("21")], None);
        let b = Price::new(dec("1"), None, vec![vat("19")], None);
        assert_eq!(a.compare_to(&b), Ordering::Equal);
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn tax_type_ignores_case() {
        assert_eq!(TaxRate::new("VAT", dec("21"), None, None).unwrap(), TaxRate::new("vat", dec("21"), None, None).unwrap());
        assert!(vat("7") < vat("19"));
    }

    #[test]
    fn scale_does_not_affect_equality() {
        let a = Price::try_parse(&json!({"exclTax": 100.0}), None).unwrap();
        let b = Price::try_parse(&json!({"exclTax": 100}), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tax_rate_order_matters() {
        let a = Price::new(dec("1"), None, vec![vat("21"), vat("7")], None);
        let b = Price::new(dec("1"), None, vec![vat("7"), vat("21")], None);
        assert_ne!(a, b);
    }
}
