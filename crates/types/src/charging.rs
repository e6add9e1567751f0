//! Charging limits and charging schedules.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use ocppvo_core::json::{
    decimal_to_json, enum_to_json, objects_to_json, put_custom_data, timestamp_to_json, try_bool, try_decimal,
    try_enum, try_i32, try_timestamp,
};
use ocppvo_core::{
    CustomData, DomainError, DomainResult, FieldError, HashComposer, JsonObject, JsonObjectExt, JsonValueObject,
    SerializeHooks,
};

use crate::enums::{ChargingLimitSource, ChargingRateUnit};

/// Source and grid relevance of a charging limit.
#[derive(Debug, Clone)]
pub struct ChargingLimit {
    charging_limit_source: ChargingLimitSource,
    is_local_generation: Option<bool>,
    is_grid_critical: Option<bool>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl ChargingLimit {
    pub fn new(
        charging_limit_source: ChargingLimitSource,
        is_local_generation: Option<bool>,
        is_grid_critical: Option<bool>,
        custom_data: Option<CustomData>,
    ) -> Self {
        let hash = HashComposer::new()
            .field(3, &charging_limit_source)
            .field(5, &is_local_generation)
            .field(7, &is_grid_critical)
            .finish(custom_data.as_ref());

        Self {
            charging_limit_source,
            is_local_generation,
            is_grid_critical,
            custom_data,
            hash,
        }
    }

    pub fn charging_limit_source(&self) -> ChargingLimitSource {
        self.charging_limit_source
    }

    pub fn is_local_generation(&self) -> Option<bool> {
        self.is_local_generation
    }

    pub fn is_grid_critical(&self) -> Option<bool> {
        self.is_grid_critical
    }
}

ocppvo_core::impl_cached_hash!(ChargingLimit);

impl PartialEq for ChargingLimit {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.charging_limit_source == other.charging_limit_source
                && self.is_local_generation == other.is_local_generation
                && self.is_grid_critical == other.is_grid_critical
                && self.custom_data == other.custom_data)
    }
}

impl Eq for ChargingLimit {}

impl JsonValueObject for ChargingLimit {
    const TYPE_NAME: &'static str = "ChargingLimit";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let source = json.parse_mandatory("chargingLimitSource", "charging limit source", try_enum)?;
        let is_local_generation = json.parse_optional("isLocalGeneration", "local generation", try_bool)?;
        let is_grid_critical = json.parse_optional("isGridCritical", "grid critical", try_bool)?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(source, is_local_generation, is_grid_critical, custom_data))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("chargingLimitSource".into(), enum_to_json(&self.charging_limit_source));
        if let Some(local) = self.is_local_generation {
            json.insert("isLocalGeneration".into(), Value::Bool(local));
        }
        if let Some(critical) = self.is_grid_critical {
            json.insert("isGridCritical".into(), Value::Bool(critical));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// One period of a charging schedule, starting `start_period` seconds after
/// the schedule start.
#[derive(Debug, Clone)]
pub struct ChargingSchedulePeriod {
    start_period: i32,
    limit: Decimal,
    number_phases: Option<i32>,
    phase_to_use: Option<i32>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl ChargingSchedulePeriod {
    pub fn new(
        start_period: i32,
        limit: Decimal,
        number_phases: Option<i32>,
        phase_to_use: Option<i32>,
        custom_data: Option<CustomData>,
    ) -> Self {
        let hash = HashComposer::new()
            .field(3, &start_period)
            .field(5, &limit)
            .field(7, &number_phases)
            .field(11, &phase_to_use)
            .finish(custom_data.as_ref());

        Self {
            start_period,
            limit,
            number_phases,
            phase_to_use,
            custom_data,
            hash,
        }
    }

    pub fn start_period(&self) -> i32 {
        self.start_period
    }

    pub fn limit(&self) -> Decimal {
        self.limit
    }

    pub fn number_phases(&self) -> Option<i32> {
        self.number_phases
    }

    pub fn phase_to_use(&self) -> Option<i32> {
        self.phase_to_use
    }

    /// Orders by start period, then by limit.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.start_period
            .cmp(&other.start_period)
            .then_with(|| self.limit.cmp(&other.limit))
    }
}

ocppvo_core::impl_cached_hash!(ChargingSchedulePeriod);

impl PartialEq for ChargingSchedulePeriod {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.start_period == other.start_period
                && self.limit == other.limit
                && self.number_phases == other.number_phases
                && self.phase_to_use == other.phase_to_use
                && self.custom_data == other.custom_data)
    }
}

impl Eq for ChargingSchedulePeriod {}

/// `None` when [`compare_to`](ChargingSchedulePeriod::compare_to) ties but the
/// periods differ in other fields.
impl PartialOrd for ChargingSchedulePeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.compare_to(other) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

impl JsonValueObject for ChargingSchedulePeriod {
    const TYPE_NAME: &'static str = "ChargingSchedulePeriod";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let start_period = json.parse_mandatory("startPeriod", "start period", try_i32)?;
        let limit = json.parse_mandatory("limit", "charging limit", try_decimal)?;
        let number_phases = json.parse_optional("numberPhases", "number of phases", try_i32)?;
        let phase_to_use = json.parse_optional("phaseToUse", "phase to use", try_i32)?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(start_period, limit, number_phases, phase_to_use, custom_data))
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("startPeriod".into(), Value::from(self.start_period));
        json.insert("limit".into(), decimal_to_json(&self.limit));
        if let Some(number_phases) = self.number_phases {
            json.insert("numberPhases".into(), Value::from(number_phases));
        }
        if let Some(phase_to_use) = self.phase_to_use {
            json.insert("phaseToUse".into(), Value::from(phase_to_use));
        }
        put_custom_data(&mut json, self.custom_data.as_ref(), hooks);
        json
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }
}

/// A charging schedule: an ordered, non-empty sequence of periods.
#[derive(Debug, Clone)]
pub struct ChargingSchedule {
    id: i32,
    charging_rate_unit: ChargingRateUnit,
    charging_schedule_period: Vec<ChargingSchedulePeriod>,
    start_schedule: Option<DateTime<Utc>>,
    duration: Option<i32>,
    min_charging_rate: Option<Decimal>,
    custom_data: Option<CustomData>,
    hash: u64,
}

impl ChargingSchedule {
    pub fn new(
        id: i32,
        charging_rate_unit: ChargingRateUnit,
        charging_schedule_period: Vec<ChargingSchedulePeriod>,
        start_schedule: Option<DateTime<Utc>>,
        duration: Option<i32>,
        min_charging_rate: Option<Decimal>,
        custom_data: Option<CustomData>,
    ) -> DomainResult<Self> {
        if charging_schedule_period.is_empty() {
            return Err(DomainError::invariant(
                "a charging schedule needs at least one charging schedule period",
            ));
        }

        let hash = HashComposer::new()
            .field(3, &id)
            .field(5, &charging_rate_unit)
            .field(7, &charging_schedule_period)
            .field(11, &start_schedule)
            .field(13, &duration)
            .field(17, &min_charging_rate)
            .finish(custom_data.as_ref());

        Ok(Self {
            id,
            charging_rate_unit,
            charging_schedule_period,
            start_schedule,
            duration,
            min_charging_rate,
            custom_data,
            hash,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn charging_rate_unit(&self) -> ChargingRateUnit {
        self.charging_rate_unit
    }

    pub fn charging_schedule_period(&self) -> &[ChargingSchedulePeriod] {
        &self.charging_schedule_period
    }

    pub fn start_schedule(&self) -> Option<DateTime<Utc>> {
        self.start_schedule
    }

    pub fn duration(&self) -> Option<i32> {
        self.duration
    }

    pub fn min_charging_rate(&self) -> Option<Decimal> {
        self.min_charging_rate
    }

    /// The period in force `offset_seconds` after the schedule start.
    pub fn period_at(&self, offset_seconds: i32) -> Option<&ChargingSchedulePeriod> {
        if let Some(duration) = self.duration {
            if offset_seconds >= duration {
                return None;
            }
        }
        self.charging_schedule_period
            .iter()
            .filter(|period| period.start_period <= offset_seconds)
            .max_by_key(|period| period.start_period)
    }
}

ocppvo_core::impl_cached_hash!(ChargingSchedule);

impl PartialEq for ChargingSchedule {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.hash == other.hash
                && self.id == other.id
                && self.charging_rate_unit == other.charging_rate_unit
                && self.charging_schedule_period == other.charging_schedule_period
                && self.start_schedule == other.start_schedule
                && self.duration == other.duration
                && self.min_charging_rate == other.min_charging_rate
                && self.custom_data == other.custom_data)
    }
}

impl Eq for ChargingSchedule {}

impl JsonValueObject for ChargingSchedule {
    const TYPE_NAME: &'static str = "ChargingSchedule";

    fn from_json_fields(json: &JsonObject) -> Result<Self, FieldError> {
        let id = json.parse_mandatory("id", "charging schedule identification", try_i32)?;
        let unit = json.parse_mandatory("chargingRateUnit", "charging rate unit", try_enum)?;
        let periods = json.parse_mandatory_list::<ChargingSchedulePeriod>(
            "chargingSchedulePeriod",
            "charging schedule periods",
        )?;
        let start_schedule = json.parse_optional("startSchedule", "start schedule", try_timestamp)?;
        let duration = json.parse_optional("duration", "duration", try_i32)?;
        let min_charging_rate = json.parse_optional("minChargingRate", "minimum charging rate", try_decimal)?;
        let custom_data = json.parse_custom_data()?;

        Ok(Self::new(
            id,
            unit,
            periods,
            start_schedule,
            duration,
            min_charging_rate,
            custom_data,
        )?)
    }

    fn to_json_fields(&self, hooks: &SerializeHooks) -> JsonObject {
        let mut json = JsonObject::new();
        json.insert("id".into(), Value::from(self.id));
        json.insert("chargingRateUnit".into(), enum_to_json(&self.charging_rate_unit));
        json.insert(
            "chargingSchedulePeriod".into(),
            objects_to_json(&self.charging_schedule_period, hooks),
        );
        if let Some(start_schedule) = &self.start_schedule {
            json.insert("startSchedule".into(), timestamp_to_json(start_schedule));
        }
        if let Some(duration) = self.duration {
            json.insert("duration".into(), Value::from(duration));
        }
        if let Some(rate) = &self.min_charging_rate {
            json.insert("minChargingRate".into(), decimal_to_json(rate));
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
    use ocppvo_core::ParseError;
    use serde_json::json;

    fn period(start: i32, limit: i64) -> ChargingSchedulePeriod {
        ChargingSchedulePeriod::new(start, Decimal::from(limit), None, None, None)
    }

    #[test]
    fn charging_limit_omits_absent_flags() {
        let raw = json!({"chargingLimitSource": "EMS", "isGridCritical": true});
        let limit = ChargingLimit::try_parse(&raw, None).unwrap();

        assert_eq!(limit.charging_limit_source(), ChargingLimitSource::Ems);
        assert_eq!(limit.is_grid_critical(), Some(true));
        assert_eq!(limit.is_local_generation(), None);

        let out = limit.to_json();
        assert!(out.get("isLocalGeneration").is_none());
        assert_eq!(out, raw);
    }

    #[test]
    fn absent_flag_is_not_equal_to_false() {
        let absent = ChargingLimit::new(ChargingLimitSource::So, None, None, None);
        let explicit = ChargingLimit::new(ChargingLimitSource::So, Some(false), None, None);
        assert_ne!(absent, explicit);
    }

    #[test]
    fn empty_schedule_is_an_invariant_violation() {
        let err = ChargingSchedule::new(1, ChargingRateUnit::W, vec![], None, None, None, None).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let raw = json!({"id": 1, "chargingRateUnit": "W", "chargingSchedulePeriod": []});
        let err = ChargingSchedule::try_parse(&raw, None).unwrap_err();
        assert!(matches!(err, ParseError::Invariant { type_name: "ChargingSchedule", .. }));
    }

    #[test]
    fn missing_period_array_is_a_wire_error() {
        let raw = json!({"id": 1, "chargingRateUnit": "A"});
        let err = ChargingSchedule::try_parse(&raw, None).unwrap_err();
        assert!(!err.is_invariant_violation());
        assert!(err.to_string().contains("chargingSchedulePeriod"));
    }

    #[test]
    fn period_order_matters() {
        let a = ChargingSchedule::new(1, ChargingRateUnit::W, vec![period(0, 11000), period(3600, 7400)], None, None, None, None).unwrap();
        let b = ChargingSchedule::new(1, ChargingRateUnit::W, vec![period(3600, 7400), period(0, 11000)], None, None, None, None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn period_at_picks_latest_started_period() {
        let schedule = ChargingSchedule::new(
            7,
            ChargingRateUnit::A,
            vec![period(0, 32), period(1800, 16)],
            None,
            Some(3600),
            None,
            None,
        )
        .unwrap();

        assert_eq!(schedule.period_at(0).map(|p| p.limit()), Some(Decimal::from(32)));
        assert_eq!(schedule.period_at(2000).map(|p| p.limit()), Some(Decimal::from(16)));
        assert!(schedule.period_at(3600).is_none());
    }

    #[test]
    fn periods_order_by_start() {
        assert!(period(0, 10) < period(60, 5));
        assert_eq!(period(60, 5).partial_cmp(&period(60, 5)), Some(Ordering::Equal));
        let with_phases = ChargingSchedulePeriod::new(60, Decimal::from(5), Some(3), None, None);
        assert_eq!(period(60, 5).partial_cmp(&with_phases), None);
    }

    #[test]
    fn schedule_round_trips() {
        let raw = json!({
            "id": 3,
            "chargingRateUnit": "W",
            "chargingSchedulePeriod": [
                {"startPeriod": 0, "limit": 22000, "numberPhases": 3},
                {"startPeriod": 900, "limit": 7400.5}
            ],
            "startSchedule": "2024-03-01T08:00:00Z",
            "minChargingRate": 1400
        });
        let schedule = ChargingSchedule::try_parse(&raw, None).unwrap();
        assert_eq!(schedule.charging_schedule_period().len(), 2);
        assert_eq!(schedule.to_json(), raw);
    }
}
