//! `ocppvo-types`: concrete OCPP 2.x value types.
//!
//! Every type here implements [`ocppvo_core::JsonValueObject`]: it parses from
//! a JSON object with per-field error reporting, serializes back with optional
//! hooks, and carries a structural hash computed once at construction.

pub mod certificate;
pub mod charging;
pub mod component;
pub mod enums;
pub mod meter;
pub mod monitoring;
pub mod status_info;
pub mod tariff;

pub use certificate::{CertificateHashData, CertificateHashDataChain};
pub use charging::{ChargingLimit, ChargingSchedule, ChargingSchedulePeriod};
pub use component::{Component, Evse, Variable};
pub use enums::{
    ChargingLimitSource, ChargingRateUnit, ConnectorStatus, GetCertificateIdUse, HashAlgorithm, Location, Measurand,
    MonitorType, Phase, ReadingContext,
};
pub use meter::{MeterValue, SampledValue, SignedMeterValue, UnitOfMeasure};
pub use monitoring::{MonitoringData, VariableMonitoring};
pub use status_info::{ConnectorStatusCodec, ConnectorStatusReport, StatusInfo};
pub use tariff::{Price, TaxRate};
