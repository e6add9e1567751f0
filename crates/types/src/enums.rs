//! Closed OCPP enumerations with their wire spellings.

use serde::{Deserialize, Serialize};

use ocppvo_core::StableHash;

/// Declares an enumeration whose serde names are its OCPP wire spellings.
///
/// The stable hash is taken from the wire spelling, so reordering variants
/// never changes hash codes.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl core::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!("unknown {} '{other}'", stringify!($name))),
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl StableHash for $name {
            fn stable_hash(&self) -> u64 {
                self.as_str().stable_hash()
            }
        }
    };
}

wire_enum! {
    /// Hash algorithm used for certificate hash data.
    HashAlgorithm {
        Sha256 => "SHA256",
        Sha384 => "SHA384",
        Sha512 => "SHA512",
    }
}

wire_enum! {
    /// Kind of certificate a hash-data chain refers to.
    GetCertificateIdUse {
        V2gRootCertificate => "V2GRootCertificate",
        MoRootCertificate => "MORootCertificate",
        CsmsRootCertificate => "CSMSRootCertificate",
        V2gCertificateChain => "V2GCertificateChain",
        ManufacturerRootCertificate => "ManufacturerRootCertificate",
    }
}

wire_enum! {
    /// Origin of a charging limit.
    ChargingLimitSource {
        Ems => "EMS",
        Other => "Other",
        So => "SO",
        Cso => "CSO",
    }
}

wire_enum! {
    ChargingRateUnit {
        W => "W",
        A => "A",
    }
}

wire_enum! {
    /// Reading context for sampled values.
    ReadingContext {
        InterruptionBegin => "Interruption.Begin",
        InterruptionEnd => "Interruption.End",
        Other => "Other",
        SampleClock => "Sample.Clock",
        SamplePeriodic => "Sample.Periodic",
        TransactionBegin => "Transaction.Begin",
        TransactionEnd => "Transaction.End",
        Trigger => "Trigger",
    }
}

wire_enum! {
    /// Measurand types for meter values.
    Measurand {
        CurrentExport => "Current.Export",
        CurrentImport => "Current.Import",
        CurrentOffered => "Current.Offered",
        EnergyActiveExportRegister => "Energy.Active.Export.Register",
        EnergyActiveImportRegister => "Energy.Active.Import.Register",
        EnergyActiveNet => "Energy.Active.Net",
        Frequency => "Frequency",
        PowerActiveExport => "Power.Active.Export",
        PowerActiveImport => "Power.Active.Import",
        PowerOffered => "Power.Offered",
        SoC => "SoC",
        Voltage => "Voltage",
    }
}

wire_enum! {
    Phase {
        L1 => "L1",
        L2 => "L2",
        L3 => "L3",
        N => "N",
        L1N => "L1-N",
        L2N => "L2-N",
        L3N => "L3-N",
        L1L2 => "L1-L2",
        L2L3 => "L2-L3",
        L3L1 => "L3-L1",
    }
}

wire_enum! {
    /// Where a sampled value was measured.
    Location {
        Body => "Body",
        Cable => "Cable",
        Ev => "EV",
        Inlet => "Inlet",
        Outlet => "Outlet",
    }
}

wire_enum! {
    MonitorType {
        UpperThreshold => "UpperThreshold",
        LowerThreshold => "LowerThreshold",
        Delta => "Delta",
        Periodic => "Periodic",
        PeriodicClockAligned => "PeriodicClockAligned",
    }
}

wire_enum! {
    /// Connector availability, as reported through a status wrapper.
    ConnectorStatus {
        Available => "Available",
        Occupied => "Occupied",
        Reserved => "Reserved",
        Unavailable => "Unavailable",
        Faulted => "Faulted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocppvo_core::json::{enum_to_json, try_enum};
    use serde_json::json;

    #[test]
    fn wire_spelling_round_trips_through_serde() {
        assert_eq!(enum_to_json(&Measurand::EnergyActiveImportRegister), json!("Energy.Active.Import.Register"));
        assert_eq!(try_enum::<Phase>(&json!("L1-N")), Ok(Phase::L1N));
        assert_eq!(ReadingContext::SamplePeriodic.to_string(), "Sample.Periodic");
    }

    #[test]
    fn enum_parsing_is_case_sensitive() {
        assert!(try_enum::<HashAlgorithm>(&json!("sha256")).is_err());
        assert_eq!(try_enum::<HashAlgorithm>(&json!("SHA256")), Ok(HashAlgorithm::Sha256));
    }

    #[test]
    fn stable_hash_follows_wire_spelling() {
        assert_eq!(ChargingRateUnit::W.stable_hash(), "W".stable_hash());
    }

    #[test]
    fn from_str_matches_wire_spelling() {
        assert_eq!("CSO".parse::<ChargingLimitSource>(), Ok(ChargingLimitSource::Cso));
        let err = "Cso".parse::<ChargingLimitSource>().unwrap_err();
        assert!(err.contains("ChargingLimitSource"));
    }
}
