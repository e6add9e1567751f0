//! `ocppvo-core`: the generic value-object contract for OCPP JSON messages.
//!
//! This crate contains no concrete protocol types, only the machinery every
//! value type applies:
//!
//! - [`json`]: field parser/validator (mandatory/optional scalars, nested
//!   objects, sequences and sets)
//! - [`hash`]: stable structural hashing and per-field string policies
//! - [`custom_data`]: the `customData` extension payload
//! - [`hooks`]: parse/serialize customization hooks
//! - [`status`]: the generic status wrapper with injected codecs
//! - [`value_object`]: the [`JsonValueObject`] trait and its error boundary

pub mod custom_data;
pub mod error;
pub mod hash;
pub mod hooks;
pub mod json;
pub mod set;
pub mod status;
pub mod value_object;

pub use custom_data::CustomData;
pub use error::{DomainError, DomainResult, FieldError, ParseError};
pub use hash::{HashComposer, IgnoreCase, StableHash};
pub use hooks::{CustomJsonParser, CustomJsonSerializer, SerializeHooks};
pub use json::{JsonObject, JsonObjectExt};
pub use set::ValueSet;
pub use status::{FnStatusCodec, StatusCodec, TypedStatus};
pub use value_object::{JsonValueObject, mandatory_text};

/// Implement `Hash` and [`StableHash`] for a value object from its cached
/// `hash: u64` field.
#[macro_export]
macro_rules! impl_cached_hash {
    ($($t:ty),* $(,)?) => {
        $(
            impl ::std::hash::Hash for $t {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    state.write_u64(self.hash);
                }
            }

            impl $crate::hash::StableHash for $t {
                fn stable_hash(&self) -> u64 {
                    self.hash
                }
            }
        )*
    };
}
