//! Customization hooks for the wire representation.
//!
//! A parser hook receives the source JSON and the fully valid default instance
//! and returns the instance to use. A serializer hook receives the value and its
//! default JSON object and returns the object to emit. Both replace, never
//! merge.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::json::JsonObject;

/// Parse-completion hook for `T`.
pub type CustomJsonParser<T> = dyn Fn(&JsonObject, T) -> T + Send + Sync;

/// Serialize-completion hook for `T`.
pub type CustomJsonSerializer<T> = dyn Fn(&T, JsonObject) -> JsonObject + Send + Sync;

/// Serializer hooks keyed by the value type they apply to.
///
/// One registry travels through a whole object graph, so a single call can
/// customize every nesting level (a certificate chain, its hash data and the
/// extension payload of each).
///
/// ```
/// use ocppvo_core::{CustomData, JsonValueObject, SerializeHooks};
///
/// let hooks = SerializeHooks::new().with::<CustomData>(|_, mut json| {
///     json.insert("patched".into(), true.into());
///     json
/// });
///
/// let custom = CustomData::new("ACME", Default::default())?;
/// assert_eq!(custom.to_json_with(&hooks)["patched"], true);
/// # Ok::<(), ocppvo_core::DomainError>(())
/// ```
#[derive(Clone, Default)]
pub struct SerializeHooks {
    serializers: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl SerializeHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the serializer hook for `T`.
    pub fn with<T: 'static>(
        mut self,
        hook: impl Fn(&T, JsonObject) -> JsonObject + Send + Sync + 'static,
    ) -> Self {
        let hook: Box<CustomJsonSerializer<T>> = Box::new(hook);
        self.serializers.insert(TypeId::of::<T>(), Arc::new(hook));
        self
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.serializers.contains_key(&TypeId::of::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    /// Run the hook registered for `T`, or hand back `json` unchanged.
    pub fn apply<T: 'static>(&self, value: &T, json: JsonObject) -> JsonObject {
        let hook = self
            .serializers
            .get(&TypeId::of::<T>())
            .and_then(|hook| (**hook).downcast_ref::<Box<CustomJsonSerializer<T>>>());

        match hook {
            Some(hook) => hook(value, json),
            None => json,
        }
    }
}

impl std::fmt::Debug for SerializeHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializeHooks")
            .field("registered", &self.serializers.len())
            .finish()
    }
}
