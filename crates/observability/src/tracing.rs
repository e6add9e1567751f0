//! Tracing/logging initialization.
//!
//! The filter comes from `RUST_LOG`; output format and target display come
//! from `OCPPVO_LOG_FORMAT` (`json` | `pretty`) and `OCPPVO_LOG_TARGET`.

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "OCPPVO_LOG_FORMAT";
pub const LOG_TARGET_ENV: &str = "OCPPVO_LOG_TARGET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset or unparsable.
    pub default_filter: String,
    pub json: bool,
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: true,
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unknown values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            match format.trim().to_ascii_lowercase().as_str() {
                "json" => config.json = true,
                "pretty" | "text" => config.json = false,
                _ => {}
            }
        }

        if let Some(target) = lookup(LOG_TARGET_ENV) {
            match target.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.with_target = true,
                "0" | "false" | "no" => config.with_target = false,
                _ => {}
            }
        }

        config
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Install the global subscriber described by `config`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &ObservabilityConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(config.with_target);

    // try_init fails only when a global subscriber is already set.
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if installed.is_ok() {
        ::tracing::debug!(json = config.json, with_target = config.with_target, "tracing initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_to_json_without_target() {
        let config = ObservabilityConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ObservabilityConfig::default());
        assert!(config.json);
        assert!(!config.with_target);
        assert_eq!(config.default_filter, "info");
    }

    #[test]
    fn reads_format_and_target() {
        let config = ObservabilityConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "Pretty"), (LOG_TARGET_ENV, "true")]));
        assert!(!config.json);
        assert!(config.with_target);
    }

    #[test]
    fn unknown_values_keep_defaults() {
        let config = ObservabilityConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "xml"), (LOG_TARGET_ENV, "maybe")]));
        assert_eq!(config, ObservabilityConfig::default());
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with(&ObservabilityConfig::default());
        init_with(&ObservabilityConfig {
            json: false,
            ..ObservabilityConfig::default()
        });
    }
}
