//! Error model for value-object construction and parsing.

use thiserror::Error;

/// Result type used by value-object constructors with structural invariants.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised by constructors, never by the wire parser itself. A value that fails
/// here was well-formed JSON but violates the type's own contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. out of the allowed range).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A structural invariant was violated (e.g. an empty mandatory collection).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

/// Failure to extract a single field from a JSON object.
///
/// Every variant carries the JSON property name and a human label so that the
/// final message always identifies the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing mandatory JSON property '{key}' ({label})")]
    Missing { key: String, label: String },

    #[error("invalid JSON property '{key}' ({label}): {detail}")]
    Invalid {
        key: String,
        label: String,
        detail: String,
    },

    #[error("invalid element #{index} of JSON property '{key}' ({label}): {detail}")]
    InvalidElement {
        key: String,
        label: String,
        index: usize,
        detail: String,
    },

    #[error("invalid nested JSON property '{key}' ({label}): {source}")]
    Nested {
        key: String,
        label: String,
        #[source]
        source: Box<ParseError>,
    },

    #[error(transparent)]
    Invariant(#[from] DomainError),
}

impl FieldError {
    pub fn missing(key: &str, label: &str) -> Self {
        Self::Missing {
            key: key.to_string(),
            label: label.to_string(),
        }
    }

    pub fn invalid(key: &str, label: &str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            label: label.to_string(),
            detail: detail.into(),
        }
    }

    pub fn invalid_element(key: &str, label: &str, index: usize, detail: impl Into<String>) -> Self {
        Self::InvalidElement {
            key: key.to_string(),
            label: label.to_string(),
            index,
            detail: detail.into(),
        }
    }

    /// Wrap the failure of a nested value object.
    ///
    /// Invariant violations keep their identity instead of being demoted to a
    /// wire-format error.
    pub fn nested(key: &str, label: &str, source: ParseError) -> Self {
        match source {
            ParseError::Invariant { source, .. } => Self::Invariant(source),
            other => Self::Nested {
                key: key.to_string(),
                label: label.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Error returned by `try_parse`/`parse`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The JSON does not describe a valid instance (missing field, malformed
    /// literal, wrong shape, or an unexpected failure while parsing).
    #[error("The given JSON representation of {type_name} is invalid: {detail}")]
    Invalid {
        type_name: &'static str,
        detail: String,
    },

    /// The JSON was well-formed but the assembled value breaks a structural
    /// invariant of its type.
    #[error("The given {type_name} violates a structural invariant: {source}")]
    Invariant {
        type_name: &'static str,
        #[source]
        source: DomainError,
    },
}

impl ParseError {
    pub fn invalid(type_name: &'static str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            type_name,
            detail: detail.into(),
        }
    }

    /// Lift a field-level failure into the error channel of `type_name`.
    pub fn from_field(type_name: &'static str, err: FieldError) -> Self {
        match err {
            FieldError::Invariant(source) => Self::Invariant { type_name, source },
            other => Self::invalid(type_name, other.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Invalid { type_name, .. } | Self::Invariant { type_name, .. } => type_name,
        }
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Invariant { .. })
    }
}
