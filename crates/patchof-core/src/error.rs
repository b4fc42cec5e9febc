use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// PatchError
///
/// Structured failures for document declaration, population and application.
/// Every failure is raised at the point of detection; the first one found wins.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PatchError {
    #[error("missing field: {field}")]
    MissingField { field: String },

    #[error("value is missing: {slot}")]
    ValueMissing { slot: String },

    #[error("patched object cannot be null")]
    NullTarget,

    #[error("in-place modification of {target} requires every patched field to be mutable")]
    ImmutableTarget { target: &'static str },

    #[error("{target} does not support structural copy")]
    NotCopyable { target: &'static str },

    #[error("{target} does not have a canonical constructor")]
    NoCanonicalConstructor { target: &'static str },

    #[error("constructor parameter '{param}' of {target} has no default and no slot targets it")]
    UnboundConstructorParameter {
        target: &'static str,
        param: &'static str,
    },

    #[error("field '{field}' is not a canonical constructor parameter of {target}")]
    FieldOutsideCanonicalConstructor {
        target: &'static str,
        field: &'static str,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("all slots of {document} must target {target}, but '{slot}' targets {found}")]
    MultipleTargetTypes {
        document: &'static str,
        target: &'static str,
        slot: &'static str,
        found: &'static str,
    },

    #[error("{document} does not declare any slot")]
    EmptyDocument { document: &'static str },

    #[error("{document} declares slot '{slot}' more than once")]
    DuplicateSlot {
        document: &'static str,
        slot: &'static str,
    },

    #[error("{document} has no slot named '{slot}'")]
    UnknownSlot {
        document: &'static str,
        slot: String,
    },

    #[error("cannot decode '{slot}': {message}")]
    Decode { slot: String, message: String },
}

impl PatchError {
    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub(crate) fn value_missing(slot: impl Into<String>) -> Self {
        Self::ValueMissing { slot: slot.into() }
    }

    pub(crate) fn decode(slot: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            slot: slot.into(),
            message: message.to_string(),
        }
    }

    /// Constructor parameter that reached the canonical constructor without a value.
    /// Used by generated `Record::construct` implementations.
    #[must_use]
    pub const fn unbound_parameter(target: &'static str, param: &'static str) -> Self {
        Self::UnboundConstructorParameter { target, param }
    }

    /// Build a type mismatch between two Rust types.
    #[must_use]
    pub fn type_mismatch<Expected: ?Sized, Found: ?Sized>() -> Self {
        Self::TypeMismatch {
            expected: std::any::type_name::<Expected>(),
            found: std::any::type_name::<Found>(),
        }
    }

    /// Re-root a failure raised inside a nested document under the parent slot name.
    /// Only variants that carry a slot path change; the variant itself is kept.
    #[must_use]
    pub fn within(self, slot: &str) -> Self {
        match self {
            Self::MissingField { field } => Self::MissingField {
                field: join_path(slot, &field),
            },
            Self::ValueMissing { slot: inner } => Self::ValueMissing {
                slot: join_path(slot, &inner),
            },
            Self::UnknownSlot {
                document,
                slot: inner,
            } => Self::UnknownSlot {
                document,
                slot: join_path(slot, &inner),
            },
            Self::Decode {
                slot: inner,
                message,
            } => Self::Decode {
                slot: join_path(slot, &inner),
                message,
            },
            other => other,
        }
    }

    /// Stable classification used by hosts to pick an error-reporting convention.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingField { .. }
            | Self::ValueMissing { .. }
            | Self::NullTarget
            | Self::UnknownSlot { .. }
            | Self::Decode { .. } => ErrorClass::Input,

            Self::ImmutableTarget { .. } | Self::NotCopyable { .. } => ErrorClass::Unsupported,

            Self::NoCanonicalConstructor { .. }
            | Self::UnboundConstructorParameter { .. }
            | Self::FieldOutsideCanonicalConstructor { .. }
            | Self::TypeMismatch { .. }
            | Self::MultipleTargetTypes { .. }
            | Self::EmptyDocument { .. }
            | Self::DuplicateSlot { .. } => ErrorClass::Configuration,
        }
    }

    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self.class(), ErrorClass::Input)
    }
}

fn join_path(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}.{suffix}")
    }
}

///
/// ErrorClass
///
/// Input errors are caused by the populated values, configuration errors by
/// the declaration of a document or record, unsupported errors by asking a
/// record for a capability it does not have.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum ErrorClass {
    Configuration,
    Input,
    Unsupported,
}

///
/// TESTS
///
