use patchof_core::error::{ErrorClass, PatchError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable class + kind taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            class,
            kind,
            message: message.into(),
        }
    }

    /// The caller can remediate this by changing the input.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self.class, ErrorClass::Input)
    }
}

impl From<PatchError> for Error {
    fn from(err: PatchError) -> Self {
        let kind = match &err {
            PatchError::MissingField { .. } => ErrorKind::MissingField,
            PatchError::ValueMissing { .. } => ErrorKind::ValueMissing,
            PatchError::NullTarget => ErrorKind::NullTarget,
            PatchError::ImmutableTarget { .. } => ErrorKind::ImmutableTarget,
            PatchError::NotCopyable { .. } => ErrorKind::NotCopyable,
            PatchError::NoCanonicalConstructor { .. } => ErrorKind::NoCanonicalConstructor,
            PatchError::UnboundConstructorParameter { .. } => {
                ErrorKind::UnboundConstructorParameter
            }
            PatchError::FieldOutsideCanonicalConstructor { .. } => {
                ErrorKind::FieldOutsideCanonicalConstructor
            }
            PatchError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            PatchError::MultipleTargetTypes { .. } => ErrorKind::MultipleTargetTypes,
            PatchError::EmptyDocument { .. } => ErrorKind::EmptyDocument,
            PatchError::DuplicateSlot { .. } => ErrorKind::DuplicateSlot,
            PatchError::UnknownSlot { .. } => ErrorKind::UnknownSlot,
            PatchError::Decode { .. } => ErrorKind::Decode,
        };

        Self::new(err.class(), kind, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers, one kind per failure condition.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ErrorKind {
    Decode,
    DuplicateSlot,
    EmptyDocument,
    FieldOutsideCanonicalConstructor,
    ImmutableTarget,
    MissingField,
    MultipleTargetTypes,
    NoCanonicalConstructor,
    NotCopyable,
    NullTarget,
    TypeMismatch,
    UnboundConstructorParameter,
    UnknownSlot,
    ValueMissing,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_keep_their_message() {
        let err = Error::from(PatchError::MissingField {
            field: "nested.bf".to_string(),
        });

        assert_eq!(err.class, ErrorClass::Input);
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.to_string(), "missing field: nested.bf");
        assert!(err.is_input());
    }

    #[test]
    fn configuration_errors_are_not_input() {
        let err = Error::from(PatchError::EmptyDocument { document: "Empty" });

        assert_eq!(err.class, ErrorClass::Configuration);
        assert!(!err.is_input());
    }

    #[test]
    fn error_serializes_with_class_and_kind() {
        let err = Error::from(PatchError::NullTarget);
        let json = serde_json::to_value(&err).expect("error should serialize");

        assert_eq!(json["class"], "Input");
        assert_eq!(json["kind"], "NullTarget");
        assert_eq!(json["message"], "patched object cannot be null");
    }
}
