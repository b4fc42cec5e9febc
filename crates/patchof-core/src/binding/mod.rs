//! Record binding: which target fields a document may write, and through
//! which operation (canonical constructor or structural copy).

mod cache;

pub use cache::{BindingCache, CacheStats};

use crate::{
    document::PatchDocument,
    error::PatchError,
    model::{ParamModel, RecordModel},
};
use derive_more::Display;
use std::collections::BTreeMap;

///
/// BindingKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum BindingKind {
    #[display("constructor")]
    Constructor,
    #[display("copy")]
    Copy,
}

///
/// RecordBinding
///
/// Resolved parameter table of one target type for one binding kind.
/// Copy bindings share the canonical parameter table, defaults included.
///

#[derive(Debug)]
pub struct RecordBinding {
    path: &'static str,
    kind: BindingKind,
    params: BTreeMap<&'static str, ParamModel>,
}

impl RecordBinding {
    /// Resolve the binding of `model` for `kind`, or fail when the record lacks
    /// the operation.
    pub fn resolve(model: &'static RecordModel, kind: BindingKind) -> Result<Self, PatchError> {
        match kind {
            BindingKind::Constructor if !model.constructible => {
                return Err(PatchError::NoCanonicalConstructor { target: model.path });
            }
            BindingKind::Copy if !model.copyable => {
                return Err(PatchError::NotCopyable { target: model.path });
            }
            _ => {}
        }

        let params = model
            .params
            .iter()
            .map(|param| (param.name, *param))
            .collect();

        Ok(Self {
            path: model.path,
            kind,
            params,
        })
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub const fn kind(&self) -> BindingKind {
        self.kind
    }

    #[must_use]
    pub fn param(&self, field: &str) -> Option<&ParamModel> {
        self.params.get(field)
    }

    /// True when an absent argument for `field` is filled in by the operation.
    #[must_use]
    pub fn has_default(&self, field: &str) -> bool {
        self.param(field).is_some_and(|param| param.has_default)
    }

    /// Check every slot of `document` against this binding.
    ///
    /// Each slot must write a parameter, and each parameter without a default
    /// must be written by some slot.
    pub fn bind(&self, document: &PatchDocument) -> Result<(), PatchError> {
        for slot in document.slots() {
            if !self.params.contains_key(slot.field()) {
                return Err(PatchError::FieldOutsideCanonicalConstructor {
                    target: self.path,
                    field: slot.field(),
                });
            }
        }

        for param in self.params.values().filter(|param| !param.has_default) {
            if !document.slots().any(|slot| slot.field() == param.name) {
                return Err(PatchError::UnboundConstructorParameter {
                    target: self.path,
                    param: param.name,
                });
            }
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Gadget, Opaque, Widget};
    use crate::traits::Record;

    #[test]
    fn constructor_binding_keeps_declared_defaults() {
        let binding = RecordBinding::resolve(Widget::MODEL, BindingKind::Constructor)
            .expect("widget should be constructible");

        assert!(!binding.has_default("id"));
        assert!(binding.has_default("label"));
        assert!(!binding.has_default("unknown"));
    }

    #[test]
    fn copy_binding_keeps_declared_defaults() {
        let binding = RecordBinding::resolve(Widget::MODEL, BindingKind::Copy)
            .expect("widget should be copyable");

        assert!(!binding.has_default("id"));
        assert!(binding.has_default("created"));
        assert_eq!(binding.kind(), BindingKind::Copy);
    }

    #[test]
    fn missing_operations_are_reported() {
        let err = RecordBinding::resolve(Gadget::MODEL, BindingKind::Copy)
            .expect_err("gadget has no structural copy");
        assert_eq!(err, PatchError::NotCopyable { target: Gadget::MODEL.path });

        let err = RecordBinding::resolve(Opaque::MODEL, BindingKind::Constructor)
            .expect_err("opaque has no constructor");
        assert_eq!(
            err,
            PatchError::NoCanonicalConstructor { target: Opaque::MODEL.path }
        );
    }

    #[test]
    fn bind_rejects_fields_outside_the_constructor() {
        let document = PatchDocument::builder("SecretPatch")
            .slot("secret", Widget::SECRET)
            .slot("id", Widget::ID)
            .build()
            .expect("document should build");
        let binding = RecordBinding::resolve(Widget::MODEL, BindingKind::Constructor)
            .expect("widget should be constructible");

        let err = binding.bind(&document).expect_err("skipped field is not a parameter");
        assert_eq!(
            err,
            PatchError::FieldOutsideCanonicalConstructor {
                target: Widget::MODEL.path,
                field: "secret",
            }
        );
    }

    #[test]
    fn bind_rejects_unbound_required_parameters() {
        let document = PatchDocument::builder("LabelPatch")
            .slot("label", Widget::LABEL)
            .build()
            .expect("document should build");

        let constructor = RecordBinding::resolve(Widget::MODEL, BindingKind::Constructor)
            .expect("widget should be constructible");
        let err = constructor.bind(&document).expect_err("id has no default");
        assert_eq!(err, PatchError::unbound_parameter(Widget::MODEL.path, "id"));

        let copy = RecordBinding::resolve(Widget::MODEL, BindingKind::Copy)
            .expect("widget should be copyable");
        let err = copy.bind(&document).expect_err("id has no default");
        assert_eq!(err, PatchError::unbound_parameter(Widget::MODEL.path, "id"));
    }
}
