//! Value slots: one declared patch field each, flat or nested.

mod flat;
mod nested;

pub(crate) use flat::FlatSlot;
pub(crate) use nested::NestedSlot;

use crate::{
    binding::BindingCache, document::Discipline, document::PatchDocument, error::PatchError,
};
use serde::de::DeserializeOwned;
use std::{any::Any, fmt};

///
/// FieldValue
///
/// Bound for values held by flat slots: they are stored type-erased, cloned
/// into constructor arguments and decoded from input.
///

pub trait FieldValue: Any + Clone + fmt::Debug + DeserializeOwned + Send {}

impl<V> FieldValue for V where V: Any + Clone + fmt::Debug + DeserializeOwned + Send {}

///
/// SlotValue
///
/// Tri-state slot content. Nullable fields hold `Option<_>`, so
/// `Set(None)` is an explicit null and `Unset` is an absent value.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum SlotValue<V> {
    #[default]
    Unset,
    Set(V),
}

impl<V> SlotValue<V> {
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    #[must_use]
    pub const fn as_ref(&self) -> Option<&V> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Store a value. Overwriting is allowed; there is no way back to `Unset`.
    pub fn set(&mut self, value: V) {
        *self = Self::Set(value);
    }

    /// Held value, or `ValueMissing` for the named slot.
    pub fn get(&self, slot: &str) -> Result<&V, PatchError> {
        self.as_ref().ok_or_else(|| PatchError::value_missing(slot))
    }
}

///
/// Slot
///
/// Declared patch field. `name` is the patch-facing name and `field` the
/// target field it writes; the flags are fixed from the field descriptor
/// when the slot is declared.
///

#[derive(Debug)]
pub struct Slot {
    name: &'static str,
    field: &'static str,
    required: bool,
    nullable: bool,
    mutable: bool,
    pub(crate) kind: SlotKind,
}

impl Slot {
    pub(crate) const fn new(
        name: &'static str,
        field: &'static str,
        required: bool,
        nullable: bool,
        mutable: bool,
        kind: SlotKind,
    ) -> Self {
        Self {
            name,
            field,
            required,
            nullable,
            mutable,
            kind,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self.kind, SlotKind::Nested(_))
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        match &self.kind {
            SlotKind::Flat(flat) => flat.is_set(),
            SlotKind::Nested(nested) => nested.is_set(),
        }
    }

    /// Null constructor argument, when the target field is nullable.
    pub(crate) fn null_arg(&self) -> Option<Box<dyn Any>> {
        match &self.kind {
            SlotKind::Flat(flat) => flat.null_arg(),
            SlotKind::Nested(nested) => nested.null_arg(),
        }
    }

    pub(crate) fn write_null(&self, target: &mut dyn Any) -> Result<(), PatchError> {
        match &self.kind {
            SlotKind::Flat(flat) => flat.write_null(self.name, target),
            SlotKind::Nested(nested) => nested.write_null(self.name, target),
        }
    }
}

///
/// SlotKind
///

#[derive(Debug)]
pub(crate) enum SlotKind {
    Flat(Box<dyn FlatAccess>),
    Nested(Box<dyn NestedAccess>),
}

///
/// TargetAccess
/// Operations shared by every slot over its (type-erased) target record.
///

pub(crate) trait TargetAccess: fmt::Debug + Send {
    fn null_arg(&self) -> Option<Box<dyn Any>>;

    /// Write null into the target field; fails for non-nullable fields.
    fn write_null(&self, slot: &str, target: &mut dyn Any) -> Result<(), PatchError>;
}

///
/// FlatAccess
///

pub(crate) trait FlatAccess: TargetAccess {
    fn is_set(&self) -> bool;

    fn value(&self) -> Option<&dyn Any>;

    fn set(&mut self, value: Box<dyn Any>) -> Result<(), PatchError>;

    fn decode(&mut self, slot: &str, value: serde_json::Value) -> Result<(), PatchError>;

    /// Held value as a constructor argument.
    fn arg(&self, slot: &str) -> Result<Box<dyn Any>, PatchError>;

    /// Write the held value into the target field.
    fn write(&self, slot: &str, target: &mut dyn Any) -> Result<(), PatchError>;
}

///
/// NestedAccess
///

pub(crate) trait NestedAccess: TargetAccess {
    fn is_set(&self) -> bool;

    fn document(&self) -> &SlotValue<Option<PatchDocument>>;

    /// Attach a child document; `None` is an explicit null.
    fn set(&mut self, slot: &str, document: Option<PatchDocument>) -> Result<(), PatchError>;

    /// Fresh, unpopulated child document.
    fn fresh(&self) -> Result<PatchDocument, PatchError>;

    /// Child record built from scratch, wrapped as the parent field value.
    fn instance_arg(&self, slot: &str, cache: &BindingCache) -> Result<Box<dyn Any>, PatchError>;

    /// Child record merged into the current value of `target`, as a copy.
    fn merged_arg(
        &self,
        slot: &str,
        target: &dyn Any,
        discipline: Discipline,
        cache: &BindingCache,
    ) -> Result<Box<dyn Any>, PatchError>;

    /// Child record merged into the current value of `target`, in place.
    fn merge_in_place(
        &self,
        slot: &str,
        target: &mut dyn Any,
        discipline: Discipline,
        cache: &BindingCache,
    ) -> Result<(), PatchError>;
}

///
/// TESTS
///
