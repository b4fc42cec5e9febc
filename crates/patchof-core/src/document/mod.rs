//! Patch documents: ordered slots bound to one target record type.

mod apply;
mod builder;
mod populate;

pub use builder::DocumentBuilder;

use crate::{
    binding::BindingCache,
    config::PatchConfig,
    error::PatchError,
    model::RecordModel,
    slot::{Slot, SlotKind},
    traits::Record,
};
use derive_more::Display;
use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

///
/// Strategy
/// Public application entry points, as reported to observability sinks.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Strategy {
    #[display("instance")]
    Instance,
    #[display("patch")]
    Patch,
    #[display("patched")]
    Patched,
    #[display("update")]
    Update,
    #[display("updated")]
    Updated,
}

///
/// Discipline
///
/// `Patch` merges only the present slots; `Put` replaces the whole record,
/// so absent nullable slots become explicit nulls.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Discipline {
    Patch,
    Put,
}

///
/// TargetType
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct TargetType {
    id: TypeId,
    model: &'static RecordModel,
}

impl TargetType {
    pub(crate) fn of<T: Record>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            model: T::MODEL,
        }
    }
}

///
/// PatchDocument
///
/// A set of declared slots for one target record type. Populate it, then
/// apply it with one of the strategies (`instance`, `patch`, `patched`,
/// `update`, `updated`).
///

pub struct PatchDocument {
    name: &'static str,
    target: TargetType,
    can_mutate_in_place: bool,
    slots: Vec<Slot>,
    config: PatchConfig,
    cache: Arc<BindingCache>,
}

impl PatchDocument {
    #[must_use]
    pub fn builder(name: &'static str) -> DocumentBuilder {
        DocumentBuilder::new(name)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn target_id(&self) -> TypeId {
        self.target.id
    }

    #[must_use]
    pub const fn target_path(&self) -> &'static str {
        self.target.model.path
    }

    #[must_use]
    pub const fn target_model(&self) -> &'static RecordModel {
        self.target.model
    }

    /// False as soon as one slot writes a read-only field.
    #[must_use]
    pub const fn can_mutate_in_place(&self) -> bool {
        self.can_mutate_in_place
    }

    #[must_use]
    pub const fn config(&self) -> &PatchConfig {
        &self.config
    }

    pub const fn set_config(&mut self, config: PatchConfig) {
        self.config = config;
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<BindingCache> {
        &self.cache
    }

    pub fn set_cache(&mut self, cache: Arc<BindingCache>) {
        self.cache = cache;
    }

    /// Slots in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name() == name)
    }

    /// Fail with `TypeMismatch` unless the document targets `T`.
    pub fn expect_target<T: Record>(&self) -> Result<(), PatchError> {
        if self.target.id == TypeId::of::<T>() {
            Ok(())
        } else {
            Err(PatchError::TypeMismatch {
                expected: self.target.model.path,
                found: T::MODEL.path,
            })
        }
    }

    pub fn is_set(&self, name: &str) -> Result<bool, PatchError> {
        self.find(name).map(Slot::is_set)
    }

    /// Value held by a flat slot.
    pub fn get<V: Any>(&self, name: &str) -> Result<&V, PatchError> {
        let slot = self.find(name)?;
        let SlotKind::Flat(flat) = &slot.kind else {
            return Err(PatchError::type_mismatch::<V, Self>());
        };

        flat.value()
            .ok_or_else(|| PatchError::value_missing(name))?
            .downcast_ref::<V>()
            .ok_or_else(|| PatchError::type_mismatch::<V, dyn Any>())
    }

    /// Store a value in a flat slot. For a nullable field `V` is the
    /// `Option<_>` field type and `None` is an explicit null.
    pub fn set<V: Any>(&mut self, name: &str, value: V) -> Result<(), PatchError> {
        let slot = self.find_mut(name)?;
        let SlotKind::Flat(flat) = &mut slot.kind else {
            return Err(PatchError::type_mismatch::<Self, V>());
        };

        flat.set(Box::new(value))
    }

    /// Child document of a nested slot; `None` is an explicit null.
    pub fn nested(&self, name: &str) -> Result<Option<&Self>, PatchError> {
        let slot = self.find(name)?;
        let SlotKind::Nested(nested) = &slot.kind else {
            return Err(PatchError::type_mismatch::<Self, dyn Any>());
        };

        Ok(nested.document().get(name)?.as_ref())
    }

    /// Attach a child document to a nested slot, or an explicit null.
    pub fn set_nested(&mut self, name: &str, document: Option<Self>) -> Result<(), PatchError> {
        let slot = self.find_mut(name)?;
        let slot_name = slot.name();
        let SlotKind::Nested(nested) = &mut slot.kind else {
            return Err(PatchError::type_mismatch::<dyn Any, Self>());
        };

        nested.set(slot_name, document)
    }

    /// Fresh, unpopulated child document for a nested slot.
    pub fn new_nested(&self, name: &str) -> Result<Self, PatchError> {
        let slot = self.find(name)?;
        let SlotKind::Nested(nested) = &slot.kind else {
            return Err(PatchError::type_mismatch::<Self, dyn Any>());
        };

        let mut child = nested.fresh()?;
        child.config = self.config;
        child.cache = self.cache.clone();

        Ok(child)
    }

    fn find(&self, name: &str) -> Result<&Slot, PatchError> {
        self.slot(name).ok_or_else(|| self.unknown(name))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut Slot, PatchError> {
        let document = self.name;

        self.slots
            .iter_mut()
            .find(|slot| slot.name() == name)
            .ok_or_else(|| PatchError::UnknownSlot {
                document,
                slot: name.to_string(),
            })
    }

    fn unknown(&self, name: &str) -> PatchError {
        PatchError::UnknownSlot {
            document: self.name,
            slot: name.to_string(),
        }
    }

    fn present(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_set()).count()
    }
}

impl fmt::Debug for PatchDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchDocument")
            .field("name", &self.name)
            .field("target", &self.target.model.path)
            .field("can_mutate_in_place", &self.can_mutate_in_place)
            .field("slots", &self.slots)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
