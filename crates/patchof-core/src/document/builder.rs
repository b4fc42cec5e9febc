use crate::{
    binding::BindingCache,
    config::PatchConfig,
    document::{PatchDocument, TargetType},
    error::PatchError,
    model::{Field, NestedValue},
    schema::PatchSchema,
    slot::{FieldValue, FlatSlot, NestedSlot, Slot, SlotKind},
    traits::Record,
};
use std::{any::TypeId, sync::Arc};

///
/// DocumentBuilder
///
/// Declares the slots of a document. Registration errors are deferred and
/// the first one is returned by `build`.
///

#[derive(Debug)]
pub struct DocumentBuilder {
    name: &'static str,
    target: Option<TargetType>,
    slots: Vec<Slot>,
    config: PatchConfig,
    cache: Option<Arc<BindingCache>>,
    error: Option<PatchError>,
}

impl DocumentBuilder {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            target: None,
            slots: Vec::new(),
            config: PatchConfig::default(),
            cache: None,
            error: None,
        }
    }

    /// Optional flat slot.
    #[must_use]
    pub fn slot<T: Record, V: FieldValue>(self, name: &'static str, field: Field<T, V>) -> Self {
        self.flat(name, field, false)
    }

    /// Flat slot that must be present for every strategy.
    #[must_use]
    pub fn required_slot<T: Record, V: FieldValue>(
        self,
        name: &'static str,
        field: Field<T, V>,
    ) -> Self {
        self.flat(name, field, true)
    }

    /// Optional nested slot populated with documents of schema `S`.
    #[must_use]
    pub fn nested_slot<S, T, V>(self, name: &'static str, field: Field<T, V>) -> Self
    where
        S: PatchSchema,
        T: Record,
        V: NestedValue,
    {
        self.nested::<S, T, V>(name, field, false)
    }

    #[must_use]
    pub fn required_nested_slot<S, T, V>(self, name: &'static str, field: Field<T, V>) -> Self
    where
        S: PatchSchema,
        T: Record,
        V: NestedValue,
    {
        self.nested::<S, T, V>(name, field, true)
    }

    #[must_use]
    pub const fn with_config(mut self, config: PatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve bindings through `cache` instead of the shared cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<BindingCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<PatchDocument, PatchError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let Some(target) = self.target else {
            return Err(PatchError::EmptyDocument {
                document: self.name,
            });
        };

        Ok(PatchDocument {
            name: self.name,
            target,
            can_mutate_in_place: self.slots.iter().all(Slot::is_mutable),
            slots: self.slots,
            config: self.config,
            cache: self.cache.unwrap_or_else(BindingCache::shared),
        })
    }

    fn flat<T: Record, V: FieldValue>(
        self,
        name: &'static str,
        field: Field<T, V>,
        required: bool,
    ) -> Self {
        let kind = SlotKind::Flat(Box::new(FlatSlot::new(field)));

        self.register::<T>(Slot::new(
            name,
            field.name(),
            required,
            field.is_nullable(),
            field.is_mutable(),
            kind,
        ))
    }

    fn nested<S, T, V>(self, name: &'static str, field: Field<T, V>, required: bool) -> Self
    where
        S: PatchSchema,
        T: Record,
        V: NestedValue,
    {
        // compare type identities only; building the child here would not
        // terminate for self-recursive schemas
        if TypeId::of::<S::Target>() != TypeId::of::<V::Record>() {
            return self.fail(PatchError::TypeMismatch {
                expected: <V::Record as Record>::MODEL.path,
                found: <S::Target as Record>::MODEL.path,
            });
        }

        let kind = SlotKind::Nested(Box::new(NestedSlot::new(field, S::document)));

        self.register::<T>(Slot::new(
            name,
            field.name(),
            required,
            field.is_nullable(),
            field.is_mutable(),
            kind,
        ))
    }

    fn register<T: Record>(mut self, slot: Slot) -> Self {
        if self.error.is_some() {
            return self;
        }

        let target = TargetType::of::<T>();
        match self.target {
            Some(bound) if bound.id != target.id => {
                let err = PatchError::MultipleTargetTypes {
                    document: self.name,
                    target: bound.model.path,
                    slot: slot.name(),
                    found: target.model.path,
                };
                return self.fail(err);
            }
            Some(_) => {}
            None => self.target = Some(target),
        }

        if self.slots.iter().any(|declared| declared.name() == slot.name()) {
            let err = PatchError::DuplicateSlot {
                document: self.name,
                slot: slot.name(),
            };
            return self.fail(err);
        }

        tracing::trace!(
            document = self.name,
            slot = slot.name(),
            field = slot.field(),
            "patch slot declared"
        );
        self.slots.push(slot);

        self
    }

    fn fail(mut self, err: PatchError) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }

        self
    }
}

///
/// TESTS
///
