use crate::{
    binding::BindingCache,
    document::{Discipline, PatchDocument},
    error::PatchError,
    model::{Field, NestedValue},
    slot::{NestedAccess, SlotValue, TargetAccess},
    traits::Record,
};
use std::{
    any::{Any, TypeId},
    fmt,
};

///
/// NestedSlot
///
/// Slot whose payload is a child document targeting the record carried by
/// field `V` of `T`. Errors raised by the child are re-rooted under the slot
/// name.
///

pub(crate) struct NestedSlot<T, V> {
    field: Field<T, V>,
    value: SlotValue<Option<PatchDocument>>,
    factory: fn() -> Result<PatchDocument, PatchError>,
}

impl<T: Record, V: NestedValue> NestedSlot<T, V> {
    pub(crate) const fn new(
        field: Field<T, V>,
        factory: fn() -> Result<PatchDocument, PatchError>,
    ) -> Self {
        Self {
            field,
            value: SlotValue::Unset,
            factory,
        }
    }

    fn child_record(document: &PatchDocument, slot: &str, cache: &BindingCache) -> Result<V, PatchError> {
        let record = document
            .instance_in::<V::Record>(cache)
            .map_err(|err| err.within(slot))?;

        Ok(V::from_record(record))
    }

    fn null_or_missing(&self, slot: &str) -> Result<Box<dyn Any>, PatchError> {
        self.null_arg()
            .ok_or_else(|| PatchError::missing_field(slot))
    }
}

impl<T, V> fmt::Debug for NestedSlot<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedSlot")
            .field("field", &self.field)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<T: Record, V: NestedValue> TargetAccess for NestedSlot<T, V> {
    fn null_arg(&self) -> Option<Box<dyn Any>> {
        self.field.null().map(|null| Box::new(null) as Box<dyn Any>)
    }

    fn write_null(&self, slot: &str, target: &mut dyn Any) -> Result<(), PatchError> {
        let null = self
            .field
            .null()
            .ok_or_else(|| PatchError::missing_field(slot))?;
        let record = target
            .downcast_mut::<T>()
            .ok_or_else(|| PatchError::type_mismatch::<T, dyn Any>())?;
        let current = self.field.get_mut(record).ok_or(PatchError::ImmutableTarget {
            target: T::MODEL.path,
        })?;
        *current = null;

        Ok(())
    }
}

impl<T: Record, V: NestedValue> NestedAccess for NestedSlot<T, V> {
    fn is_set(&self) -> bool {
        self.value.is_set()
    }

    fn document(&self) -> &SlotValue<Option<PatchDocument>> {
        &self.value
    }

    fn set(&mut self, slot: &str, document: Option<PatchDocument>) -> Result<(), PatchError> {
        match &document {
            None if !self.field.is_nullable() => {
                return Err(PatchError::decode(slot, "null is not allowed here"));
            }
            Some(child) if child.target_id() != TypeId::of::<V::Record>() => {
                return Err(PatchError::TypeMismatch {
                    expected: <V::Record as Record>::MODEL.path,
                    found: child.target_path(),
                });
            }
            _ => {}
        }
        self.value.set(document);

        Ok(())
    }

    fn fresh(&self) -> Result<PatchDocument, PatchError> {
        (self.factory)()
    }

    fn instance_arg(&self, slot: &str, cache: &BindingCache) -> Result<Box<dyn Any>, PatchError> {
        match self.value.get(slot)? {
            None => self.null_or_missing(slot),
            Some(document) => Ok(Box::new(Self::child_record(document, slot, cache)?)),
        }
    }

    fn merged_arg(
        &self,
        slot: &str,
        target: &dyn Any,
        discipline: Discipline,
        cache: &BindingCache,
    ) -> Result<Box<dyn Any>, PatchError> {
        let Some(document) = self.value.get(slot)? else {
            return self.null_or_missing(slot);
        };
        let record = target
            .downcast_ref::<T>()
            .ok_or_else(|| PatchError::type_mismatch::<T, dyn Any>())?;

        let merged = match self.field.get(record).as_record() {
            Some(current) => V::from_record(
                document
                    .copy_in(current, discipline, cache)
                    .map_err(|err| err.within(slot))?,
            ),
            None => Self::child_record(document, slot, cache)?,
        };

        Ok(Box::new(merged))
    }

    fn merge_in_place(
        &self,
        slot: &str,
        target: &mut dyn Any,
        discipline: Discipline,
        cache: &BindingCache,
    ) -> Result<(), PatchError> {
        let Some(document) = self.value.get(slot)? else {
            return self.write_null(slot, target);
        };
        let record = target
            .downcast_mut::<T>()
            .ok_or_else(|| PatchError::type_mismatch::<T, dyn Any>())?;
        let current = self.field.get_mut(record).ok_or(PatchError::ImmutableTarget {
            target: T::MODEL.path,
        })?;

        match current.as_record_mut() {
            Some(child) => document
                .mutate_in(child, discipline, cache)
                .map_err(|err| err.within(slot)),
            None => {
                *current = Self::child_record(document, slot, cache)?;
                Ok(())
            }
        }
    }
}
