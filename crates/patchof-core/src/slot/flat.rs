use crate::{
    error::PatchError,
    model::Field,
    slot::{FieldValue, FlatAccess, SlotValue, TargetAccess},
    traits::Record,
};
use std::{any::Any, fmt};

///
/// FlatSlot
/// Slot holding a plain field value of type `V` for target `T`.
///

pub(crate) struct FlatSlot<T, V> {
    field: Field<T, V>,
    value: SlotValue<V>,
}

impl<T: Record, V: FieldValue> FlatSlot<T, V> {
    pub(crate) const fn new(field: Field<T, V>) -> Self {
        Self {
            field,
            value: SlotValue::Unset,
        }
    }

    fn target_mut<'a>(target: &'a mut dyn Any) -> Result<&'a mut T, PatchError> {
        target
            .downcast_mut::<T>()
            .ok_or_else(|| PatchError::type_mismatch::<T, dyn Any>())
    }

    fn field_mut<'a>(&self, target: &'a mut dyn Any) -> Result<&'a mut V, PatchError> {
        let record = Self::target_mut(target)?;

        self.field
            .get_mut(record)
            .ok_or(PatchError::ImmutableTarget {
                target: T::MODEL.path,
            })
    }
}

impl<T, V: fmt::Debug> fmt::Debug for FlatSlot<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatSlot")
            .field("field", &self.field)
            .field("value", &self.value)
            .finish()
    }
}

impl<T: Record, V: FieldValue> TargetAccess for FlatSlot<T, V> {
    fn null_arg(&self) -> Option<Box<dyn Any>> {
        self.field.null().map(|null| Box::new(null) as Box<dyn Any>)
    }

    fn write_null(&self, slot: &str, target: &mut dyn Any) -> Result<(), PatchError> {
        let null = self
            .field
            .null()
            .ok_or_else(|| PatchError::missing_field(slot))?;

        *self.field_mut(target)? = null;

        Ok(())
    }
}

impl<T: Record, V: FieldValue> FlatAccess for FlatSlot<T, V> {
    fn is_set(&self) -> bool {
        self.value.is_set()
    }

    fn value(&self) -> Option<&dyn Any> {
        self.value.as_ref().map(|value| value as &dyn Any)
    }

    fn set(&mut self, value: Box<dyn Any>) -> Result<(), PatchError> {
        let value = value
            .downcast::<V>()
            .map_err(|_| PatchError::type_mismatch::<V, dyn Any>())?;
        self.value.set(*value);

        Ok(())
    }

    fn decode(&mut self, slot: &str, value: serde_json::Value) -> Result<(), PatchError> {
        let value = serde_json::from_value::<V>(value).map_err(|err| PatchError::decode(slot, err))?;
        self.value.set(value);

        Ok(())
    }

    fn arg(&self, slot: &str) -> Result<Box<dyn Any>, PatchError> {
        let value = self.value.get(slot)?;

        Ok(Box::new(value.clone()))
    }

    fn write(&self, slot: &str, target: &mut dyn Any) -> Result<(), PatchError> {
        let value = self.value.get(slot)?.clone();
        *self.field_mut(target)? = value;

        Ok(())
    }
}
