use crate::{
    config::UnknownFields,
    document::PatchDocument,
    error::PatchError,
    slot::SlotKind,
};
use serde_json::Value;

impl PatchDocument {
    /// Populate slots from a JSON object. Keys are matched against slot
    /// names; keys that are absent leave their slot unset.
    ///
    /// Nested objects populate a fresh child document that inherits this
    /// document's configuration and cache.
    pub fn populate(&mut self, input: Value) -> Result<(), PatchError> {
        let Value::Object(fields) = input else {
            return Err(PatchError::decode(
                "",
                format!("expected a JSON object for {}", self.name),
            ));
        };

        for (key, value) in fields {
            let Some(index) = self.slots.iter().position(|slot| slot.name() == key) else {
                match self.config.unknown_fields {
                    UnknownFields::Reject => {
                        return Err(PatchError::UnknownSlot {
                            document: self.name,
                            slot: key,
                        });
                    }
                    UnknownFields::Ignore => {
                        tracing::trace!(document = self.name, key = %key, "ignored unknown input field");
                        continue;
                    }
                }
            };

            let config = self.config;
            let cache = self.cache.clone();
            let slot = &mut self.slots[index];
            let name = slot.name();

            match &mut slot.kind {
                SlotKind::Flat(flat) => flat.decode(name, value)?,
                SlotKind::Nested(nested) => {
                    let child = if value.is_null() {
                        None
                    } else {
                        let mut child = nested.fresh()?;
                        child.config = config;
                        child.cache = cache;
                        child.populate(value).map_err(|err| err.within(name))?;
                        Some(child)
                    };

                    nested.set(name, child)?;
                }
            }
        }

        Ok(())
    }
}

///
/// TESTS
///
