use crate::error::PatchError;
use std::{any::Any, collections::BTreeMap, fmt};

///
/// Args
///
/// Named, type-erased argument map handed to a canonical constructor or a
/// structural copy. Keys are target field names.
///

#[derive(Default)]
pub struct Args {
    values: BTreeMap<&'static str, Box<dyn Any>>,
}

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: Box<dyn Any>) {
        self.values.insert(name, value);
    }

    /// Insert a typed argument.
    pub fn put<V: Any>(&mut self, name: &'static str, value: V) {
        self.insert(name, Box::new(value));
    }

    /// Remove an argument, checking it carries the expected type.
    pub fn take<V: Any>(&mut self, name: &str) -> Result<Option<V>, PatchError> {
        let Some(value) = self.values.remove(name) else {
            return Ok(None);
        };

        value
            .downcast::<V>()
            .map(|value| Some(*value))
            .map_err(|_| PatchError::TypeMismatch {
                expected: std::any::type_name::<V>(),
                found: "a value of another type",
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

///
/// TESTS
///
