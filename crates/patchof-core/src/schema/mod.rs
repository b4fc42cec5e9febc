//! Declarative patch schemas and the typed `PatchOf<S>` document.

use crate::{
    document::{DocumentBuilder, PatchDocument},
    error::PatchError,
    traits::Record,
};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Deserializer, de::Error as _};
use std::{fmt, marker::PhantomData};

///
/// PatchSchema
///
/// Declares the slots of one kind of patch document for `Target`.
///

pub trait PatchSchema: 'static {
    type Target: Record;

    /// Document name used in diagnostics.
    const NAME: &'static str;

    fn declare(builder: DocumentBuilder) -> DocumentBuilder;

    /// Build a fresh, unpopulated document.
    fn document() -> Result<PatchDocument, PatchError> {
        let document = Self::declare(PatchDocument::builder(Self::NAME)).build()?;
        document.expect_target::<Self::Target>()?;

        Ok(document)
    }
}

///
/// PatchOf
///
/// Patch document whose target type is fixed by its schema, so strategies
/// take and return `S::Target` directly.
///

#[derive(Deref, DerefMut)]
pub struct PatchOf<S> {
    #[deref]
    #[deref_mut]
    document: PatchDocument,
    _schema: PhantomData<fn() -> S>,
}

impl<S: PatchSchema> PatchOf<S> {
    pub fn new() -> Result<Self, PatchError> {
        Ok(Self {
            document: S::document()?,
            _schema: PhantomData,
        })
    }

    pub fn from_json(input: serde_json::Value) -> Result<Self, PatchError> {
        let mut patch = Self::new()?;
        patch.document.populate(input)?;

        Ok(patch)
    }

    pub fn from_json_str(input: &str) -> Result<Self, PatchError> {
        let value = serde_json::from_str(input).map_err(|err| PatchError::decode("", err))?;

        Self::from_json(value)
    }

    #[must_use]
    pub fn into_document(self) -> PatchDocument {
        self.document
    }

    pub fn instance(&self) -> Result<S::Target, PatchError> {
        self.document.instance::<S::Target>()
    }

    pub fn patch<'a>(&self, target: impl Into<Option<&'a mut S::Target>>) -> Result<(), PatchError> {
        self.document.patch::<S::Target>(target)
    }

    pub fn patched<'a>(&self, target: impl Into<Option<&'a S::Target>>) -> Result<S::Target, PatchError> {
        self.document.patched::<S::Target>(target)
    }

    pub fn update<'a>(&self, target: impl Into<Option<&'a mut S::Target>>) -> Result<(), PatchError> {
        self.document.update::<S::Target>(target)
    }

    pub fn updated<'a>(&self, target: impl Into<Option<&'a S::Target>>) -> Result<S::Target, PatchError> {
        self.document.updated::<S::Target>(target)
    }
}

impl<S> fmt::Debug for PatchOf<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatchOf").field(&self.document).finish()
    }
}

impl<'de, S: PatchSchema> Deserialize<'de> for PatchOf<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        Self::from_json(value).map_err(D::Error::custom)
    }
}

///
/// TESTS
///
