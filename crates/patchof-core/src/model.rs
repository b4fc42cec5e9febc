//! Static, macro-generated descriptors for patchable records.
//!
//! Nothing here is computed at runtime: `#[derive(Record)]` emits one
//! `RecordModel` per record and one `Field` constant per record field.

use crate::traits::Record;
use std::fmt;

///
/// RecordModel
/// Minimal, macro-generated runtime model for one record type.
///

#[derive(Debug)]
pub struct RecordModel {
    /// Fully-qualified Rust type path (for diagnostics).
    pub path: &'static str,
    /// Canonical constructor parameters, in declaration order.
    pub params: &'static [ParamModel],
    /// Whether the record exposes a canonical constructor.
    pub constructible: bool,
    /// Whether the record supports a structural copy with overrides.
    pub copyable: bool,
}

impl RecordModel {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'static ParamModel> {
        self.params.iter().find(|param| param.name == name)
    }
}

///
/// ParamModel
/// One canonical constructor parameter.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParamModel {
    pub name: &'static str,
    pub has_default: bool,
}

///
/// Field
///
/// Typed binding of one record field: how to read it, how to write it (absent
/// for read-only fields) and how to produce its null value (absent for
/// non-nullable fields).
///

pub struct Field<T, V> {
    name: &'static str,
    get: fn(&T) -> &V,
    get_mut: Option<fn(&mut T) -> &mut V>,
    null: Option<fn() -> V>,
}

impl<T, V> Field<T, V> {
    #[must_use]
    pub const fn new(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: Option<fn(&mut T) -> &mut V>,
        null: Option<fn() -> V>,
    ) -> Self {
        Self {
            name,
            get,
            get_mut,
            null,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.get_mut.is_some()
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.null.is_some()
    }

    pub fn get<'a>(&self, record: &'a T) -> &'a V {
        (self.get)(record)
    }

    pub fn get_mut<'a>(&self, record: &'a mut T) -> Option<&'a mut V> {
        self.get_mut.map(|get_mut| get_mut(record))
    }

    #[must_use]
    pub fn null(&self) -> Option<V> {
        self.null.map(|null| null())
    }
}

impl<T, V> Clone for Field<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Field<T, V> {}

impl<T, V> fmt::Debug for Field<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("mutable", &self.is_mutable())
            .field("nullable", &self.is_nullable())
            .finish()
    }
}

///
/// NestedValue
///
/// A field value that carries (at most) one record and can therefore be the
/// target of a nested patch document. Implemented for every derived record,
/// and through `Box` and `Option` wrappers.
///

pub trait NestedValue: Sized + 'static {
    type Record: Record;

    /// Current record, or `None` when the field holds null.
    fn as_record(&self) -> Option<&Self::Record>;

    fn as_record_mut(&mut self) -> Option<&mut Self::Record>;

    fn from_record(record: Self::Record) -> Self;
}

impl<N: NestedValue> NestedValue for Box<N> {
    type Record = N::Record;

    fn as_record(&self) -> Option<&Self::Record> {
        (**self).as_record()
    }

    fn as_record_mut(&mut self) -> Option<&mut Self::Record> {
        (**self).as_record_mut()
    }

    fn from_record(record: Self::Record) -> Self {
        Self::new(N::from_record(record))
    }
}

impl<N: NestedValue> NestedValue for Option<N> {
    type Record = N::Record;

    fn as_record(&self) -> Option<&Self::Record> {
        self.as_ref().and_then(N::as_record)
    }

    fn as_record_mut(&mut self) -> Option<&mut Self::Record> {
        self.as_mut().and_then(N::as_record_mut)
    }

    fn from_record(record: Self::Record) -> Self {
        Some(N::from_record(record))
    }
}
