//! Application strategies.
//!
//! Every public strategy funnels into one of three internal paths: build a
//! new record (`instance_in`), copy with overrides (`copy_in`) or mutate in
//! place (`mutate_in`). Nested documents recurse through the same paths with
//! the parent's cache and discipline.

use crate::{
    args::Args,
    binding::{BindingCache, BindingKind, RecordBinding},
    document::{Discipline, PatchDocument, Strategy},
    error::PatchError,
    obs::sink::{self, PatchEvent},
    slot::{Slot, SlotKind},
    traits::Record,
};
use std::{any::Any, sync::Arc};

///
/// Absent
/// What an absent, optional slot contributes under a discipline.
///

enum Absent {
    Skip,
    Null,
}

impl Absent {
    fn resolve(slot: &Slot, discipline: Discipline) -> Result<Self, PatchError> {
        if slot.is_required() {
            return Err(PatchError::missing_field(slot.name()));
        }

        match discipline {
            Discipline::Patch => Ok(Self::Skip),
            Discipline::Put if slot.is_nullable() => Ok(Self::Null),
            Discipline::Put => Err(PatchError::missing_field(slot.name())),
        }
    }
}

impl PatchDocument {
    /// Build a new record from the present slots.
    pub fn instance<T: Record>(&self) -> Result<T, PatchError> {
        self.observe(Strategy::Instance, || self.instance_in(&self.cache))
    }

    /// PATCH in place: present slots overwrite `target`.
    pub fn patch<'a, T: Record>(
        &self,
        target: impl Into<Option<&'a mut T>>,
    ) -> Result<(), PatchError> {
        let target = target.into();

        self.observe(Strategy::Patch, || {
            let target = target.ok_or(PatchError::NullTarget)?;
            self.mutate_in(target, Discipline::Patch, &self.cache)
        })
    }

    /// PATCH as a copy; `target` is left untouched.
    pub fn patched<'a, T: Record>(&self, target: impl Into<Option<&'a T>>) -> Result<T, PatchError> {
        let target = target.into();

        self.observe(Strategy::Patched, || {
            let target = target.ok_or(PatchError::NullTarget)?;
            self.copy_in(target, Discipline::Patch, &self.cache)
        })
    }

    /// PUT in place: absent nullable slots write null into `target`.
    pub fn update<'a, T: Record>(
        &self,
        target: impl Into<Option<&'a mut T>>,
    ) -> Result<(), PatchError> {
        let target = target.into();

        self.observe(Strategy::Update, || {
            let target = target.ok_or(PatchError::NullTarget)?;
            self.mutate_in(target, Discipline::Put, &self.cache)
        })
    }

    /// PUT as a copy; `target` is left untouched.
    pub fn updated<'a, T: Record>(&self, target: impl Into<Option<&'a T>>) -> Result<T, PatchError> {
        let target = target.into();

        self.observe(Strategy::Updated, || {
            let target = target.ok_or(PatchError::NullTarget)?;
            self.copy_in(target, Discipline::Put, &self.cache)
        })
    }

    pub(crate) fn instance_in<T: Record>(&self, cache: &BindingCache) -> Result<T, PatchError> {
        self.expect_target::<T>()?;
        let binding = self.bind(cache, BindingKind::Constructor)?;

        let mut args = Args::new();
        for slot in &self.slots {
            if slot.is_set() {
                let value = match &slot.kind {
                    SlotKind::Flat(flat) => flat.arg(slot.name())?,
                    SlotKind::Nested(nested) => nested.instance_arg(slot.name(), cache)?,
                };
                args.insert(slot.field(), value);
                continue;
            }

            if slot.is_required() {
                return Err(PatchError::missing_field(slot.name()));
            }
            if binding.has_default(slot.field()) {
                continue;
            }

            // implicit null for a nullable parameter without a default
            let null = slot
                .null_arg()
                .ok_or_else(|| PatchError::missing_field(slot.name()))?;
            args.insert(slot.field(), null);
        }

        T::construct(&mut args)
    }

    pub(crate) fn copy_in<T: Record>(
        &self,
        target: &T,
        discipline: Discipline,
        cache: &BindingCache,
    ) -> Result<T, PatchError> {
        self.expect_target::<T>()?;
        self.bind(cache, BindingKind::Copy)?;

        let mut args = Args::new();
        for slot in &self.slots {
            if slot.is_set() {
                let value = match &slot.kind {
                    SlotKind::Flat(flat) => flat.arg(slot.name())?,
                    SlotKind::Nested(nested) => {
                        nested.merged_arg(slot.name(), target as &dyn Any, discipline, cache)?
                    }
                };
                args.insert(slot.field(), value);
                continue;
            }

            match Absent::resolve(slot, discipline)? {
                Absent::Skip => {}
                Absent::Null => {
                    let null = slot
                        .null_arg()
                        .ok_or_else(|| PatchError::missing_field(slot.name()))?;
                    args.insert(slot.field(), null);
                }
            }
        }

        target.copy_with(&mut args)
    }

    pub(crate) fn mutate_in<T: Record>(
        &self,
        target: &mut T,
        discipline: Discipline,
        cache: &BindingCache,
    ) -> Result<(), PatchError> {
        self.expect_target::<T>()?;
        if !self.can_mutate_in_place {
            return Err(PatchError::ImmutableTarget {
                target: self.target_path(),
            });
        }

        for slot in &self.slots {
            let record: &mut dyn Any = &mut *target;

            if slot.is_set() {
                match &slot.kind {
                    SlotKind::Flat(flat) => flat.write(slot.name(), record)?,
                    SlotKind::Nested(nested) => {
                        nested.merge_in_place(slot.name(), record, discipline, cache)?;
                    }
                }
                continue;
            }

            match Absent::resolve(slot, discipline)? {
                Absent::Skip => {}
                Absent::Null => slot.write_null(record)?,
            }
        }

        Ok(())
    }

    fn bind(&self, cache: &BindingCache, kind: BindingKind) -> Result<Arc<RecordBinding>, PatchError> {
        let (entry, cached) = cache.lookup(self.target.id, self.target.model, kind);

        if self.config.metrics {
            sink::record(PatchEvent::BindingResolved {
                target: self.target_path(),
                kind,
                cached,
            });
        }

        let binding = entry?;
        binding.bind(self)?;

        Ok(binding)
    }

    fn observe<R>(
        &self,
        strategy: Strategy,
        apply: impl FnOnce() -> Result<R, PatchError>,
    ) -> Result<R, PatchError> {
        if !self.config.metrics {
            return apply();
        }

        let target = self.target_path();
        sink::record(PatchEvent::ApplyStart { strategy, target });

        let result = apply();
        match &result {
            Ok(_) => sink::record(PatchEvent::ApplyFinish {
                strategy,
                target,
                slots_present: self.present() as u64,
                slots_total: self.slots.len() as u64,
            }),
            Err(error) => sink::record(PatchEvent::ApplyFailed {
                strategy,
                target,
                error: error.clone(),
            }),
        }

        result
    }
}

///
/// TESTS
///
