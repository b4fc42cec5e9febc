use crate::{
    binding::{BindingKind, RecordBinding},
    error::PatchError,
    model::RecordModel,
    traits::Record,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{
        Arc, OnceLock, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

type Entry = Result<Arc<RecordBinding>, PatchError>;

static SHARED: OnceLock<Arc<BindingCache>> = OnceLock::new();

///
/// CacheStats
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

///
/// BindingCache
///
/// Memoizes record bindings per target type, one table per binding kind.
/// Failed resolutions are memoized too; they are static facts of the type.
///
/// Get-or-create: a miss computes the binding outside the lock, and the first
/// entry committed for a type is the one every caller receives.
///

#[derive(Debug, Default)]
pub struct BindingCache {
    constructors: RwLock<HashMap<TypeId, Entry>>,
    copies: RwLock<HashMap<TypeId, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BindingCache {
    /// Create an isolated cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by documents that were not given one.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Constructor binding of `T`.
    pub fn resolve<T: Record>(&self) -> Result<Arc<RecordBinding>, PatchError> {
        self.lookup(TypeId::of::<T>(), T::MODEL, BindingKind::Constructor)
            .0
    }

    /// Structural copy binding of `T`.
    pub fn resolve_copy<T: Record>(&self) -> Result<Arc<RecordBinding>, PatchError> {
        self.lookup(TypeId::of::<T>(), T::MODEL, BindingKind::Copy).0
    }

    /// Resolve a binding by type identity; the flag reports a cache hit.
    pub(crate) fn lookup(
        &self,
        id: TypeId,
        model: &'static RecordModel,
        kind: BindingKind,
    ) -> (Entry, bool) {
        let table = self.table(kind);

        let cached = table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        if let Some(entry) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return (entry, true);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = RecordBinding::resolve(model, kind).map(Arc::new);

        let entry = table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert(computed)
            .clone();

        (entry, false)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let size = self.len(BindingKind::Constructor) + self.len(BindingKind::Copy);

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size,
        }
    }

    const fn table(&self, kind: BindingKind) -> &RwLock<HashMap<TypeId, Entry>> {
        match kind {
            BindingKind::Constructor => &self.constructors,
            BindingKind::Copy => &self.copies,
        }
    }

    fn len(&self, kind: BindingKind) -> usize {
        self.table(kind)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Gadget, Widget};

    #[test]
    fn second_lookup_is_a_hit_and_shares_the_binding() {
        let cache = BindingCache::new();

        let first = cache.resolve::<Widget>().expect("widget should resolve");
        let second = cache.resolve::<Widget>().expect("widget should resolve");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                size: 1
            }
        );
    }

    #[test]
    fn kinds_are_cached_separately() {
        let cache = BindingCache::new();

        let constructor = cache.resolve::<Widget>().expect("widget should resolve");
        let copy = cache.resolve_copy::<Widget>().expect("widget should resolve");

        assert_eq!(constructor.kind(), BindingKind::Constructor);
        assert_eq!(copy.kind(), BindingKind::Copy);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn failures_are_memoized() {
        let cache = BindingCache::new();

        let first = cache.resolve_copy::<Gadget>().expect_err("gadget is not copyable");
        let second = cache.resolve_copy::<Gadget>().expect_err("gadget is not copyable");

        assert_eq!(first, second);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn concurrent_resolution_commits_one_binding() {
        let cache = BindingCache::new();

        let bindings: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.resolve::<Widget>().expect("widget should resolve")))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().expect("resolver thread should not panic"))
                .collect()
        });

        for binding in &bindings[1..] {
            assert!(Arc::ptr_eq(&bindings[0], binding));
        }
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn shared_cache_is_a_singleton() {
        assert!(Arc::ptr_eq(&BindingCache::shared(), &BindingCache::shared()));
    }
}
