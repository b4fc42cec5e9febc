mod common;

use common::{Entity, EntityPatch, NestedEntity, new_entity};
use patchof::{binding::BindingCache, prelude::*};
use serde_json::json;
use std::{sync::Arc, thread};

#[test]
fn concurrent_resolution_shares_one_binding() {
    let cache = Arc::new(BindingCache::new());

    let bindings: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                scope.spawn(move || cache.resolve_copy::<Entity>().expect("entity should resolve"))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("resolver thread should not panic"))
            .collect()
    });

    assert!(bindings.iter().all(|binding| Arc::ptr_eq(binding, &bindings[0])));
    assert_eq!(cache.stats().size, 1);
    assert_eq!(cache.stats().hits + cache.stats().misses, 16);
}

#[test]
fn documents_on_many_threads_share_an_injected_cache() {
    let cache = Arc::new(BindingCache::new());

    let results: Vec<Entity> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    let mut patch = PatchOf::<EntityPatch>::from_json(json!({ "int": index, "nested": { "bf": true } }))
                        .expect("patch should parse");
                    patch.set_cache(cache);

                    patch.patched(&new_entity()).expect("patched should succeed")
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("patch thread should not panic"))
            .collect()
    });

    for (index, entity) in results.iter().enumerate() {
        assert_eq!(entity.int_field, i32::try_from(index).expect("index fits in i32"));
        assert_eq!(entity.nested_field, Some(NestedEntity::new(true)));
    }

    // Entity and NestedEntity copy bindings
    assert_eq!(cache.stats().size, 2);
}

#[test]
fn isolated_caches_do_not_share_entries() {
    let first = BindingCache::new();
    let second = BindingCache::new();

    let a = first.resolve::<Entity>().expect("entity should resolve");
    let b = second.resolve::<Entity>().expect("entity should resolve");

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(first.stats().misses, 1);
    assert_eq!(second.stats().misses, 1);
}

#[test]
fn documents_default_to_the_shared_cache() {
    let patch = PatchOf::<EntityPatch>::new().expect("document should build");

    assert!(Arc::ptr_eq(patch.cache(), &BindingCache::shared()));
}
