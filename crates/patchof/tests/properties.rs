mod common;

use common::{Entity, EntityPatch, NestedEntity};
use patchof::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

fn arb_nested() -> impl Strategy<Value = NestedEntity> {
    (any::<bool>(), proptest::option::of(any::<bool>())).prop_map(|(flag, child)| NestedEntity {
        boolean_field: flag,
        nested_field: child.map(|flag| Box::new(NestedEntity::new(flag))),
    })
}

fn arb_entity() -> impl Strategy<Value = Entity> {
    (
        any::<i32>(),
        "[a-z]{0,8}",
        proptest::option::of("[a-z]{0,8}"),
        proptest::option::of(-1_000i32..1_000),
        proptest::option::of(arb_nested()),
    )
        .prop_map(|(int, string, nullable, float, nested)| Entity {
            int_field: int,
            string_field: string,
            nullable_field: nullable,
            float_field: float.map(f64::from),
            nested_field: nested,
        })
}

// patch input with any subset of the flat slots present
fn arb_input() -> impl Strategy<Value = Value> {
    (
        proptest::option::of(any::<i32>()),
        proptest::option::of("[a-z]{0,8}"),
        proptest::option::of(proptest::option::of("[a-z]{0,8}")),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(int, string, nullable, flag)| {
            let mut input = serde_json::Map::new();
            if let Some(int) = int {
                input.insert("int".to_string(), json!(int));
            }
            if let Some(string) = string {
                input.insert("string".to_string(), json!(string));
            }
            if let Some(nullable) = nullable {
                input.insert("nullable".to_string(), json!(nullable));
            }
            if let Some(flag) = flag {
                input.insert("nested".to_string(), json!({ "bf": flag }));
            }

            Value::Object(input)
        })
}

///
/// Pair
/// `b` is nullable; `a` is not.
///

#[derive(Clone, Debug, PartialEq, Record)]
#[record(copy)]
struct Pair {
    a: i64,
    b: Option<i64>,
}

struct PairPatch;

impl PatchSchema for PairPatch {
    type Target = Pair;
    const NAME: &'static str = "PairPatch";

    fn declare(builder: DocumentBuilder) -> DocumentBuilder {
        builder.slot("a", Pair::A).slot("b", Pair::B)
    }
}

///
/// Keyed
///

#[derive(Clone, Debug, PartialEq, Record)]
#[record(copy)]
struct Keyed {
    key: String,
    #[record(default)]
    note: Option<String>,
}

fn keyed_patch(input: Value) -> PatchDocument {
    let mut document = PatchDocument::builder("KeyedPatch")
        .required_slot("key", Keyed::KEY)
        .slot("note", Keyed::NOTE)
        .build()
        .expect("document should build");
    document.populate(input).expect("input should populate");
    document
}

proptest! {
    #[test]
    fn empty_patch_leaves_target_unchanged(entity in arb_entity()) {
        let patch = PatchOf::<EntityPatch>::from_json(json!({})).expect("patch should parse");

        let mut target = entity.clone();
        patch.patch(&mut target).expect("patch should succeed");

        prop_assert_eq!(target, entity);
    }

    #[test]
    fn instance_is_deterministic(
        int in any::<i32>(),
        string in "[a-z]{0,8}",
        flag in proptest::option::of(any::<bool>()),
    ) {
        let mut input = json!({ "int": int, "string": string });
        if let Some(flag) = flag {
            input["nested"] = json!({ "bf": flag });
        }
        let patch = PatchOf::<EntityPatch>::from_json(input).expect("patch should parse");

        let first = patch.instance().expect("instance should succeed");
        let second = patch.instance().expect("instance should succeed");

        prop_assert_eq!(first, second);
    }

    #[test]
    fn copy_strategies_never_mutate_their_argument(entity in arb_entity(), input in arb_input()) {
        let patch = PatchOf::<EntityPatch>::from_json(input).expect("patch should parse");
        let snapshot = entity.clone();

        let _ = patch.patched(&entity);
        let _ = patch.updated(&entity);

        prop_assert_eq!(entity, snapshot);
    }

    #[test]
    fn patched_matches_patch(entity in arb_entity(), input in arb_input()) {
        let patch = PatchOf::<EntityPatch>::from_json(input).expect("patch should parse");

        let mut in_place = entity.clone();
        let patched = patch.patched(&entity);
        let result = patch.patch(&mut in_place);

        match (patched, result) {
            (Ok(copy), Ok(())) => prop_assert_eq!(copy, in_place),
            (Err(copy_err), Err(err)) => prop_assert_eq!(copy_err, err),
            (copy, in_place) => prop_assert!(false, "strategies disagree: {:?} vs {:?}", copy, in_place),
        }
    }

    #[test]
    fn omitted_required_slot_fails_every_strategy(note in proptest::option::of("[a-z]{0,8}")) {
        let input = note.as_ref().map_or_else(|| json!({}), |note| json!({ "note": note }));
        let document = keyed_patch(input);
        let target = Keyed {
            key: "k".to_string(),
            note: None,
        };
        let missing = PatchError::MissingField {
            field: "key".to_string(),
        };

        prop_assert_eq!(document.instance::<Keyed>(), Err(missing.clone()));
        prop_assert_eq!(document.patch(&mut target.clone()), Err(missing.clone()));
        prop_assert_eq!(document.patched(&target), Err(missing.clone()));
        prop_assert_eq!(document.update(&mut target.clone()), Err(missing.clone()));
        prop_assert_eq!(document.updated(&target), Err(missing));
    }

    #[test]
    fn patch_keeps_and_update_nulls_absent_fields(a in any::<i64>(), b in any::<i64>(), new_a in any::<i64>()) {
        let patch = PatchOf::<PairPatch>::from_json(json!({ "a": new_a })).expect("patch should parse");
        let target = Pair { a, b: Some(b) };

        let mut patched = target.clone();
        patch.patch(&mut patched).expect("patch should succeed");
        prop_assert_eq!(patched, Pair { a: new_a, b: Some(b) });

        let mut updated = target.clone();
        patch.update(&mut updated).expect("update should succeed");
        prop_assert_eq!(updated, Pair { a: new_a, b: None });

        prop_assert_eq!(patch.updated(&target).expect("updated should succeed"), Pair { a: new_a, b: None });
    }

    #[test]
    fn nested_patch_synthesizes_or_merges(flag in any::<bool>(), existing in proptest::option::of(arb_nested())) {
        let patch = PatchOf::<EntityPatch>::from_json(json!({ "nested": { "bf": flag } })).expect("patch should parse");
        let mut target = common::new_entity();
        target.nested_field = existing.clone();

        patch.patch(&mut target).expect("patch should succeed");

        let expected = NestedEntity {
            boolean_field: flag,
            nested_field: existing.and_then(|nested| nested.nested_field),
        };
        prop_assert_eq!(target.nested_field, Some(expected));
    }
}
