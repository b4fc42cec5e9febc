#![allow(dead_code)]

use patchof::prelude::*;

///
/// NestedEntity
/// Self-recursive record; the nested link defaults to null.
///

#[derive(Clone, Debug, PartialEq, Record)]
#[record(copy)]
pub struct NestedEntity {
    pub boolean_field: bool,
    #[record(default)]
    pub nested_field: Option<Box<NestedEntity>>,
}

impl NestedEntity {
    pub const fn new(boolean_field: bool) -> Self {
        Self {
            boolean_field,
            nested_field: None,
        }
    }

    pub fn with(boolean_field: bool, nested: Self) -> Self {
        Self {
            boolean_field,
            nested_field: Some(Box::new(nested)),
        }
    }
}

///
/// Entity
///

#[derive(Clone, Debug, PartialEq, Record)]
#[record(copy)]
pub struct Entity {
    pub int_field: i32,
    pub string_field: String,
    pub nullable_field: Option<String>,
    pub float_field: Option<f64>,
    pub nested_field: Option<NestedEntity>,
}

pub fn new_entity() -> Entity {
    Entity {
        int_field: 1337,
        string_field: "required".to_string(),
        nullable_field: Some("nullable".to_string()),
        float_field: Some(1.337),
        nested_field: Some(NestedEntity::new(false)),
    }
}

pub struct NestedPatch;

impl PatchSchema for NestedPatch {
    type Target = NestedEntity;
    const NAME: &'static str = "NestedPatch";

    fn declare(builder: DocumentBuilder) -> DocumentBuilder {
        builder
            .slot("bf", NestedEntity::BOOLEAN_FIELD)
            .nested_slot::<Self, _, _>("nf", NestedEntity::NESTED_FIELD)
    }
}

pub struct EntityPatch;

impl PatchSchema for EntityPatch {
    type Target = Entity;
    const NAME: &'static str = "EntityPatch";

    fn declare(builder: DocumentBuilder) -> DocumentBuilder {
        builder
            .slot("int", Entity::INT_FIELD)
            .slot("string", Entity::STRING_FIELD)
            .slot("float", Entity::FLOAT_FIELD)
            .slot("nullable", Entity::NULLABLE_FIELD)
            .nested_slot::<NestedPatch, _, _>("nested", Entity::NESTED_FIELD)
    }
}

pub fn entity_patch(json: &str) -> PatchOf<EntityPatch> {
    PatchOf::from_json_str(json).expect("patch should parse")
}
