//! Derived fixture records and schemas shared by the unit tests.

use crate::{document::DocumentBuilder, schema::PatchSchema};
use patchof_derive::Record;

///
/// Widget
/// Constructible and copyable; one skipped and one read-only field.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Record)]
#[record(copy)]
pub struct Widget {
    pub id: u32,
    #[record(default)]
    pub label: String,
    pub note: Option<String>,
    #[record(skip)]
    pub secret: String,
    #[record(readonly, default)]
    pub created: u64,
}

///
/// Gadget
/// Constructible, not copyable.
///

#[derive(Clone, Debug, Eq, PartialEq, Record)]
pub struct Gadget {
    pub power: u8,
    #[record(default)]
    pub name: Option<String>,
}

///
/// Opaque
/// Copyable, without a canonical constructor.
///

#[derive(Clone, Debug, Eq, PartialEq, Record)]
#[record(copy, no_constructor)]
pub struct Opaque {
    pub code: u32,
}

///
/// Wrapper
///

#[derive(Clone, Debug, Eq, PartialEq, Record)]
#[record(copy)]
pub struct Wrapper {
    pub title: Option<String>,
    pub inner: Option<Box<Gadget>>,
}

pub struct WidgetPatch;

impl PatchSchema for WidgetPatch {
    type Target = Widget;
    const NAME: &'static str = "WidgetPatch";

    fn declare(builder: DocumentBuilder) -> DocumentBuilder {
        builder
            .required_slot("id", Widget::ID)
            .slot("label", Widget::LABEL)
            .slot("note", Widget::NOTE)
    }
}

pub struct GadgetPatch;

impl PatchSchema for GadgetPatch {
    type Target = Gadget;
    const NAME: &'static str = "GadgetPatch";

    fn declare(builder: DocumentBuilder) -> DocumentBuilder {
        builder
            .slot("power", Gadget::POWER)
            .slot("name", Gadget::NAME)
    }
}

pub struct WrapperPatch;

impl PatchSchema for WrapperPatch {
    type Target = Wrapper;
    const NAME: &'static str = "WrapperPatch";

    fn declare(builder: DocumentBuilder) -> DocumentBuilder {
        builder
            .slot("title", Wrapper::TITLE)
            .nested_slot::<GadgetPatch, _, _>("inner", Wrapper::INNER)
    }
}
