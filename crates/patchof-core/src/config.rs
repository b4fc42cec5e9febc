use serde::{Deserialize, Serialize};

///
/// PatchConfig
///
/// Per-document behaviour switches. Nested documents populated from input
/// follow the configuration of the root document.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PatchConfig {
    /// What to do with input keys that name no slot.
    pub unknown_fields: UnknownFields,

    /// Emit observability events for strategy calls on this document.
    pub metrics: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFields::Reject,
            metrics: true,
        }
    }
}

///
/// UnknownFields
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFields {
    #[default]
    Reject,
    Ignore,
}

///
/// TESTS
///
