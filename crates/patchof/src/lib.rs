//! PatchOf: typed PATCH/PUT documents for plain Rust records.
//!
//! ## Crate layout
//! - `core`: the engine (record models, slots, documents, binding cache, obs).
//! - `error`: host-facing error with a stable class + kind taxonomy.
//! - `Record`: derive macro emitting the field-binding table of a record.
//!
//! The `prelude` module carries what API code needs to declare schemas and
//! apply documents.

pub use patchof_core as core;
pub use patchof_derive::Record;

pub mod error;

// paths used by `#[derive(Record)]` expansions
pub use patchof_core::{
    PatchError, Record, args, binding, config, document, model, obs, schema, slot,
};

pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Record,
        core::{
            config::{PatchConfig, UnknownFields},
            document::{DocumentBuilder, PatchDocument},
            error::PatchError,
            schema::{PatchOf, PatchSchema},
        },
    };
}
