//! Core runtime for PatchOf: record models, value slots, patch documents,
//! the binding cache and the PATCH/PUT application strategies.

extern crate self as patchof;

// public exports are one module level down
pub mod args;
pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod obs;
pub mod schema;
pub mod slot;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::PatchError;
pub use traits::Record;

///
/// Prelude
///
/// Everything needed to declare records and schemas and apply documents.
///

pub mod prelude {
    pub use crate::{
        document::{DocumentBuilder, PatchDocument},
        error::PatchError,
        schema::{PatchOf, PatchSchema},
        traits::Record,
    };
}
