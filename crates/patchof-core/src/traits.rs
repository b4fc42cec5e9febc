use crate::{args::Args, error::PatchError, model::RecordModel};

///
/// Record
///
/// A structured record that patch documents can build, mutate and copy.
/// Normally implemented through `#[derive(Record)]`; hand-written
/// implementations must keep `MODEL` consistent with `construct` and
/// `copy_with`.
///

pub trait Record: Sized + 'static {
    const MODEL: &'static RecordModel;

    /// Canonical constructor. Parameters missing from `args` take their
    /// declared default.
    fn construct(args: &mut Args) -> Result<Self, PatchError> {
        let _ = args;

        Err(PatchError::NoCanonicalConstructor {
            target: Self::MODEL.path,
        })
    }

    /// Structural copy: an equal record except for the overrides in `args`.
    fn copy_with(&self, args: &mut Args) -> Result<Self, PatchError> {
        let _ = args;

        Err(PatchError::NotCopyable {
            target: Self::MODEL.path,
        })
    }
}
