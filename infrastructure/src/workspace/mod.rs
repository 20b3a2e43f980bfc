//! Working directories and output relocation

mod directory;
mod relocate;

pub use directory::{LocalWorkspaceProvider, WorkingDirectory};
pub use relocate::GlobOutputRelocator;
