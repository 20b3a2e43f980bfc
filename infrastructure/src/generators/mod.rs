//! Command generation strategies
//!
//! | Kind | Type |
//! |------|------|
//! | `cli` | [`PlainCliGenerator`] |
//! | `param-file` | [`ParamFileGenerator`] |
//! | `container` | [`ContainerGenerator`] |

mod cli;
mod container;
mod param_file;
mod registry;

pub use cli::PlainCliGenerator;
pub use container::{ContainerGenerator, MountTable};
pub use param_file::{DEFAULT_PARAM_FILE, ParamFileGenerator};
pub use registry::{GeneratorConstructor, GeneratorRegistry};
