//! Process spawning

mod environment;
mod executor;

pub use environment::{build_environment, expand_placeholders, library_path_key, path_key};
pub use executor::{LocalExecutorFactory, LocalProcessExecutor};
