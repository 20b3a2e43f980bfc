//! Tool descriptor files

mod loader;

pub use loader::{DescriptorFormat, DescriptorLoadError, load_descriptor, load_document};
