//! Tool descriptor documents
//!
//! - [`document`]: the typed serde tree (JSON or TOML on disk)
//! - [`parser`]: tree → [`ToolConfiguration`](crate::tool::ToolConfiguration)
//! - [`writer`]: current parameter state → tree (parameter files)

pub mod document;
pub mod parser;
pub mod writer;

pub use document::DescriptorDocument;
pub use parser::{BLACKLIST, parse, parse_document};
pub use writer::to_document;
