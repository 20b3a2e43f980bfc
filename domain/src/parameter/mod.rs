//! Parameter model
//!
//! Typed value containers with constraints. Every parameter is addressed by
//! its dotted path and is either scalar or list-valued:
//!
//! | Kind | Constraint | Scalar | List |
//! |------|-----------|--------|------|
//! | `Int` | [`Bounds<i64>`](constraint::Bounds) | yes | yes |
//! | `Double` | [`Bounds<f64>`](constraint::Bounds) | yes | yes |
//! | `String` | none | yes | yes |
//! | `Bool` | `true`/`false` | yes | - |
//! | `StringChoice` | allowed values | yes | yes |
//! | `File` | port extensions | yes | yes |
//!
//! File parameters are the value side of a [`Port`](crate::tool::Port): the
//! port and the parameter share the same key, and binding files to a port
//! writes this parameter's value.

pub mod constraint;
pub mod entities;
pub mod value;

pub use constraint::{Bounds, format_number};
pub use entities::Parameter;
pub use value::{ParameterKind, PortDirection, Scalar, Value};
