//! CLI mapping compiler

pub mod compiler;

pub use compiler::compile;
