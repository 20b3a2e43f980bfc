//! Plain CLI strategy

use std::path::Path;
use toolbridge_application::{CommandGenerator, GenerationError, GeneratorKind, PluginContext};
use toolbridge_domain::{ToolConfiguration, build_argument_strings};

/// Runs the tool executable with the plain argument vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCliGenerator;

impl CommandGenerator for PlainCliGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Cli
    }

    fn generate(
        &self,
        config: &ToolConfiguration,
        _context: &PluginContext,
        _working_dir: &Path,
    ) -> Result<Vec<String>, GenerationError> {
        Ok(build_argument_strings(config)?)
    }
}
