//! Parameter-file strategy
//!
//! The current parameter values are serialized as a descriptor document into
//! the working directory; the tool receives only `<switch> <file>`.

use std::path::Path;
use toolbridge_application::{CommandGenerator, GenerationError, GeneratorKind, PluginContext};
use toolbridge_domain::{ToolConfiguration, to_document};
use tracing::debug;

pub const DEFAULT_PARAM_FILE: &str = "params.json";

#[derive(Debug, Clone)]
pub struct ParamFileGenerator {
    file_name: String,
}

impl Default for ParamFileGenerator {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_PARAM_FILE.to_string(),
        }
    }
}

impl CommandGenerator for ParamFileGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::ParamFile
    }

    fn generate(
        &self,
        config: &ToolConfiguration,
        context: &PluginContext,
        working_dir: &Path,
    ) -> Result<Vec<String>, GenerationError> {
        let document = to_document(config);
        let text = serde_json::to_string_pretty(&document)
            .map_err(|e| GenerationError::Serialization(e.to_string()))?;

        let path = working_dir.join(&self.file_name);
        std::fs::write(&path, text).map_err(|source| GenerationError::ParameterFile {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote parameter file {}", path.display());

        Ok(vec![
            context.param_file_switch.clone(),
            path.to_string_lossy().into_owned(),
        ])
    }
}
