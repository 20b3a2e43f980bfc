//! Containerized strategy
//!
//! The plain argument vector is run inside a container. Every host
//! directory holding a file argument is mounted once; file arguments are
//! rewritten to their in-container path.
//!
//! ```text
//! /home/u/in/a.txt  ──┐
//! /home/u/in/b.txt  ──┼─▶ -v /home/u/in:/data/0  ─▶ /data/0/a.txt /data/0/b.txt
//! /tmp/run-1/o.txt  ──┴─▶ -v /tmp/run-1:/data/1  ─▶ /data/1/o.txt
//! ```
//!
//! The resulting host command is
//! `<runtime> run --rm -v <host>:<mount>... <image> <executable> <args>`.

use std::path::{Path, PathBuf};
use toolbridge_application::{CommandGenerator, GenerationError, GeneratorKind, PluginContext};
use toolbridge_domain::{CommandArgument, ToolConfiguration, build_arguments};

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerGenerator;

impl CommandGenerator for ContainerGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Container
    }

    fn host_program(&self, context: &PluginContext) -> String {
        context.container.runtime.clone()
    }

    fn environment(&self, context: &PluginContext) -> Vec<(String, String)> {
        context
            .container
            .machine_env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn generate(
        &self,
        config: &ToolConfiguration,
        context: &PluginContext,
        _working_dir: &Path,
    ) -> Result<Vec<String>, GenerationError> {
        let image = context
            .container
            .image_for(&context.tool_name)
            .ok_or_else(|| GenerationError::NoContainerImage(context.tool_name.clone()))?;

        let mut mounts = MountTable::new(&context.container.mount_root);
        let mut tool_arguments = Vec::new();
        for argument in build_arguments(config)? {
            match argument {
                CommandArgument::File(path) => tool_arguments.push(mounts.container_path(&path)?),
                CommandArgument::Literal(text) => tool_arguments.push(text),
            }
        }

        let mut command = vec!["run".to_string(), "--rm".to_string()];
        for declaration in mounts.declarations() {
            command.push("-v".to_string());
            command.push(declaration);
        }
        command.push(image.to_string());
        command.push(context.executable_name.clone());
        command.extend(tool_arguments);
        Ok(command)
    }
}

/// Per-invocation mapping of host directories to mount points.
///
/// Mount points are `<root>/<n>`, numbered in first-seen order.
#[derive(Debug, Clone)]
pub struct MountTable {
    root: String,
    mounts: Vec<(String, String)>,
}

impl MountTable {
    pub fn new(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            root: if root.is_empty() { String::new() } else { root.to_string() },
            mounts: Vec::new(),
        }
    }

    /// In-container path of a host file, mounting its directory if needed.
    pub fn container_path(&mut self, host_file: &str) -> Result<String, GenerationError> {
        let path = Path::new(host_file);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| GenerationError::Mount {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path has no file name",
                ),
            })?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let host_dir = normalize(&resolve(parent).map_err(|source| GenerationError::Mount {
            path: path.to_path_buf(),
            source,
        })?);

        let mount = self.mount_for(host_dir);
        Ok(format!("{}/{}", mount, file_name))
    }

    /// `host:mount` declarations in mount order.
    pub fn declarations(&self) -> Vec<String> {
        self.mounts
            .iter()
            .map(|(host, mount)| format!("{}:{}", host, mount))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    fn mount_for(&mut self, host_dir: String) -> String {
        if let Some((_, mount)) = self.mounts.iter().find(|(host, _)| *host == host_dir) {
            return mount.clone();
        }
        let mount = format!("{}/{}", self.root, self.mounts.len());
        self.mounts.push((host_dir, mount.clone()));
        mount
    }
}

/// Canonical directory when it exists, else its absolute form.
fn resolve(dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::canonicalize(dir).or_else(|_| std::path::absolute(dir))
}

/// Forward-slash form accepted by container runtimes on every host.
fn normalize(dir: &Path) -> String {
    let text = dir.to_string_lossy().replace('\\', "/");
    match text.strip_prefix("//?/") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge_application::ContainerSettings;
    use toolbridge_domain::{CliElement, Parameter, ParameterKind, Port, PortDirection, ToolInfo};

    fn config() -> ToolConfiguration {
        let file = |direction| ParameterKind::File { direction };
        let mut inputs = Port::new("in", PortDirection::Input).with_extensions(["fa"]);
        inputs.is_list = true;
        ToolConfiguration::builder(ToolInfo::new("Align").with_executable("align"))
            .parameter(Parameter::new("in", file(PortDirection::Input)).as_list())
            .port(inputs)
            .parameter(Parameter::new("out", file(PortDirection::Output)))
            .port(Port::new("out", PortDirection::Output).with_extensions(["sam"]))
            .parameter(Parameter::new("mode", ParameterKind::String))
            .cli_element(CliElement::option("-in").with_mapping("in"))
            .cli_element(CliElement::option("-out").with_mapping("out"))
            .cli_element(CliElement::option("-mode").with_mapping("mode"))
            .build()
            .unwrap()
    }

    fn context() -> PluginContext {
        PluginContext::new("test", "Align")
            .with_executable("align")
            .with_container(ContainerSettings::default().with_image("Align", "bio/align:2"))
    }

    fn canonical(dir: &Path) -> String {
        normalize(&std::fs::canonicalize(dir).unwrap())
    }

    #[test]
    fn test_files_in_one_directory_share_a_mount() {
        let dir = tempfile::tempdir().unwrap();
        let mut mounts = MountTable::new("/data");
        let a = dir.path().join("a.fa");
        let b = dir.path().join("b.fa");

        assert_eq!(
            mounts.container_path(&a.to_string_lossy()).unwrap(),
            "/data/0/a.fa"
        );
        assert_eq!(
            mounts.container_path(&b.to_string_lossy()).unwrap(),
            "/data/0/b.fa"
        );
        assert_eq!(mounts.len(), 1);
        assert_eq!(
            mounts.declarations(),
            vec![format!("{}:/data/0", canonical(dir.path()))]
        );
    }

    #[test]
    fn test_distinct_directories_get_distinct_mounts() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let mut mounts = MountTable::new("/data/");

        mounts
            .container_path(&first.path().join("x").to_string_lossy())
            .unwrap();
        let path = mounts
            .container_path(&second.path().join("y").to_string_lossy())
            .unwrap();
        assert_eq!(path, "/data/1/y");
        assert_eq!(mounts.len(), 2);
    }

    #[test]
    fn test_generate_full_command() {
        let inputs = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let a = inputs.path().join("a.fa").to_string_lossy().into_owned();
        let b = inputs.path().join("b.fa").to_string_lossy().into_owned();
        let out = work.path().join("out.sam").to_string_lossy().into_owned();

        let mut config = config();
        config.bind_port("in", &[a, b]).unwrap();
        config.bind_port("out", &[out]).unwrap();
        config.set_value("mode", "fast").unwrap();

        let generator = ContainerGenerator;
        let context = context();
        assert_eq!(generator.host_program(&context), "docker");

        let args = generator.generate(&config, &context, work.path()).unwrap();
        assert_eq!(
            args,
            vec![
                "run".to_string(),
                "--rm".to_string(),
                "-v".to_string(),
                format!("{}:/data/0", canonical(inputs.path())),
                "-v".to_string(),
                format!("{}:/data/1", canonical(work.path())),
                "bio/align:2".to_string(),
                "align".to_string(),
                "-in".to_string(),
                "/data/0/a.fa".to_string(),
                "-in".to_string(),
                "/data/0/b.fa".to_string(),
                "-out".to_string(),
                "/data/1/out.sam".to_string(),
                "-mode".to_string(),
                "fast".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_image_fails() {
        let context = PluginContext::new("test", "Align");
        let err = ContainerGenerator
            .generate(&config(), &context, Path::new("."))
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoContainerImage(tool) if tool == "Align"));
    }

    #[test]
    fn test_machine_env_is_exported() {
        let mut settings = ContainerSettings::default();
        settings
            .machine_env
            .insert("DOCKER_HOST".to_string(), "tcp://vm:2376".to_string());
        let context = PluginContext::new("test", "Align").with_container(settings);
        assert_eq!(
            ContainerGenerator.environment(&context),
            vec![("DOCKER_HOST".to_string(), "tcp://vm:2376".to_string())]
        );
    }

    #[test]
    fn test_normalize_windows_paths() {
        assert_eq!(normalize(Path::new(r"C:\data\in")), "C:/data/in");
        assert_eq!(normalize(Path::new(r"\\?\C:\data")), "C:/data");
    }
}
