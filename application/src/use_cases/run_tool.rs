//! Run Tool use case
//!
//! Drives one invocation of a wrapped tool:
//!
//! 1. reset parameters to their descriptor defaults
//! 2. bind parameter values, input files and output activity
//! 3. reject unbound required parameters
//! 4. create the exclusive working directory and plan outputs
//! 5. prepare the executor (resolve, build environment, generate)
//! 6. run it cancellably and join worker and monitor
//! 7. apply relocators after a successful run

use super::cancellable::{CancellableExecution, ExecutionTracker};
use super::port_binding::{self, PortBindingError};
use crate::config::PluginContext;
use crate::ports::cancellation::CancellationSignal;
use crate::ports::command_generator::CommandGenerator;
use crate::ports::output_relocator::OutputRelocator;
use crate::ports::process_executor::{ExecutionError, ExecutorFactory};
use crate::ports::progress::{ExecutionProgress, NoProgress};
use crate::ports::workspace::{Workspace, WorkspaceProvider};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use toolbridge_domain::{DomainError, ExecutionState, ToolConfiguration};
use tracing::{debug, info, warn};

/// Errors that can occur while running a tool
#[derive(Error, Debug)]
pub enum RunToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    PortBinding(#[from] PortBindingError),

    #[error("Failed to create working directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Tool '{tool}' was cancelled")]
    Cancelled {
        tool: String,
        stdout: Vec<String>,
        stderr: Vec<String>,
    },

    #[error("Tool '{tool}' exited with code {exit_code}")]
    NonZeroExit {
        tool: String,
        exit_code: i32,
        stdout: Vec<String>,
        stderr: Vec<String>,
    },

    #[error("Failed to relocate outputs: {0}")]
    Relocation(#[source] std::io::Error),
}

impl RunToolError {
    /// Output captured from the tool, when the error carries any.
    pub fn captured_output(&self) -> Option<(&[String], &[String])> {
        match self {
            RunToolError::Cancelled { stdout, stderr, .. }
            | RunToolError::NonZeroExit { stdout, stderr, .. } => Some((stdout, stderr)),
            RunToolError::Execution(e) => e.captured_output(),
            _ => None,
        }
    }
}

/// Input for the RunTool use case
#[derive(Debug, Clone, Default)]
pub struct RunToolInput {
    /// Parameter key -> raw values (one entry per list item)
    pub parameters: BTreeMap<String, Vec<String>>,
    /// Input port -> files
    pub inputs: BTreeMap<String, Vec<String>>,
    /// Output port -> files; unnamed outputs are planned
    pub outputs: BTreeMap<String, Vec<String>>,
    /// Optional outputs to switch off
    pub disabled_outputs: Vec<String>,
    /// Where planned outputs go (defaults to the working directory)
    pub output_dir: Option<PathBuf>,
    /// Generate the command line without spawning
    pub dry_run: bool,
    /// Treat a non-zero exit code as an error
    pub strict: bool,
}

impl RunToolInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_input(mut self, port: impl Into<String>, file: impl Into<String>) -> Self {
        self.inputs.entry(port.into()).or_default().push(file.into());
        self
    }

    pub fn with_output(mut self, port: impl Into<String>, file: impl Into<String>) -> Self {
        self.outputs.entry(port.into()).or_default().push(file.into());
        self
    }

    pub fn without_output(mut self, port: impl Into<String>) -> Self {
        self.disabled_outputs.push(port.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// Result of a tool run.
///
/// Owns the working directory guard: the directory lives as long as this
/// value (and beyond, when it is kept).
pub struct RunToolOutput {
    /// `None` for dry runs
    pub exit_code: Option<i32>,
    pub command_line: Vec<String>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    /// Output port -> files
    pub outputs: BTreeMap<String, Vec<String>>,
    pub final_state: ExecutionState,
    workspace: Box<dyn Workspace>,
}

impl RunToolOutput {
    pub fn working_dir(&self) -> &Path {
        self.workspace.path()
    }

    pub fn is_working_dir_kept(&self) -> bool {
        self.workspace.is_kept()
    }

    /// Keep the working directory after this value is dropped.
    pub fn keep_working_dir(&mut self) {
        self.workspace.keep();
    }
}

/// Use case for running a wrapped tool once
pub struct RunToolUseCase {
    generator: Arc<dyn CommandGenerator>,
    executors: Arc<dyn ExecutorFactory>,
    workspaces: Arc<dyn WorkspaceProvider>,
    relocator: Arc<dyn OutputRelocator>,
}

impl RunToolUseCase {
    pub fn new(
        generator: Arc<dyn CommandGenerator>,
        executors: Arc<dyn ExecutorFactory>,
        workspaces: Arc<dyn WorkspaceProvider>,
        relocator: Arc<dyn OutputRelocator>,
    ) -> Self {
        Self {
            generator,
            executors,
            workspaces,
            relocator,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        config: &mut ToolConfiguration,
        context: &PluginContext,
        input: RunToolInput,
        signal: Arc<dyn CancellationSignal>,
    ) -> Result<RunToolOutput, RunToolError> {
        self.execute_with_progress(config, context, input, signal, &NoProgress)
            .await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        config: &mut ToolConfiguration,
        context: &PluginContext,
        input: RunToolInput,
        signal: Arc<dyn CancellationSignal>,
        progress: &dyn ExecutionProgress,
    ) -> Result<RunToolOutput, RunToolError> {
        let tool = config.name().to_string();
        info!(tool = %tool, generator = %self.generator.kind(), "Running tool");

        config.reset();
        for (key, values) in &input.parameters {
            config.set_values(key, values.as_slice())?;
        }
        port_binding::disable_outputs(config, &input.disabled_outputs)?;
        port_binding::bind_inputs(config, &input.inputs)?;
        config.check_bound()?;

        let mut workspace = self
            .workspaces
            .create(&tool)
            .map_err(RunToolError::Workspace)?;
        if context.debug {
            workspace.keep();
        }
        let working_dir = workspace.path().to_path_buf();
        debug!(dir = %working_dir.display(), "Working directory created");

        let output_dir = input.output_dir.as_deref().unwrap_or(&working_dir);
        let outputs = port_binding::bind_outputs(config, &input.outputs, output_dir)?;

        let context = context.clone().with_working_dir(&working_dir);
        let tracker = Arc::new(ExecutionTracker::new());
        tracker.transition(ExecutionState::Preparing);
        progress.on_state_change(&tool, ExecutionState::Preparing);

        let mut executor = self.executors.create(Arc::clone(&self.generator));
        if let Err(e) = executor.prepare_execution(config, &context) {
            tracker.transition(ExecutionState::Failed);
            progress.on_state_change(&tool, ExecutionState::Failed);
            return Err(e.into());
        }
        let command_line = executor.command_line().unwrap_or_default();
        debug!(command = ?command_line, "Command prepared");
        progress.on_command(&command_line);

        if input.dry_run {
            return Ok(RunToolOutput {
                exit_code: None,
                command_line,
                stdout: Vec::new(),
                stderr: Vec::new(),
                outputs,
                final_state: ExecutionState::Preparing,
                workspace,
            });
        }

        let handle = CancellableExecution::new(Arc::from(executor), signal)
            .with_poll_interval(context.poll_interval)
            .with_tracker(Arc::clone(&tracker))
            .spawn();
        progress.on_state_change(&tool, ExecutionState::Running);

        let report = handle.wait_until_finished().await;
        progress.on_state_change(&tool, report.state);
        progress.on_finished(&tool, report.exit_code);

        if let Some(error) = report.error {
            warn!(tool = %tool, "Execution failed: {}", error);
            return Err(error.into());
        }

        match report.state {
            ExecutionState::Killed => {
                return Err(RunToolError::Cancelled {
                    tool,
                    stdout: report.stdout,
                    stderr: report.stderr,
                });
            }
            _ if report.exit_code != 0 => {
                warn!(tool = %tool, exit_code = report.exit_code, "Tool exited with non-zero code");
                if input.strict {
                    return Err(RunToolError::NonZeroExit {
                        tool,
                        exit_code: report.exit_code,
                        stdout: report.stdout,
                        stderr: report.stderr,
                    });
                }
            }
            _ => {
                let moved = self
                    .relocator
                    .relocate(&working_dir, config.relocators(), &outputs)
                    .map_err(RunToolError::Relocation)?;
                if moved > 0 {
                    debug!(moved, "Relocated outputs");
                }
            }
        }

        info!(tool = %tool, exit_code = report.exit_code, "Tool finished");
        Ok(RunToolOutput {
            exit_code: Some(report.exit_code),
            command_line,
            stdout: report.stdout,
            stderr: report.stderr,
            outputs,
            final_state: report.state,
            workspace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorKind;
    use crate::ports::cancellation::NeverCancelled;
    use crate::ports::command_generator::GenerationError;
    use crate::ports::process_executor::ProcessExecutor;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use toolbridge_domain::{build_argument_strings, parse};

    const SORTER: &str = r#"{
        "tool": { "name": "Sorter" },
        "parameters": { "name": "Sorter", "entries": [
            { "kind": "item", "name": "in", "type": "string",
              "tags": "input file,required", "supported_formats": "txt" },
            { "kind": "item", "name": "out", "type": "string",
              "tags": "output file", "supported_formats": "txt" },
            { "kind": "item", "name": "reverse", "type": "string",
              "value": "false", "restrictions": "true,false" },
            { "kind": "item", "name": "key", "type": "int", "restrictions": "1:9", "tags": "required" }
        ]},
        "cli": [
            { "option": "-in", "mappings": [{ "reference": "in" }] },
            { "option": "-out", "mappings": [{ "reference": "out" }] },
            { "option": "-r", "mappings": [{ "reference": "reverse" }] },
            { "option": "-k", "mappings": [{ "reference": "key" }] }
        ],
        "relocators": [ { "reference": "out", "pattern": "*.sorted" } ]
    }"#;

    struct PlainGenerator;

    impl CommandGenerator for PlainGenerator {
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

    struct ScriptedExecutor {
        generator: Arc<dyn CommandGenerator>,
        exit_code: i32,
        command: Option<Vec<String>>,
    }

    #[async_trait]
    impl ProcessExecutor for ScriptedExecutor {
        fn prepare_execution(
            &mut self,
            config: &ToolConfiguration,
            context: &PluginContext,
        ) -> Result<(), ExecutionError> {
            let mut command = vec![context.executable_name.clone()];
            command.extend(self.generator.generate(config, context, &context.working_dir)?);
            self.command = Some(command);
            Ok(())
        }

        fn command_line(&self) -> Option<Vec<String>> {
            self.command.clone()
        }

        async fn execute(&self) -> Result<i32, ExecutionError> {
            Ok(self.exit_code)
        }

        fn kill(&self) {}

        fn stdout(&self) -> Vec<String> {
            vec!["sorted 3 lines".to_string()]
        }

        fn stderr(&self) -> Vec<String> {
            vec!["warning: empty line".to_string()]
        }
    }

    struct ScriptedFactory {
        exit_code: i32,
        created: AtomicUsize,
    }

    impl ExecutorFactory for ScriptedFactory {
        fn create(&self, generator: Arc<dyn CommandGenerator>) -> Box<dyn ProcessExecutor> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Box::new(ScriptedExecutor {
                generator,
                exit_code: self.exit_code,
                command: None,
            })
        }
    }

    struct TempWorkspace {
        dir: Option<tempfile::TempDir>,
        path: PathBuf,
        kept: bool,
    }

    impl Workspace for TempWorkspace {
        fn path(&self) -> &Path {
            &self.path
        }

        fn keep(&mut self) {
            self.kept = true;
            if let Some(dir) = self.dir.take() {
                let _ = dir.keep();
            }
        }

        fn is_kept(&self) -> bool {
            self.kept
        }
    }

    struct TempWorkspaces;

    impl WorkspaceProvider for TempWorkspaces {
        fn create(&self, _tool_name: &str) -> std::io::Result<Box<dyn Workspace>> {
            let dir = tempfile::tempdir()?;
            Ok(Box::new(TempWorkspace {
                path: dir.path().to_path_buf(),
                dir: Some(dir),
                kept: false,
            }))
        }
    }

    #[derive(Default)]
    struct RecordingRelocator {
        calls: Mutex<Vec<BTreeMap<String, Vec<String>>>>,
    }

    impl OutputRelocator for RecordingRelocator {
        fn relocate(
            &self,
            _working_dir: &Path,
            _relocators: &[toolbridge_domain::Relocator],
            outputs: &BTreeMap<String, Vec<String>>,
        ) -> std::io::Result<usize> {
            self.calls.lock().unwrap().push(outputs.clone());
            Ok(0)
        }
    }

    fn use_case(exit_code: i32) -> (RunToolUseCase, Arc<RecordingRelocator>) {
        let relocator = Arc::new(RecordingRelocator::default());
        let use_case = RunToolUseCase::new(
            Arc::new(PlainGenerator),
            Arc::new(ScriptedFactory {
                exit_code,
                created: AtomicUsize::new(0),
            }),
            Arc::new(TempWorkspaces),
            relocator.clone(),
        );
        (use_case, relocator)
    }

    fn context() -> PluginContext {
        PluginContext::new("org.example", "Sorter").with_executable("sorter")
    }

    #[tokio::test]
    async fn test_successful_run_binds_and_plans() {
        let mut config = parse(SORTER.as_bytes()).unwrap();
        let (use_case, relocator) = use_case(0);
        let input = RunToolInput::new()
            .with_parameter("key", "2")
            .with_parameter("reverse", "true")
            .with_input("in", "/data/lines.txt");

        let output = use_case
            .execute(&mut config, &context(), input, Arc::new(NeverCancelled))
            .await
            .unwrap();

        let planned = output.working_dir().join("out.txt").to_string_lossy().into_owned();
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.final_state, ExecutionState::Completed);
        assert_eq!(
            output.command_line,
            vec!["sorter", "-in", "/data/lines.txt", "-out", planned.as_str(), "-r", "-k", "2"]
        );
        assert_eq!(output.outputs["out"], vec![planned.clone()]);
        assert_eq!(output.stdout, vec!["sorted 3 lines"]);
        assert_eq!(relocator.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_values_are_reset_between_runs() {
        let mut config = parse(SORTER.as_bytes()).unwrap();
        let (use_case, _) = use_case(0);
        let first = RunToolInput::new()
            .with_parameter("key", "2")
            .with_parameter("reverse", "true")
            .with_input("in", "/data/a.txt")
            .dry_run();
        use_case
            .execute(&mut config, &context(), first, Arc::new(NeverCancelled))
            .await
            .unwrap();

        let second = RunToolInput::new()
            .with_parameter("key", "3")
            .with_input("in", "/data/b.txt")
            .without_output("out")
            .dry_run();
        let output = use_case
            .execute(&mut config, &context(), second, Arc::new(NeverCancelled))
            .await
            .unwrap();
        assert_eq!(output.exit_code, None);
        assert_eq!(
            output.command_line,
            vec!["sorter", "-in", "/data/b.txt", "-k", "3"]
        );
    }

    #[tokio::test]
    async fn test_missing_required_parameter() {
        let mut config = parse(SORTER.as_bytes()).unwrap();
        let (use_case, _) = use_case(0);
        let input = RunToolInput::new().with_input("in", "/data/a.txt");
        let err = use_case
            .execute(&mut config, &context(), input, Arc::new(NeverCancelled))
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RunToolError::Domain(DomainError::UnboundParameter(ref key)) if key == "key"
        ));
    }

    #[tokio::test]
    async fn test_non_zero_exit_reported_or_raised() {
        let mut config = parse(SORTER.as_bytes()).unwrap();
        let (use_case, relocator) = use_case(2);
        let input = RunToolInput::new()
            .with_parameter("key", "1")
            .with_input("in", "/data/a.txt");

        let output = use_case
            .execute(&mut config, &context(), input.clone(), Arc::new(NeverCancelled))
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(2));
        assert!(relocator.calls.lock().unwrap().is_empty());

        let err = use_case
            .execute(&mut config, &context(), input.strict(), Arc::new(NeverCancelled))
            .await
            .err()
            .unwrap();
        let RunToolError::NonZeroExit { exit_code, .. } = &err else {
            panic!("expected NonZeroExit, got {:?}", err);
        };
        assert_eq!(*exit_code, 2);
        let (_, stderr) = err.captured_output().unwrap();
        assert_eq!(stderr, ["warning: empty line".to_string()]);
    }

    #[tokio::test]
    async fn test_debug_keeps_working_dir() {
        let mut config = parse(SORTER.as_bytes()).unwrap();
        let (use_case, _) = use_case(0);
        let input = RunToolInput::new()
            .with_parameter("key", "1")
            .with_input("in", "/data/a.txt")
            .dry_run();
        let output = use_case
            .execute(
                &mut config,
                &context().with_debug(true),
                input,
                Arc::new(NeverCancelled),
            )
            .await
            .unwrap();
        let dir = output.working_dir().to_path_buf();
        assert!(output.is_working_dir_kept());
        drop(output);
        assert!(dir.exists());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
