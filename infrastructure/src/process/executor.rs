//! Local process executor
//!
//! Spawns the host command with both output pipes drained by dedicated
//! reader tasks, so a child writing more than a pipe buffer to either
//! stream never blocks on the other one.
//!
//! ```text
//!            ┌──────────── stdout reader ──▶ Vec<String>
//! child ─────┤
//!            └──────────── stderr reader ──▶ Vec<String>
//!   ▲
//!   └── wait() ◀── select ──▶ kill token
//! ```
//!
//! Once the child has exited or been killed, the readers get a short grace
//! period to reach EOF and are then abandoned.

use super::environment::build_environment;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use toolbridge_application::{
    BinaryLocator, CommandGenerator, ExecutionError, ExecutorFactory, FAILED_EXIT_CODE,
    PluginContext, ProcessExecutor,
};
use toolbridge_domain::ToolConfiguration;
use tracing::{debug, info, warn};

/// How long readers may keep draining once the child is gone.
const READER_GRACE: Duration = Duration::from_millis(500);

type LineBuffer = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone)]
struct PreparedCommand {
    program: PathBuf,
    arguments: Vec<String>,
    environment: BTreeMap<String, String>,
    working_dir: PathBuf,
}

/// Runs one tool invocation as a child process of this one.
pub struct LocalProcessExecutor {
    generator: Arc<dyn CommandGenerator>,
    locator: Arc<dyn BinaryLocator>,
    prepared: Option<PreparedCommand>,
    stdout: LineBuffer,
    stderr: LineBuffer,
    kill: CancellationToken,
}

impl LocalProcessExecutor {
    pub fn new(generator: Arc<dyn CommandGenerator>, locator: Arc<dyn BinaryLocator>) -> Self {
        Self {
            generator,
            locator,
            prepared: None,
            stdout: Arc::new(Mutex::new(Vec::new())),
            stderr: Arc::new(Mutex::new(Vec::new())),
            kill: CancellationToken::new(),
        }
    }

    fn failed(&self, source: io::Error) -> ExecutionError {
        ExecutionError::ExecutionFailed {
            source,
            stdout: self.stdout(),
            stderr: self.stderr(),
        }
    }
}

#[async_trait::async_trait]
impl ProcessExecutor for LocalProcessExecutor {
    fn prepare_execution(
        &mut self,
        config: &ToolConfiguration,
        context: &PluginContext,
    ) -> Result<(), ExecutionError> {
        let program_name = self.generator.host_program(context);
        let program = self
            .locator
            .locate(&context.plugin_id, &context.tool_name, &program_name)
            .ok_or_else(|| ExecutionError::NoExecutable {
                tool: context.tool_name.clone(),
                executable: program_name.clone(),
            })?;

        let mut environment = build_environment(&context.environment, ambient_environment());
        environment.extend(self.generator.environment(context));

        let arguments = self
            .generator
            .generate(config, context, &context.working_dir)?;

        info!(
            "Prepared {} via {} strategy: {} {}",
            context.tool_name,
            self.generator.kind(),
            program.display(),
            arguments.join(" ")
        );

        self.prepared = Some(PreparedCommand {
            program,
            arguments,
            environment,
            working_dir: context.working_dir.clone(),
        });
        Ok(())
    }

    fn command_line(&self) -> Option<Vec<String>> {
        self.prepared.as_ref().map(|prepared| {
            std::iter::once(prepared.program.to_string_lossy().into_owned())
                .chain(prepared.arguments.iter().cloned())
                .collect()
        })
    }

    async fn execute(&self) -> Result<i32, ExecutionError> {
        let prepared = self.prepared.as_ref().ok_or(ExecutionError::NotPrepared)?;

        let mut command = Command::new(&prepared.program);
        command
            .args(&prepared.arguments)
            .envs(&prepared.environment)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if !prepared.working_dir.as_os_str().is_empty() {
            command.current_dir(&prepared.working_dir);
        }

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            command.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = command.spawn().map_err(|source| self.failed(source))?;
        debug!("Spawned {} (pid {:?})", prepared.program.display(), child.id());

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.failed(io::Error::other("Failed to capture stdout")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.failed(io::Error::other("Failed to capture stderr")))?;
        let readers = [
            tokio::spawn(drain_lines(stdout, Arc::clone(&self.stdout))),
            tokio::spawn(drain_lines(stderr, Arc::clone(&self.stderr))),
        ];

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = self.kill.cancelled() => None,
        };

        let status = match waited {
            None => {
                warn!("Killing {}", prepared.program.display());
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", prepared.program.display(), e);
                }
                // Killed: whatever the readers still hold is best effort.
                let _ = settle_readers(readers, &self.kill).await;
                return Ok(FAILED_EXIT_CODE);
            }
            Some(Err(source)) => {
                for reader in &readers {
                    reader.abort();
                }
                return Err(self.failed(source));
            }
            Some(Ok(status)) => status,
        };

        // Background processes started by the tool may keep the pipes open
        // after it exits; readers are not waited on past the grace period.
        settle_readers(readers, &self.kill)
            .await
            .map_err(|source| self.failed(source))?;

        let code = status.code().unwrap_or(FAILED_EXIT_CODE);
        debug!("{} exited with {}", prepared.program.display(), code);
        Ok(code)
    }

    fn kill(&self) {
        self.kill.cancel();
    }

    fn stdout(&self) -> Vec<String> {
        self.stdout.lock().unwrap().clone()
    }

    fn stderr(&self) -> Vec<String> {
        self.stderr.lock().unwrap().clone()
    }
}

/// Current process environment; non-Unicode entries are inherited untouched.
fn ambient_environment() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Read a stream line by line until EOF; invalid UTF-8 is replaced.
async fn drain_lines<R>(stream: R, sink: LineBuffer) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        sink.lock().unwrap().push(line);
    }
}

async fn join_reader(reader: JoinHandle<io::Result<()>>) -> io::Result<()> {
    match reader.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::other(e)),
    }
}

/// Join both readers, aborting any still running after [`READER_GRACE`]
/// or once a kill is requested.
async fn settle_readers(
    readers: [JoinHandle<io::Result<()>>; 2],
    kill: &CancellationToken,
) -> io::Result<()> {
    let deadline = tokio::time::Instant::now() + READER_GRACE;
    let mut outcome = Ok(());
    for reader in readers {
        let abort = reader.abort_handle();
        tokio::select! {
            joined = tokio::time::timeout_at(deadline, join_reader(reader)) => match joined {
                Ok(Err(e)) if outcome.is_ok() => outcome = Err(e),
                Ok(_) => {}
                Err(_) => {
                    debug!("Output pipe still open after exit, abandoning reader");
                    abort.abort();
                }
            },
            _ = kill.cancelled(), if !kill.is_cancelled() => abort.abort(),
        }
    }
    outcome
}

/// Creates a [`LocalProcessExecutor`] per invocation.
pub struct LocalExecutorFactory {
    locator: Arc<dyn BinaryLocator>,
}

impl LocalExecutorFactory {
    pub fn new(locator: Arc<dyn BinaryLocator>) -> Self {
        Self { locator }
    }
}

impl ExecutorFactory for LocalExecutorFactory {
    fn create(&self, generator: Arc<dyn CommandGenerator>) -> Box<dyn ProcessExecutor> {
        Box::new(LocalProcessExecutor::new(
            generator,
            Arc::clone(&self.locator),
        ))
    }
}
