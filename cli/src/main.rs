//! CLI entrypoint for toolbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use toolbridge_application::{
    ExecutionProgress, NoProgress, RunToolError, RunToolInput, RunToolUseCase,
};
use toolbridge_infrastructure::{
    ConfigIssue, ConfigLoader, ConfiguredBinaryLocator, FileConfig, GeneratorRegistry,
    GlobOutputRelocator, LocalExecutorFactory, LocalWorkspaceProvider, load_descriptor,
};
use toolbridge_presentation::{
    Cli, Command, ConfigCommand, ConsoleFormatter, InspectArgs, OutputFormat, ProgressReporter,
    RunArgs, SimpleProgress,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status reported when a run is cancelled (Ctrl-C or timeout)
const CANCELLED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("Starting toolbridge");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let code = match &cli.command {
        Command::Run(args) => run(&cli, &config, args).await?,
        Command::Inspect(args) => inspect(args)?,
        Command::Config(command) => configure(&cli, &config, *command)?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn run(cli: &Cli, config: &FileConfig, args: &RunArgs) -> Result<i32> {
    let issues = config.validate();
    report_issues(&issues);
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Configuration has errors; run `toolbridge config validate` for details");
    }

    let mut tool = load_descriptor(&args.descriptor)?;
    let tool_name = tool.name().to_string();
    let executable = tool.info().executable.clone();

    // === Dependency Injection ===
    let kind = args
        .generator
        .unwrap_or_else(|| config.generator_for(&tool_name));
    let generator = GeneratorRegistry::default()
        .create(kind)
        .ok_or_else(|| anyhow!("No generator registered for '{}'", kind))?;

    let mut context = config.plugin_context(&tool_name, &executable);
    if let Some(plugin) = &args.plugin {
        context.plugin_id = plugin.clone();
    }
    if args.debug {
        context.debug = true;
    }

    let locator = ConfiguredBinaryLocator::for_tool(config, &tool_name, &executable);
    let workspaces = args
        .work_dir
        .clone()
        .or_else(|| config.execution.work_dir.clone())
        .map(LocalWorkspaceProvider::new)
        .unwrap_or_default();

    let use_case = RunToolUseCase::new(
        generator,
        Arc::new(LocalExecutorFactory::new(Arc::new(locator))),
        Arc::new(workspaces),
        Arc::new(GlobOutputRelocator),
    );

    let input = build_input(args)?;

    // Cancellation: Ctrl-C or --timeout
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling tool");
                token.cancel();
            }
        });
    }
    if let Some(seconds) = args.timeout {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            warn!("Timeout of {}s reached, cancelling tool", seconds);
            token.cancel();
        });
    }

    let progress: Box<dyn ExecutionProgress> = if cli.quiet || args.format == OutputFormat::Json {
        Box::new(NoProgress)
    } else if cli.verbose > 0 {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let result = use_case
        .execute_with_progress(
            &mut tool,
            &context,
            input,
            Arc::new(token.clone()),
            progress.as_ref(),
        )
        .await;

    match result {
        Ok(output) => {
            let rendered = match args.format {
                OutputFormat::Text => {
                    ConsoleFormatter::format_run(&tool_name, &output, cli.verbose > 0)
                }
                OutputFormat::Json => ConsoleFormatter::format_run_json(&tool_name, &output),
            };
            println!("{}", rendered);
            Ok(output.exit_code.unwrap_or(0))
        }
        Err(error) => {
            eprint!("{}", ConsoleFormatter::format_error(&error));
            Ok(match error {
                RunToolError::NonZeroExit { exit_code, .. } => exit_code,
                RunToolError::Cancelled { .. } => CANCELLED_EXIT_CODE,
                _ => 1,
            })
        }
    }
}

fn build_input(args: &RunArgs) -> Result<RunToolInput> {
    let mut input = RunToolInput::new().strict();

    for (key, value) in &args.params {
        input = input.with_parameter(key, value);
    }
    // The child runs in its own working directory, so file paths are made absolute.
    for (port, file) in &args.inputs {
        input = input.with_input(port, absolute(Path::new(file))?);
    }
    for (port, file) in &args.outputs {
        input = input.with_output(port, absolute(Path::new(file))?);
    }
    for port in &args.disabled_outputs {
        input = input.without_output(port);
    }

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    input = input.with_output_dir(PathBuf::from(absolute(&output_dir)?));

    if args.dry_run {
        input = input.dry_run();
    }
    Ok(input)
}

fn absolute(path: &Path) -> Result<String> {
    let path = std::path::absolute(path)
        .with_context(|| format!("Cannot resolve path {}", path.display()))?;
    Ok(path.to_string_lossy().into_owned())
}

fn inspect(args: &InspectArgs) -> Result<i32> {
    let tool = load_descriptor(&args.descriptor)?;
    let rendered = match args.format {
        OutputFormat::Text => ConsoleFormatter::format_tool(&tool),
        OutputFormat::Json => ConsoleFormatter::format_tool_json(&tool),
    };
    println!("{}", rendered);
    Ok(0)
}

fn configure(cli: &Cli, config: &FileConfig, command: ConfigCommand) -> Result<i32> {
    match command {
        ConfigCommand::Show => {
            let text = toml::to_string_pretty(config).context("Failed to render configuration")?;
            println!("{}", text);
            Ok(0)
        }
        ConfigCommand::Sources => {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            Ok(0)
        }
        ConfigCommand::Validate => {
            let issues = config.validate();
            if issues.is_empty() {
                println!("{} configuration is valid", "v".green());
                return Ok(0);
            }
            report_issues(&issues);
            Ok(if issues.iter().any(ConfigIssue::is_error) { 1 } else { 0 })
        }
    }
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        if issue.is_error() {
            eprintln!("{} {}", "error:".red().bold(), issue.message);
        } else {
            eprintln!("{} {}", "warning:".yellow().bold(), issue.message);
        }
    }
}
