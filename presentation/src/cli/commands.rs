//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toolbridge_application::GeneratorKind;

/// Output format for run and inspect results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for toolbridge
#[derive(Parser, Debug)]
#[command(name = "toolbridge")]
#[command(author, version, about = "Run command-line tools described by declarative descriptors")]
#[command(long_about = r#"
toolbridge loads a tool descriptor, binds parameter values and files to it,
and runs the tool as a child process.

Three command strategies are available:
  cli         plain argument vector
  param-file  parameters written to a file passed behind a switch
  container   the tool runs inside a container with host directories mounted

Configuration files are loaded from (in priority order):
1. TOOLBRIDGE_* environment variables
2. --config <path>     Explicit config file
3. ./toolbridge.toml   Project-level config
4. ~/.config/toolbridge/config.toml   Global config

Example:
  toolbridge run sort.json -i in=data.txt -p reverse=true
  toolbridge run align.toml -i reads=a.fa -i reads=b.fa --generator container
  toolbridge inspect sort.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a tool once
    Run(RunArgs),
    /// Show the parameters, ports and CLI mapping of a descriptor
    Inspect(InspectArgs),
    /// Inspect the loaded configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tool descriptor (.json or .toml)
    pub descriptor: PathBuf,

    /// Parameter value; repeat a key for list parameters
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Input file for a port; repeat for list ports
    #[arg(short, long = "input", value_name = "PORT=FILE", value_parser = parse_key_value)]
    pub inputs: Vec<(String, String)>,

    /// Output file for a port; unnamed outputs are planned
    #[arg(short, long = "output", value_name = "PORT=FILE", value_parser = parse_key_value)]
    pub outputs: Vec<(String, String)>,

    /// Switch off an optional output port
    #[arg(long = "disable-output", value_name = "PORT")]
    pub disabled_outputs: Vec<String>,

    /// Command strategy (overrides the configuration)
    #[arg(short, long, value_parser = parse_generator)]
    pub generator: Option<GeneratorKind>,

    /// Base directory for working directories
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Directory for planned outputs (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep the working directory
    #[arg(long)]
    pub debug: bool,

    /// Print the command line without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Kill the tool after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Plugin identifier (overrides the configuration)
    #[arg(long, value_name = "ID")]
    pub plugin: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Tool descriptor (.json or .toml)
    pub descriptor: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the merged configuration as TOML
    Show,
    /// List configuration file locations
    Sources,
    /// Report configuration issues
    Validate,
}

/// Parse `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn parse_generator(raw: &str) -> Result<GeneratorKind, String> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("algorithm.mode=a=b").unwrap(),
            ("algorithm.mode".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("flag=").unwrap(),
            ("flag".to_string(), String::new())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::parse_from([
            "toolbridge",
            "-vv",
            "run",
            "sort.json",
            "-p",
            "reverse=true",
            "-i",
            "in=a.txt",
            "-i",
            "in=b.txt",
            "--generator",
            "param-file",
            "--disable-output",
            "log",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.descriptor, PathBuf::from("sort.json"));
        assert_eq!(args.params, vec![("reverse".to_string(), "true".to_string())]);
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.generator, Some(GeneratorKind::ParamFile));
        assert_eq!(args.disabled_outputs, vec!["log"]);
        assert!(args.dry_run);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_config_command() {
        let cli = Cli::parse_from(["toolbridge", "config", "validate", "--config", "x.toml"]);
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Validate)));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_unknown_generator_is_rejected() {
        let result = Cli::try_parse_from(["toolbridge", "run", "t.json", "--generator", "ssh"]);
        assert!(result.is_err());
    }
}
