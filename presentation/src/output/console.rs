//! Console output formatter for tool runs and descriptors

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use toolbridge_application::{RunToolError, RunToolOutput};
use toolbridge_domain::{ExecutionState, Parameter, PortDirection, ToolConfiguration, to_document};

/// Serializable view of a finished run
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub tool: &'a str,
    pub exit_code: Option<i32>,
    pub state: ExecutionState,
    pub command_line: &'a [String],
    pub working_dir: String,
    pub working_dir_kept: bool,
    pub outputs: &'a BTreeMap<String, Vec<String>>,
    pub stdout: &'a [String],
    pub stderr: &'a [String],
}

impl<'a> RunSummary<'a> {
    pub fn new(tool: &'a str, output: &'a RunToolOutput) -> Self {
        Self {
            tool,
            exit_code: output.exit_code,
            state: output.final_state,
            command_line: &output.command_line,
            working_dir: output.working_dir().display().to_string(),
            working_dir_kept: output.is_working_dir_kept(),
            outputs: &output.outputs,
            stdout: &output.stdout,
            stderr: &output.stderr,
        }
    }
}

/// Formats run results and descriptors for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a finished or dry run
    pub fn format_run(tool: &str, output: &RunToolOutput, show_streams: bool) -> String {
        let mut text = String::new();

        text.push_str(&format!(
            "{} {}\n",
            "Command:".cyan().bold(),
            Self::quote_command(&output.command_line)
        ));

        match output.exit_code {
            None => text.push_str(&format!("{} {}\n", "Dry run:".yellow().bold(), tool)),
            Some(0) => text.push_str(&format!(
                "{} {} ({})\n",
                "v".green(),
                tool.bold(),
                output.final_state
            )),
            Some(code) => text.push_str(&format!(
                "{} {} exited with {} ({})\n",
                "x".red(),
                tool.bold(),
                code.to_string().red(),
                output.final_state
            )),
        }

        if !output.outputs.is_empty() {
            text.push_str(&Self::section_header("Outputs"));
            for (port, files) in &output.outputs {
                for file in files {
                    text.push_str(&format!("  {} {}\n", format!("{}:", port).yellow(), file));
                }
            }
        }

        if show_streams {
            text.push_str(&Self::streams(&output.stdout, &output.stderr));
        }

        if output.is_working_dir_kept() {
            text.push_str(&format!(
                "\n{} {}\n",
                "Working directory kept:".dimmed(),
                output.working_dir().display()
            ));
        }

        text
    }

    /// Format a run as JSON
    pub fn format_run_json(tool: &str, output: &RunToolOutput) -> String {
        serde_json::to_string_pretty(&RunSummary::new(tool, output))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a failed run, including any output captured before the failure
    pub fn format_error(error: &RunToolError) -> String {
        let mut text = format!("{} {}\n", "Error:".red().bold(), error);
        if let Some((stdout, stderr)) = error.captured_output() {
            text.push_str(&Self::streams(stdout, stderr));
        }
        text
    }

    /// Format a tool descriptor overview
    pub fn format_tool(config: &ToolConfiguration) -> String {
        let info = config.info();
        let mut text = String::new();

        text.push_str(&Self::header(&info.name));
        text.push('\n');
        for (label, value) in [
            ("Version:", info.version.as_str()),
            ("Category:", info.category.as_str()),
            ("Executable:", info.executable.as_str()),
            ("Description:", info.description.as_str()),
        ] {
            if !value.is_empty() {
                text.push_str(&format!("{} {}\n", label.cyan().bold(), value));
            }
        }

        text.push_str(&Self::section_header("Parameters"));
        for parameter in config.parameters().filter(|p| !p.is_file()) {
            text.push_str(&Self::parameter_line(parameter));
        }

        text.push_str(&Self::section_header("Ports"));
        for port in config.ports() {
            let arrow = match port.direction {
                PortDirection::Input => "<-".green(),
                PortDirection::Output => "->".yellow(),
            };
            text.push_str(&format!(
                "  {} {}{}{} [{}]\n",
                arrow,
                port.name.bold(),
                if port.is_list { " (list)" } else { "" },
                if port.optional { "" } else { " *" },
                port.extensions.join(", ")
            ));
        }

        text.push_str(&Self::section_header("Command line"));
        for (index, element) in config.cli_elements().iter().enumerate() {
            let references: Vec<&str> = element
                .mappings
                .iter()
                .map(|m| m.reference.as_str())
                .collect();
            text.push_str(&format!(
                "  {} {}{}{}\n",
                element.label(index).bold(),
                references.join(" ").dimmed(),
                if element.is_list { " (list)" } else { "" },
                if element.required { " *" } else { "" }
            ));
        }

        text.push_str(&Self::footer());
        text
    }

    /// Format a tool as its descriptor document in JSON
    pub fn format_tool_json(config: &ToolConfiguration) -> String {
        serde_json::to_string_pretty(&to_document(config)).unwrap_or_else(|_| "{}".to_string())
    }

    fn parameter_line(parameter: &Parameter) -> String {
        let mut line = format!(
            "  {} {}{}",
            parameter.key.bold(),
            parameter.kind.type_name().dimmed(),
            if parameter.is_list { "[]" } else { "" }
        );
        if !parameter.optional {
            line.push_str(&" required".red().to_string());
        }
        if parameter.advanced {
            line.push_str(&" advanced".dimmed().to_string());
        }
        let restriction = parameter.kind.restriction();
        if !restriction.is_empty() {
            line.push_str(&format!(" {{{}}}", restriction));
        }
        if let Some(value) = parameter.value_string() {
            line.push_str(&format!(" = {}", value.replace('\n', ", ")));
        }
        line.push('\n');
        line
    }

    fn streams(stdout: &[String], stderr: &[String]) -> String {
        let mut text = String::new();
        if !stdout.is_empty() {
            text.push_str(&Self::section_header("stdout"));
            text.push_str(&Self::indent(&stdout.join("\n"), "  "));
            text.push('\n');
        }
        if !stderr.is_empty() {
            text.push_str(&Self::section_header("stderr"));
            text.push_str(&Self::indent(&stderr.join("\n"), "  "));
            text.push('\n');
        }
        text
    }

    /// Shell-like rendering; arguments with whitespace are quoted.
    pub fn quote_command(command_line: &[String]) -> String {
        command_line
            .iter()
            .map(|arg| {
                if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                    format!("'{}'", arg.replace('\'', r"'\''"))
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
