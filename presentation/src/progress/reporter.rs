//! Progress reporting for tool runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use toolbridge_application::ExecutionProgress;
use toolbridge_domain::ExecutionState;

/// Reports progress with a spinner while the tool runs
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg} [{elapsed}]")
            .unwrap()
    }

    fn state_label(state: ExecutionState) -> String {
        match state {
            ExecutionState::Completed | ExecutionState::Finished => {
                state.to_string().green().to_string()
            }
            ExecutionState::Killed | ExecutionState::Failed => state.to_string().red().to_string(),
            _ => state.to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionProgress for ProgressReporter {
    fn on_state_change(&self, tool: &str, state: ExecutionState) {
        let mut spinner = self.spinner.lock().unwrap();
        match state {
            ExecutionState::Running => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::spinner_style());
                pb.set_prefix(tool.to_string());
                pb.set_message("running");
                pb.enable_steady_tick(Duration::from_millis(100));
                *spinner = Some(pb);
            }
            state if state.is_outcome() => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(Self::state_label(state));
                }
            }
            state => {
                if let Some(pb) = spinner.as_ref() {
                    pb.set_message(state.to_string());
                }
            }
        }
    }

    fn on_finished(&self, _tool: &str, _exit_code: i32) {
        if let Some(pb) = self.spinner.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ExecutionProgress for SimpleProgress {
    fn on_state_change(&self, tool: &str, state: ExecutionState) {
        eprintln!(
            "{} {} {}",
            "->".cyan(),
            tool.bold(),
            ProgressReporter::state_label(state)
        );
    }

    fn on_command(&self, command_line: &[String]) {
        eprintln!("   {}", command_line.join(" ").dimmed());
    }

    fn on_finished(&self, tool: &str, exit_code: i32) {
        if exit_code == 0 {
            eprintln!("  {} {}", "v".green(), tool);
        } else {
            eprintln!("  {} {} (exit {})", "x".red(), tool, exit_code);
        }
    }
}
