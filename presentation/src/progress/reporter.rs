//! Progress reporting for session execution

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use council_application::ports::progress::SessionProgressNotifier;
use council_domain::{Role, Termination, ToolKind};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per participant turn
pub struct ProgressReporter {
    turn: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            turn: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn replace(&self, bar: Option<ProgressBar>) -> Option<ProgressBar> {
        match self.turn.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, bar),
            Err(_) => None,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, role: Role, round: usize) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(role.display_name().to_string());
        pb.set_message(format!("round {}", round));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Some(previous) = self.replace(Some(pb)) {
            previous.finish_and_clear();
        }
    }

    fn on_turn_complete(&self, role: Role, round: usize) {
        if let Some(pb) = self.replace(None) {
            pb.finish_with_message(format!("{} round {}", "v".green(), round));
        } else {
            eprintln!("  {} {} (round {})", "v".green(), role.display_name(), round);
        }
    }

    fn on_tool_invoked(&self, tool: ToolKind) {
        if let Ok(guard) = self.turn.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(format!("calling {}", tool));
            }
        }
    }

    fn on_session_end(&self, termination: &Termination) {
        if let Some(pb) = self.replace(None) {
            pb.finish_and_clear();
        }
        let label = ConsoleFormatter::termination_label(termination);
        match termination {
            Termination::Completed => eprintln!("{} {}", "->".cyan(), label.green()),
            _ => eprintln!("{} {}", "->".cyan(), label.yellow()),
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SessionProgressNotifier for SimpleProgress {
    fn on_turn_start(&self, role: Role, round: usize) {
        eprintln!("{} {} (round {})", "->".cyan(), role.display_name().bold(), round);
    }

    fn on_turn_complete(&self, _role: Role, _round: usize) {}

    fn on_tool_invoked(&self, tool: ToolKind) {
        eprintln!("  {} {}", "*".cyan(), tool);
    }

    fn on_session_end(&self, termination: &Termination) {
        eprintln!("{}", ConsoleFormatter::termination_label(termination));
    }
}
