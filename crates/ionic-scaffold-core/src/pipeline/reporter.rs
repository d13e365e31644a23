//! Progress output for pipeline stages

use colored::Colorize;

/// Sink for user-facing progress. Nothing it does affects control flow.
pub trait Reporter {
    fn stage_started(&self, title: &str, depth: usize);

    fn stage_completed(&self, title: &str, depth: usize);

    fn stage_failed(&self, title: &str, depth: usize);

    fn warn(&self, message: &str);

    fn info(&self, message: &str);
}

/// Colored terminal output, children indented under their parent
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}

impl Reporter for ConsoleReporter {
    fn stage_started(&self, title: &str, depth: usize) {
        println!("{}{} {}...", indent(depth), "->".blue(), title);
    }

    fn stage_completed(&self, title: &str, depth: usize) {
        println!("{}{} {}", indent(depth), "done".green(), title.dimmed());
    }

    fn stage_failed(&self, title: &str, depth: usize) {
        eprintln!("{}{} {}", indent(depth), "failed".red(), title);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "Warning:".yellow(), message);
    }

    fn info(&self, message: &str) {
        println!("{} {}", "Info:".cyan(), message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn stage_started(&self, _title: &str, _depth: usize) {}

    fn stage_completed(&self, _title: &str, _depth: usize) {}

    fn stage_failed(&self, _title: &str, _depth: usize) {}

    fn warn(&self, _message: &str) {}

    fn info(&self, _message: &str) {}
}
