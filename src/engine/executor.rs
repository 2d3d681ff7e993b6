//! Execution glue - progress bar, confirmation prompt and summary

use anyhow::Result;
use colored::Colorize;
use declarative::{Action, ApplyResult, ConfirmCallback, ExecuteSummary, ProgressCallback};
use indicatif::ProgressBar;

use crate::progress;
use crate::ui;

/// Symbol shown next to a finished change
pub fn result_symbol(result: &ApplyResult) -> &'static str {
    match result {
        ApplyResult::NoChange => "○",
        ApplyResult::Created
        | ApplyResult::Modified
        | ApplyResult::Replaced
        | ApplyResult::Removed => "✓",
        ApplyResult::Failed { .. } => "✗",
        ApplyResult::Skipped { .. } => "⊘",
    }
}

/// Progress bar over the changes of one apply
pub struct BarProgress {
    bar: ProgressBar,
    quiet: bool,
    failures: Vec<String>,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: progress::hidden(),
            quiet,
            failures: Vec::new(),
        }
    }
}

impl ProgressCallback for BarProgress {
    fn on_batch_start(&mut self, count: usize) {
        if !self.quiet {
            self.bar = progress::bar(count as u64, "Applying");
        }
    }

    fn on_change_complete(&mut self, address: &str, action: Action, result: &ApplyResult) {
        self.bar
            .set_message(format!("{} {address}", result_symbol(result)));
        self.bar.inc(1);

        if let ApplyResult::Failed { error } = result {
            self.failures.push(format!("{action} {address}: {error}"));
        }
    }

    fn on_batch_complete(&mut self) {
        self.bar.finish_and_clear();
        for failure in &self.failures {
            ui::error(failure);
        }
    }
}

/// Confirmation through an interactive prompt, or `--yes`
pub struct PromptConfirm {
    pub yes: bool,
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }

        if !console::Term::stdout().is_term() {
            anyhow::bail!("Refusing to change groups without a terminal to confirm on; pass --yes");
        }

        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Groups applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Groups applied with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} created", ui::count(summary.created, "group"));
    }
    if summary.modified > 0 {
        println!("    • {} updated", ui::count(summary.modified, "group"));
    }
    if summary.replaced > 0 {
        println!("    • {} replaced", ui::count(summary.replaced, "group"));
    }
    if summary.removed > 0 {
        println!("    • {} destroyed", ui::count(summary.removed, "group"));
    }
    if summary.skipped > 0 {
        println!("    • {} skipped", ui::count(summary.skipped, "group"));
    }
    if summary.failed > 0 {
        println!(
            "    • {} {}",
            ui::count(summary.failed, "group"),
            "failed".red()
        );
    }
}
