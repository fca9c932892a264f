// UI layer: the only place that styles text for the terminal. Spinners go to
// stderr through `indicatif`, so stdout stays clean for piped JSON.

use crate::auto_update::PendingNotice;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const NOTICE_WIDTH: usize = 41;

/// Spinner with a message, ticking in the background while a request runs.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub fn spinner_success(spinner: &ProgressBar, message: impl Into<String>) {
    spinner.set_style(message_only());
    spinner.finish_with_message(format!("{} {}", "✔".green(), message.into()));
}

pub fn spinner_failure(spinner: &ProgressBar, message: impl Into<String>) {
    spinner.set_style(message_only());
    spinner.finish_with_message(format!("{} {}", "✖".red(), message.into()));
}

fn message_only() -> ProgressStyle {
    ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub fn success(message: &str) {
    println!("{}", format!("✓ {}", message).green());
}

pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn hint(message: &str) {
    println!("{}", message.dark_grey());
}

/// `  key: value` with the key highlighted.
pub fn field(key: &str, value: &str) {
    println!("{} {}", format!("{}:", key).cyan(), value);
}

pub fn heading(title: &str) {
    println!("{}", title.bold());
}

pub fn error(message: &str) {
    eprintln!("{}", format!("Error: {}", message).red());
}

/// Boxed "update available" message printed after a command's own output.
pub fn print_notice(notice: &PendingNotice) {
    println!();
    for line in notice_lines(notice) {
        println!("{}", line.yellow());
    }
    println!();
}

/// The box as plain text, one entry per line.
pub fn notice_lines(notice: &PendingNotice) -> Vec<String> {
    let row = |text: String| format!("│  {:<width$}│", text, width = NOTICE_WIDTH - 2);
    vec![
        format!("┌{}┐", "─".repeat(NOTICE_WIDTH)),
        row("Update Available!".to_string()),
        row(String::new()),
        row(format!("Current: {}", notice.current)),
        row(format!("Latest:  {}", notice.latest)),
        row(String::new()),
        row("Run gisph update to upgrade".to_string()),
        format!("└{}┘", "─".repeat(NOTICE_WIDTH)),
    ]
}
