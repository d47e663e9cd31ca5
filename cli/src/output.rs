//! Styled terminal output.
//!
//! Commands print through [`Output`] instead of calling `println!` directly,
//! so every line goes to the same terminal handle with consistent markers.

use std::fmt::Display;

use console::{Term, style};
use lendsqr_business::UserStatus;

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, line: &str) {
        drop(self.term.write_line(line));
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✓").green().bold()));
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✗").red().bold()));
    }

    pub fn warning(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("⚠").yellow().bold()));
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        self.line(&message.to_string());
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    pub fn subheader(&self, message: impl Display) {
        self.line(&style(message).bold().to_string());
    }

    pub fn divider(&self, width: usize) {
        self.line(&style("─".repeat(width)).dim().to_string());
    }

    /// Print a labeled value with indentation. Empty values show as `-`.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        let value = value.to_string();
        let value = if value.is_empty() { "-".to_owned() } else { value };
        self.line(&format!("{spaces}{}: {value}", style(label).dim()));
    }

    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }
}

/// Status badge text, colored like the dashboard's badges.
pub fn status_badge(status: UserStatus) -> String {
    let label = style(status.as_str());
    match status {
        UserStatus::Active => label.green(),
        UserStatus::Inactive => label.dim(),
        UserStatus::Pending => label.yellow(),
        UserStatus::Blacklisted => label.red(),
    }
    .to_string()
}
