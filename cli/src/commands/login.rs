//! Login command implementation.

use std::io::IsTerminal as _;

use anyhow::{Context as _, Result, bail};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{info, instrument};

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "login")]
pub fn run_login(app: &AppContext, email: Option<String>) -> Result<()> {
    let out = Output::new();

    out.header("Login to Lendsqr");
    out.newline();

    let email = match email {
        Some(email) => email,
        None => Text::new("Email:")
            .with_help_message("Enter the email you use for the admin dashboard")
            .prompt()
            .context("Failed to read email")?,
    };

    // The password is asked for like the sign-in form does, but never checked.
    if std::io::stdin().is_terminal() {
        Password::new("Password:")
            .with_display_toggle_enabled()
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?;
    }

    let email = sign_in(app, &email)?;
    out.newline();
    out.success(format!("Signed in as {email}"));
    out.dim("The users cache was cleared; the next listing fetches fresh data.");
    Ok(())
}

/// Records the sign-in and returns the trimmed email.
pub fn sign_in(app: &AppContext, email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() {
        bail!("Email cannot be empty");
    }

    app.session
        .sign_in(email)
        .with_context(|| format!("Failed to save session in {}", app.config.data_dir().display()))?;
    info!(email, "signed in");
    Ok(email.to_owned())
}
