//! Command implementations for the `lendsqr` CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod login;
pub mod user;
pub mod users;

pub use completions::generate_completions;
pub use login::run_login;
pub use user::run_user;
pub use users::run_users;
