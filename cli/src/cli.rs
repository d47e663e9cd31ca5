use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use lendsqr_business::{PageSize, UserFilter, UserStatus};

#[derive(Parser)]
#[command(name = "lendsqr")]
#[command(about = "Browse Lendsqr users from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Users API base URL (overrides LENDSQR_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory for the local cache and session (overrides LENDSQR_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to the dashboard
    Login {
        /// Email address (prompted for when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
    /// List users with stats, filters and pagination
    Users(UsersArgs),
    /// Show the details of one user
    User {
        /// User ID
        id: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Page to show, starting at 1
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 10, 20, 50 or 100
    #[arg(long, short = 's', default_value_t = PageSize::Ten)]
    pub page_size: PageSize,

    /// Exact organization name
    #[arg(long)]
    pub organization: Option<String>,

    /// Part of the username, any case
    #[arg(long)]
    pub username: Option<String>,

    /// Part of the email, any case
    #[arg(long)]
    pub email: Option<String>,

    /// Join date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date_joined: Option<NaiveDate>,

    /// Part of the phone number
    #[arg(long)]
    pub phone_number: Option<String>,

    /// Active, Inactive, Pending or Blacklisted
    #[arg(long)]
    pub status: Option<UserStatus>,

    /// Browse interactively: page through, filter and open rows
    #[arg(long, short = 'I', conflicts_with = "json")]
    pub interactive: bool,

    /// Print the current page as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl UsersArgs {
    pub fn filter(&self) -> UserFilter {
        let mut filter = UserFilter::new();
        if let Some(organization) = &self.organization {
            filter = filter.with_organization(organization.as_str());
        }
        if let Some(username) = &self.username {
            filter = filter.with_username(username.as_str());
        }
        if let Some(email) = &self.email {
            filter = filter.with_email(email.as_str());
        }
        if let Some(date) = self.date_joined {
            filter = filter.with_date_joined(date);
        }
        if let Some(phone_number) = &self.phone_number {
            filter = filter.with_phone_number(phone_number.as_str());
        }
        if let Some(status) = self.status {
            filter = filter.with_status(status);
        }
        filter
    }
}
