//! List users: stats cards, the filtered table and the pagination bar.

use std::fmt;

use anyhow::{Context as _, Result, bail};
use chrono::NaiveDate;
use inquire::{Select, Text};
use lendsqr_business::{
    Dashboard, FilterColumn, Interaction, LoadPhase, PageSize, RowAction, RowActionOutcome,
    UserFilter, UserId, UserStatus, find_user,
};
use tracing::{instrument, warn};

use crate::cli::UsersArgs;
use crate::commands::user::print_user;
use crate::context::AppContext;
use crate::output::Output;
use crate::render::{pagination_bar, users_table};

#[instrument(skip_all, name = "users", fields(page = args.page, page_size = %args.page_size))]
pub async fn run_users(app: &AppContext, args: UsersArgs) -> Result<()> {
    let out = Output::new();

    if !app.session.is_authenticated() {
        out.warning("Not signed in. Run `lendsqr login` to start a fresh session.");
    }

    let mut dashboard = prepare_dashboard(app, &args).await?;
    if args.page != dashboard.current_page() {
        out.warning(format!(
            "Page {} does not exist, showing page {} of {}",
            args.page,
            dashboard.current_page(),
            dashboard.total_pages()
        ));
    }

    if args.json {
        let json = serde_json::to_string_pretty(&dashboard.visible_users())
            .context("Failed to serialize users")?;
        out.print(json);
        return Ok(());
    }

    if args.interactive {
        browse(app, &out, &mut dashboard).await?;
    } else {
        out.print(dashboard_report(&dashboard, true));
    }
    dashboard.unmount();
    Ok(())
}

/// Loads the dashboard and applies the page size, filter and page from `args`.
///
/// A page outside the filtered range is ignored, leaving page 1.
pub async fn prepare_dashboard(app: &AppContext, args: &UsersArgs) -> Result<Dashboard> {
    let mut dashboard = app.dashboard();
    dashboard.load().await;
    if let LoadPhase::Error(message) = dashboard.phase() {
        bail!("{message}");
    }

    dashboard.set_page_size(args.page_size);
    dashboard.apply_filter(args.filter());
    if args.page != 1 {
        dashboard.go_to_page(args.page);
    }
    Ok(dashboard)
}

/// Everything the users screen shows for the current state, as text.
pub fn dashboard_report(dashboard: &Dashboard, colored: bool) -> String {
    let stats = dashboard.stats();
    let visible = dashboard.visible_users();
    let filtered = dashboard.filtered_users().len();

    let mut lines = vec![
        "Users".to_owned(),
        format!("  {:<20} {}", "USERS", stats.total_users),
        format!("  {:<20} {}", "ACTIVE USERS", stats.active_users),
        format!("  {:<20} {}", "USERS WITH LOANS", stats.users_with_loans),
        format!("  {:<20} {}", "USERS WITH SAVINGS", stats.users_with_savings),
        String::new(),
    ];

    if !dashboard.filter().is_empty() {
        lines.push(format!("Filter: {}", describe_filter(dashboard.filter())));
    }

    if visible.is_empty() {
        lines.push("No users match the current filters.".to_owned());
    } else {
        lines.push(users_table(&visible, colored));
    }

    lines.push(format!(
        "Showing {} out of {filtered} · {} per page",
        visible.len(),
        dashboard.page_size()
    ));
    if dashboard.total_pages() > 1 {
        lines.push(pagination_bar(
            &dashboard.page_items(),
            dashboard.current_page(),
            colored,
        ));
    }
    lines.join("\n")
}

fn describe_filter(filter: &UserFilter) -> String {
    let mut parts = Vec::new();
    if let Some(organization) = &filter.organization {
        parts.push(format!("organization = {organization}"));
    }
    if let Some(username) = &filter.username {
        parts.push(format!("username ~ {username}"));
    }
    if let Some(email) = &filter.email {
        parts.push(format!("email ~ {email}"));
    }
    if let Some(date) = filter.date_joined {
        parts.push(format!("joined on {date}"));
    }
    if let Some(phone_number) = &filter.phone_number {
        parts.push(format!("phone ~ {phone_number}"));
    }
    if let Some(status) = filter.status {
        parts.push(format!("status = {status}"));
    }
    parts.join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    NextPage,
    PreviousPage,
    GoToPage,
    PageSize,
    Filter,
    ResetFilter,
    OpenRow,
    Quit,
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NextPage => "Next page",
            Self::PreviousPage => "Previous page",
            Self::GoToPage => "Go to page…",
            Self::PageSize => "Rows per page…",
            Self::Filter => "Filter…",
            Self::ResetFilter => "Reset filter",
            Self::OpenRow => "Open a row…",
            Self::Quit => "Quit",
        })
    }
}

fn available_actions(dashboard: &Dashboard) -> Vec<BrowseAction> {
    let mut actions = Vec::new();
    if dashboard.current_page() < dashboard.total_pages() {
        actions.push(BrowseAction::NextPage);
    }
    if dashboard.current_page() > 1 {
        actions.push(BrowseAction::PreviousPage);
    }
    if dashboard.total_pages() > 1 {
        actions.push(BrowseAction::GoToPage);
    }
    actions.push(BrowseAction::PageSize);
    actions.push(BrowseAction::Filter);
    if !dashboard.filter().is_empty() {
        actions.push(BrowseAction::ResetFilter);
    }
    if !dashboard.visible_users().is_empty() {
        actions.push(BrowseAction::OpenRow);
    }
    actions.push(BrowseAction::Quit);
    actions
}

#[instrument(skip_all, name = "browse")]
async fn browse(app: &AppContext, out: &Output, dashboard: &mut Dashboard) -> Result<()> {
    loop {
        out.newline();
        out.print(dashboard_report(dashboard, true));
        out.newline();

        let Some(action) = Select::new("Action:", available_actions(dashboard))
            .with_help_message("Use arrow keys to navigate, Enter to select, Esc to quit")
            .prompt_skippable()
            .context("Failed to select action")?
        else {
            return Ok(());
        };

        match action {
            BrowseAction::NextPage => {
                dashboard.next_page();
            }
            BrowseAction::PreviousPage => {
                dashboard.previous_page();
            }
            BrowseAction::GoToPage => {
                let total = dashboard.total_pages();
                let page = Text::new(&format!("Page (1-{total}):"))
                    .prompt()
                    .context("Failed to read page")?;
                let moved = page
                    .trim()
                    .parse::<usize>()
                    .is_ok_and(|page| dashboard.go_to_page(page));
                if !moved {
                    out.warning(format!("`{}` is not a page between 1 and {total}", page.trim()));
                }
            }
            BrowseAction::PageSize => {
                if let Some(size) = Select::new("Rows per page:", PageSize::ALL.to_vec())
                    .with_starting_cursor(
                        PageSize::ALL
                            .iter()
                            .position(|size| *size == dashboard.page_size())
                            .unwrap_or_default(),
                    )
                    .prompt_skippable()
                    .context("Failed to select page size")?
                {
                    dashboard.set_page_size(size);
                }
            }
            BrowseAction::Filter => edit_filter(dashboard)?,
            BrowseAction::ResetFilter => dashboard.reset_filter(),
            BrowseAction::OpenRow => open_row(app, out, dashboard).await?,
            BrowseAction::Quit => return Ok(()),
        }
    }
}

fn edit_filter(dashboard: &mut Dashboard) -> Result<()> {
    let Some(column) = Select::new("Filter by:", FilterColumn::ALL.to_vec())
        .prompt_skippable()
        .context("Failed to select filter column")?
    else {
        return Ok(());
    };
    dashboard.toggle_filter_panel(column);

    let current = dashboard.filter().clone();
    let updated = match column {
        FilterColumn::Organization => {
            Select::new("Organization:", dashboard.organizations())
                .prompt_skippable()
                .context("Failed to select organization")?
                .map(|organization| current.with_organization(organization))
        }
        FilterColumn::Status => Select::new("Status:", UserStatus::ALL.to_vec())
            .prompt_skippable()
            .context("Failed to select status")?
            .map(|status| current.with_status(status)),
        FilterColumn::DateJoined => {
            let raw = Text::new("Date joined (YYYY-MM-DD):")
                .prompt()
                .context("Failed to read date")?;
            match raw.trim().parse::<NaiveDate>() {
                Ok(date) => Some(current.with_date_joined(date)),
                Err(e) => {
                    warn!("ignoring date filter `{raw}`: {e}");
                    None
                }
            }
        }
        FilterColumn::Username => Some(current.with_username(prompt_text(column)?)),
        FilterColumn::Email => Some(current.with_email(prompt_text(column)?)),
        FilterColumn::PhoneNumber => Some(current.with_phone_number(prompt_text(column)?)),
    };

    match updated {
        Some(filter) => dashboard.apply_filter(filter),
        None => dashboard.close_filter_panel(),
    }
    Ok(())
}

fn prompt_text(column: FilterColumn) -> Result<String> {
    Text::new(&format!("{column}:"))
        .with_help_message("Leave empty to clear this field")
        .prompt()
        .context("Failed to read filter value")
}

async fn open_row(app: &AppContext, out: &Output, dashboard: &mut Dashboard) -> Result<()> {
    let rows: Vec<RowChoice> = dashboard
        .visible_users()
        .iter()
        .map(|user| RowChoice {
            id: user.id.clone(),
            label: format!("{:>4}  {}  <{}>", user.id, user.username, user.email),
        })
        .collect();

    let Some(row) = Select::new("User:", rows)
        .prompt_skippable()
        .context("Failed to select user")?
    else {
        return Ok(());
    };

    dashboard.toggle_action_menu(&row.id);
    let action = Select::new("Row action:", RowAction::ALL.to_vec())
        .prompt_skippable()
        .context("Failed to select row action")?;

    let Some(action) = action else {
        // Escaping the menu counts as a click elsewhere.
        dashboard.emit_interaction(Interaction::OutsideClick);
        dashboard.pump_interactions();
        return Ok(());
    };

    match dashboard.perform_row_action(&row.id, action) {
        RowActionOutcome::ShowDetails(id) => {
            let user = find_user(&app.cache, &app.api, &id.to_string()).await?;
            out.newline();
            print_user(out, &user);
        }
        RowActionOutcome::Unsupported(action) => {
            out.warning(format!("{action} is not available yet"));
        }
    }
    Ok(())
}

struct RowChoice {
    id: UserId,
    label: String,
}

impl fmt::Display for RowChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
