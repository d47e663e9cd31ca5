//! Show one user's details.

use anyhow::Result;
use lendsqr_business::{User, find_user};
use tracing::instrument;

use crate::context::AppContext;
use crate::output::{Output, status_badge};
use crate::render::{account_summary, detail_sections, tier_stars};

#[instrument(skip_all, name = "user", fields(id = %id))]
pub async fn run_user(app: &AppContext, id: &str) -> Result<()> {
    let user = find_user(&app.cache, &app.api, id).await?;
    print_user(&Output::new(), &user);
    Ok(())
}

pub fn print_user(out: &Output, user: &User) {
    let profile = user.details.profile.as_ref();
    let name = profile
        .map(|p| p.full_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(user.username.as_str());

    out.header(format!("User Details: {name}"));
    out.dim(format!("{} · {}", user.username, user.organization));
    out.labeled_indent("Status", status_badge(user.status), 2);
    if let Some(profile) = profile {
        out.labeled_indent("User's Tier", tier_stars(profile.tier), 2);
    }
    if let Some(account) = account_summary(user) {
        out.labeled_indent("Account", account, 2);
    }

    for section in detail_sections(user) {
        out.newline();
        out.subheader(&section.title);
        out.divider(40);
        for (label, value) in &section.fields {
            out.labeled_indent(label, value, 2);
        }
    }
}
