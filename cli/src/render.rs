//! Plain-text renderings of dashboard data.
//!
//! Kept free of terminal I/O so commands can print them and tests can assert
//! on them.

use console::style;
use lendsqr_business::{Children, JoinedAt, PageItem, User};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::output::status_badge;

/// Join time in the local zone, e.g. `Mar 05, 2024, 11:59 PM`.
pub fn format_joined(joined: &JoinedAt) -> String {
    joined
        .local_datetime()
        .format("%b %d, %Y, %I:%M %p")
        .to_string()
}

/// Naira amount with thousands separators and up to three decimals.
pub fn format_naira(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{sign}₦{grouped}")
    } else {
        format!("{sign}₦{grouped}.{fraction}")
    }
}

/// Three-star tier rating.
pub fn tier_stars(tier: u8) -> String {
    (0..3u8)
        .map(|i| if i < tier { '★' } else { '☆' })
        .collect()
}

pub fn children_label(children: &Children) -> String {
    match children {
        Children::Count(0) => "None".to_owned(),
        Children::Text(text) if text.trim().is_empty() => "None".to_owned(),
        other => other.to_string(),
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Organization")]
    organization: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone number")]
    phone_number: String,
    #[tabled(rename = "Date joined")]
    date_joined: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl UserRow {
    fn new(user: &User, colored: bool) -> Self {
        Self {
            id: user.id.to_string(),
            organization: user.organization.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            date_joined: format_joined(&user.date_joined),
            status: if colored {
                status_badge(user.status)
            } else {
                user.status.to_string()
            },
        }
    }
}

/// The users table for one page.
///
/// `colored` adds ANSI colors to the status column.
pub fn users_table(users: &[&User], colored: bool) -> String {
    let rows: Vec<UserRow> = users
        .iter()
        .map(|user| UserRow::new(user, colored))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// `‹ 1 [2] 3 … 10 ›`, with the current page bracketed and highlighted when
/// `colored`.
pub fn pagination_bar(items: &[PageItem], current: usize, colored: bool) -> String {
    let mut parts = vec!["‹".to_owned()];
    parts.extend(items.iter().map(|item| match *item {
        PageItem::Page(page) if page == current => {
            let label = format!("[{page}]");
            if colored {
                style(label).cyan().bold().to_string()
            } else {
                label
            }
        }
        PageItem::Page(page) => page.to_string(),
        PageItem::Ellipsis => "…".to_owned(),
    }));
    parts.push("›".to_owned());
    parts.join(" ")
}

/// A titled group of label/value pairs on the user detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
}

impl DetailSection {
    fn new(title: impl Into<String>, fields: Vec<(&'static str, String)>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// Sections of the detail view, in display order. Sections the server did
/// not send are left out, except personal information, which always has the
/// user row's own fields.
pub fn detail_sections(user: &User) -> Vec<DetailSection> {
    let details = &user.details;
    let profile = details.profile.clone().unwrap_or_default();

    let mut sections = vec![DetailSection::new(
        "Personal Information",
        vec![
            ("Full Name", profile.full_name),
            ("Username", user.username.clone()),
            ("Phone Number", user.phone_number.clone()),
            ("Email Address", user.email.clone()),
            ("Bvn", profile.bvn),
            ("Gender", profile.gender),
            ("Marital Status", profile.marital_status),
            ("Children", children_label(&profile.children)),
            ("Type of Residence", profile.residence_type),
        ],
    )];

    if let Some(work) = &details.education_employment {
        sections.push(DetailSection::new(
            "Education and Employment",
            vec![
                ("Level of Education", work.education_level.clone()),
                ("Employment Status", work.employment_status.clone()),
                ("Sector of Employment", work.employment_sector.clone()),
                ("Duration of Employment", work.employment_duration.clone()),
                ("Office Email", work.office_email.clone()),
                (
                    "Monthly Income",
                    format!(
                        "{} - {}",
                        format_naira(work.monthly_income.min),
                        format_naira(work.monthly_income.max)
                    ),
                ),
                ("Loan Repayment", format_naira(work.loan_repayment)),
            ],
        ));
    }

    if let Some(socials) = &details.socials {
        sections.push(DetailSection::new(
            "Socials",
            vec![
                ("Twitter", socials.twitter.clone()),
                ("Facebook", socials.facebook.clone()),
                ("Instagram", socials.instagram.clone()),
            ],
        ));
    }

    for (i, guarantor) in details.guarantors.iter().enumerate() {
        let title = if details.guarantors.len() == 1 {
            "Guarantor".to_owned()
        } else {
            format!("Guarantor {}", i + 1)
        };
        sections.push(DetailSection::new(
            title,
            vec![
                ("Full Name", guarantor.full_name.clone()),
                ("Phone Number", guarantor.phone_number.clone()),
                ("Email Address", guarantor.email.clone()),
                ("Relationship", guarantor.relationship.clone()),
            ],
        ));
    }

    sections
}

/// `₦200,000 · 9912345678/Providus Bank`, or `None` without account data.
pub fn account_summary(user: &User) -> Option<String> {
    user.details.account.as_ref().map(|account| {
        format!(
            "{} · {}/{}",
            format_naira(account.balance),
            account.account_number,
            account.bank_name
        )
    })
}
