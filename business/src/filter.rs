//! Client-side user filtering.
//!
//! Every field of a [`UserFilter`] is optional; set fields are AND-ed and an
//! empty filter matches every user.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::user::{User, UserStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Exact match.
    pub organization: Option<String>,
    /// Case-insensitive substring.
    pub username: Option<String>,
    /// Case-insensitive substring.
    pub email: Option<String>,
    /// Same local calendar day, time of day ignored.
    pub date_joined: Option<NaiveDate>,
    /// Case-sensitive substring.
    pub phone_number: Option<String>,
    /// Exact match.
    pub status: Option<UserStatus>,
}

// Blank input means "no constraint", as with an untouched form field.
fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.trim().is_empty()).then_some(value)
}

impl UserFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = non_blank(organization);
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = non_blank(username);
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email);
        self
    }

    #[must_use]
    pub fn with_date_joined(mut self, date: NaiveDate) -> Self {
        self.date_joined = Some(date);
        self
    }

    #[must_use]
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = non_blank(phone_number);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        let Self {
            organization,
            username,
            email,
            date_joined,
            phone_number,
            status,
        } = self;
        [organization, username, email, phone_number]
            .iter()
            .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
            && date_joined.is_none()
            && status.is_none()
    }

    pub fn matches(&self, user: &User) -> bool {
        fn set(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|v| !v.trim().is_empty())
        }
        fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        if set(&self.organization).is_some_and(|org| user.organization != org) {
            return false;
        }
        if set(&self.username).is_some_and(|name| !contains_ignore_case(&user.username, name)) {
            return false;
        }
        if set(&self.email).is_some_and(|email| !contains_ignore_case(&user.email, email)) {
            return false;
        }
        if self
            .date_joined
            .is_some_and(|date| user.date_joined.local_date() != date)
        {
            return false;
        }
        if set(&self.phone_number).is_some_and(|phone| !user.phone_number.contains(phone)) {
            return false;
        }
        if self.status.is_some_and(|status| user.status != status) {
            return false;
        }
        true
    }

    /// Query pairs for server-side filtering, keyed by the API's field names.
    ///
    /// Unset fields are left out.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let text_fields = [
            ("organization", &self.organization),
            ("username", &self.username),
            ("email", &self.email),
        ];
        let mut pairs: Vec<(String, String)> = text_fields
            .into_iter()
            .filter_map(|(key, value)| Some((key.to_owned(), value.clone()?)))
            .collect();

        if let Some(date) = self.date_joined {
            pairs.push(("dateJoined".to_owned(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(phone) = &self.phone_number {
            pairs.push(("phoneNumber".to_owned(), phone.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_owned(), status.as_str().to_owned()));
        }
        pairs
    }
}

/// Users matching `filter`, in their original order.
pub fn filter_users<'a>(users: &'a [User], filter: &UserFilter) -> Vec<&'a User> {
    users.iter().filter(|user| filter.matches(user)).collect()
}

/// Distinct organizations, sorted, for the organization picker.
pub fn organizations(users: &[User]) -> Vec<String> {
    users
        .iter()
        .map(|user| user.organization.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
