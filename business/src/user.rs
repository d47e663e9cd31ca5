//! User records as served by the users API and kept in the local cache.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Identifier of a user.
///
/// The mock server hands out numeric ids, but ids also arrive as strings (route
/// parameters, hand-edited data). Ids compare loosely by their textual form via
/// [`UserId::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl UserId {
    /// Returns true if `raw` names this id, regardless of number/string shape.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            Self::Number(n) => raw.parse::<u64>().is_ok_and(|parsed| parsed == *n),
            Self::Text(text) => text == raw,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Account status shown in the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
    Blacklisted,
}

impl UserStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Inactive, Self::Pending, Self::Blacklisted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
            Self::Blacklisted => "Blacklisted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user status `{0}` (expected one of Active, Inactive, Pending, Blacklisted)")]
pub struct ParseStatusError(String);

impl FromStr for UserStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseStatusError(trimmed.to_owned()))
    }
}

/// When a user joined, kept in the shape the server sent it.
///
/// - `Offset`: an RFC 3339 instant (`2024-03-05T22:59:00Z`), converted to the
///   local zone when a local date is needed.
/// - `Local`: a wall-clock time without offset (`2024-03-05T23:59:00`, or
///   space-separated `2024-03-05 23:59:00`), taken as local time as-is.
/// - `Date`: a bare calendar date (`2024-03-05`), local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinedAt {
    Offset(DateTime<FixedOffset>),
    Local(NaiveDateTime),
    Date(NaiveDate),
}

impl JoinedAt {
    /// Calendar date of the join time in the local zone.
    pub fn local_date(&self) -> NaiveDate {
        self.local_datetime().date()
    }

    /// Wall-clock join time in the local zone.
    pub fn local_datetime(&self) -> NaiveDateTime {
        match self {
            Self::Offset(instant) => instant.with_timezone(&Local).naive_local(),
            Self::Local(naive) => *naive,
            Self::Date(date) => date.and_time(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid join timestamp `{0}`")]
pub struct ParseJoinedAtError(String);

impl FromStr for JoinedAt {
    type Err = ParseJoinedAtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Offset(instant));
        }
        for format in [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
        ] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::Local(naive));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|_| ParseJoinedAtError(s.to_owned()))
    }
}

impl fmt::Display for JoinedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(instant) => {
                f.write_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Local(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for JoinedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JoinedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A user row plus whatever detail sections the server included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub organization: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub date_joined: JoinedAt,
    pub status: UserStatus,
    #[serde(flatten)]
    pub details: UserDetails,
}

/// Optional sections of the user detail screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_employment: Option<EducationEmployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Socials>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guarantors: Vec<Guarantor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub avatar: String,
    pub tier: u8,
    pub gender: String,
    pub bvn: String,
    pub marital_status: String,
    pub children: Children,
    pub residence_type: String,
}

/// Number of children; the data set mixes counts and free text ("None").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Count(u32),
    Text(String),
}

impl Default for Children {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl fmt::Display for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub balance: f64,
    pub bank_name: String,
    pub account_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEmployment {
    pub education_level: String,
    pub employment_status: String,
    pub employment_sector: String,
    pub employment_duration: String,
    pub office_email: String,
    pub monthly_income: IncomeRange,
    pub loan_repayment: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guarantor {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub relationship: String,
}
