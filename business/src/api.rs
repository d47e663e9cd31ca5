//! Users API client.
//!
//! Talks to a json-server style backend:
//! - `GET /users` with optional `_page`, `_per_page` and field filters
//! - `GET /users/{id}`
//!
//! The list endpoint answers either with a paginated envelope
//! (`{ "data": [...], "items": N, ... }`) or with a bare array, depending on
//! whether pagination was requested. Both are normalized into [`UsersPage`].

use log::{error, info};
use reqwest::Url;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{Client, Response};
use crate::user::User;

const USERS_FALLBACK: &str = "Failed to fetch users";
const USER_DETAILS_FALLBACK: &str = "Failed to fetch user details";

/// One page of users plus the collection size the server reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersPage {
    pub records: Vec<User>,
    pub total: usize,
}

impl UsersPage {
    /// Normalizes whichever list shape the server returned.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let decode = |records: Value| {
            serde_json::from_value::<Vec<User>>(records).map_err(|e| ApiError::decode("users", e))
        };

        match value {
            Value::Object(mut envelope) if envelope.get("data").is_some_and(Value::is_array) => {
                let reported = envelope
                    .get("items")
                    .and_then(Value::as_u64)
                    .filter(|&items| items > 0);
                let records = decode(envelope.remove("data").unwrap_or_default())?;
                let total = reported
                    .and_then(|items| usize::try_from(items).ok())
                    .unwrap_or(records.len());
                Ok(Self { records, total })
            }
            Value::Array(_) => {
                let records = decode(value)?;
                Ok(Self {
                    total: records.len(),
                    records,
                })
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Client for the users endpoints. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: Client,
    base_url: String,
}

impl UsersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `/users`
    ///
    /// `page` is clamped to at least 1. Filter pairs with an empty value are
    /// not sent.
    pub async fn fetch_users(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
        filters: &[(String, String)],
    ) -> Result<UsersPage, ApiError> {
        let url = format!("{}/users", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(page) = page {
            request = request.query("_page", page.max(1).to_string());
        }
        if let Some(per_page) = per_page {
            request = request.query("_per_page", per_page.to_string());
        }
        for (name, value) in filters.iter().filter(|(_, value)| !value.is_empty()) {
            request = request.query(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            error!("Fetching users from {url} failed: {e}");
            ApiError::network(e.message)
        })?;
        let body = success_json(response, USERS_FALLBACK)?;

        let page = UsersPage::from_value(body)?;
        info!(
            "Fetched {} user(s), {} reported in total",
            page.records.len(),
            page.total
        );
        Ok(page)
    }

    /// GET `/users/{id}`
    ///
    /// A `null` body or a 404 means the user does not exist.
    pub async fn fetch_user_by_id(&self, id: &str) -> Result<User, ApiError> {
        let url = self.user_url(id.trim())?;

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Fetching user {id} from {url} failed: {e}");
            ApiError::network(e.message)
        })?;

        if response.status == 404 {
            return Err(ApiError::NotFound { id: id.to_owned() });
        }
        match success_json(response, USER_DETAILS_FALLBACK)? {
            Value::Null => Err(ApiError::NotFound { id: id.to_owned() }),
            body => serde_json::from_value(body).map_err(|e| ApiError::decode("user", e)),
        }
    }

    /// `{base}/users/{id}` with `id` percent-encoded as a single segment.
    fn user_url(&self, id: &str) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            error!("Invalid users API base URL `{}`: {e}", self.base_url);
            ApiError::network(e.to_string())
        })?;
        url.path_segments_mut()
            .map_err(|()| ApiError::network(format!("`{}` cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["users", id]);
        Ok(url.into())
    }
}

fn success_json(response: Response, fallback: &str) -> Result<Value, ApiError> {
    if !response.is_success() {
        let err = ApiError::http(response.status, response.reason, fallback);
        error!("{err}");
        return Err(err);
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    response.json().map_err(|e| ApiError::decode("response body", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_user(id: u64) -> Value {
        json!({
            "id": id,
            "organization": "Lendsqr",
            "username": format!("user{id}"),
            "email": format!("user{id}@lendsqr.com"),
            "phoneNumber": "08012345678",
            "dateJoined": "2024-03-05T10:00:00",
            "status": "Active"
        })
    }

    #[test]
    fn test_envelope_uses_reported_items() {
        let page = UsersPage::from_value(json!({
            "first": 1,
            "items": 500,
            "data": [raw_user(1), raw_user(2)]
        }))
        .unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total, 500);
    }

    #[test]
    fn test_envelope_without_items_counts_data() {
        let page = UsersPage::from_value(json!({ "data": [raw_user(1)], "items": 0 })).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_bare_array() {
        let page = UsersPage::from_value(json!([raw_user(1), raw_user(2), raw_user(3)])).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.records[2].username, "user3");
    }

    #[test]
    fn test_other_shapes_are_empty() {
        for value in [json!({}), json!({ "data": "nope" }), json!(null), json!(42)] {
            assert_eq!(UsersPage::from_value(value).unwrap(), UsersPage::default());
        }
    }

    #[test]
    fn test_bad_record_is_decode_error() {
        let err = UsersPage::from_value(json!([{ "id": 1 }])).unwrap_err();
        assert!(matches!(err, ApiError::Decode { what: "users", .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_dropped() {
        assert_eq!(
            UsersApi::new("http://localhost:3000/").base_url(),
            "http://localhost:3000"
        );
    }
}
