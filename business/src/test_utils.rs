//! Test utilities for business layer testing with mock servers.
//!
//! ```ignore
//! let ctx = TestContext::new().await;
//! ctx.mock_users(sample_users(25, 6)).await;
//!
//! let mut dashboard = ctx.dashboard();
//! dashboard.load().await;
//! assert_eq!(dashboard.stats().active_users, 6);
//! ```

#![cfg(test)]

use std::sync::Arc;

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::{
    Dashboard, KeyValueStore, MemoryStore, UsersApi, UsersCache,
    user::{JoinedAt, User, UserDetails, UserId, UserStatus},
};

const ORGANIZATIONS: [&str; 3] = ["Lendsqr", "Irorun", "Lendstar"];
const INACTIVE_STATUSES: [UserStatus; 3] = [
    UserStatus::Inactive,
    UserStatus::Pending,
    UserStatus::Blacklisted,
];

/// A user with id `n` and fields derived from it.
pub fn sample_user(n: u64) -> User {
    let index = usize::try_from(n).unwrap_or_default();
    let day = u32::try_from(n % 28).unwrap_or_default() + 1;
    User {
        id: UserId::Number(n),
        organization: ORGANIZATIONS[index % ORGANIZATIONS.len()].to_owned(),
        username: format!("user{n}"),
        email: format!("user{n}@example.com"),
        phone_number: format!("0803{n:07}"),
        date_joined: JoinedAt::Local(
            chrono::NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        ),
        status: INACTIVE_STATUSES[index % INACTIVE_STATUSES.len()],
        details: UserDetails::default(),
    }
}

/// `count` users with ids `1..=count`, exactly `active` of them Active and
/// spread evenly through the list.
pub fn sample_users(count: usize, active: usize) -> Vec<User> {
    (0..count)
        .map(|i| {
            let mut user = sample_user(i as u64 + 1);
            if i * active / count != (i + 1) * active / count {
                user.status = UserStatus::Active;
            }
            user
        })
        .collect()
}

/// A mock server plus clients wired to it and an in-memory store.
pub struct TestContext {
    pub mock_server: MockServer,
    pub api: UsersApi,
    pub store: Arc<dyn KeyValueStore>,
    pub cache: UsersCache,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let api = UsersApi::new(mock_server.uri());
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let cache = UsersCache::new(store.clone());
        Self {
            mock_server,
            api,
            store,
            cache,
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.api.clone(), self.cache.clone())
    }

    /// Serves `users` as a bare array from `GET /users`.
    pub async fn mock_users(&self, users: Vec<User>) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_users_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_user(&self, user: &User) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}", user.id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.mock_server)
            .await;
    }

    /// Number of requests the server has received so far.
    pub async fn request_count(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

#[test]
fn test_sample_users_active_count() {
    for (count, active) in [(25, 6), (10, 0), (4, 4), (7, 3)] {
        let users = sample_users(count, active);
        let actual = users
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .count();
        assert_eq!(users.len(), count);
        assert_eq!(actual, active);
    }
}
