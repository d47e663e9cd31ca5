//! End-to-end dashboard flow: sign in, load, filter, paginate, open details.

use std::sync::Arc;

use chrono::NaiveDate;
use lendsqr_business::{
    Dashboard, FileStore, Interaction, KeyValueStore, LoadPhase, PageItem, PageSize, RowAction,
    RowActionOutcome, Session, USERS_CACHE_KEY, User, UserFilter, UserStatus, UsersApi,
    UsersCache, find_user,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const ORGANIZATIONS: [&str; 3] = ["Lendsqr", "Irorun", "Lendstar"];

/// 25 users; ids 3, 7, 11, 15, 19, 23 are Active.
fn users_json() -> Value {
    let users: Vec<Value> = (1..=25u32)
        .map(|id| {
            let status = if id % 4 == 3 { "Active" } else { "Inactive" };
            json!({
                "id": id,
                "organization": ORGANIZATIONS[(id % 3) as usize],
                "username": format!("user{id}"),
                "email": format!("user{id}@example.com"),
                "phoneNumber": format!("0803{id:07}"),
                "dateJoined": format!("2024-03-{:02}T23:59:00", id % 28 + 1),
                "status": status
            })
        })
        .collect();
    Value::Array(users)
}

struct Harness {
    server: MockServer,
    _dir: tempfile::TempDir,
    store: Arc<dyn KeyValueStore>,
}

impl Harness {
    async fn new() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_json()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
        Self {
            server,
            _dir: dir,
            store,
        }
    }

    fn api(&self) -> UsersApi {
        UsersApi::new(self.server.uri())
    }

    fn cache(&self) -> UsersCache {
        UsersCache::new(self.store.clone())
    }

    fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.api(), self.cache())
    }

    async fn requests(&self) -> usize {
        self.server.received_requests().await.unwrap().len()
    }
}

#[tokio::test]
async fn test_first_load_fetches_then_cache_serves() {
    let harness = Harness::new().await;

    let mut dashboard = harness.dashboard();
    dashboard.load().await;
    assert_eq!(dashboard.phase(), &LoadPhase::Ready);
    assert_eq!(dashboard.users().len(), 25);
    assert!(harness.store.get(USERS_CACHE_KEY).unwrap().is_some());

    let mut again = harness.dashboard();
    again.load().await;
    assert_eq!(again.users(), dashboard.users());
    assert_eq!(harness.requests().await, 1);
}

#[tokio::test]
async fn test_sign_in_forces_fresh_fetch() {
    let harness = Harness::new().await;
    harness.dashboard().load().await;

    let session = Session::new(harness.store.clone());
    session.sign_in("admin@lendsqr.com").unwrap();
    assert!(session.is_authenticated());
    assert_eq!(harness.cache().load(), None);

    harness.dashboard().load().await;
    assert_eq!(harness.requests().await, 2);
}

#[tokio::test]
async fn test_active_filter_fits_one_page() {
    let harness = Harness::new().await;
    let mut dashboard = harness.dashboard();
    dashboard.load().await;

    let stats = dashboard.stats();
    assert_eq!(stats.total_users, 25);
    assert_eq!(stats.active_users, 6);
    assert_eq!(stats.users_with_loans, 6);
    assert_eq!(stats.users_with_savings, 4);

    dashboard.apply_filter(UserFilter::new().with_status(UserStatus::Active));

    let ids: Vec<String> = dashboard
        .visible_users()
        .iter()
        .map(|user| user.id.to_string())
        .collect();
    assert_eq!(ids, ["3", "7", "11", "15", "19", "23"]);
    assert_eq!(dashboard.total_pages(), 1);
    assert_eq!(dashboard.page_items(), vec![PageItem::Page(1)]);
}

#[tokio::test]
async fn test_date_filter_ignores_time_of_day() {
    let harness = Harness::new().await;
    let mut dashboard = harness.dashboard();
    dashboard.load().await;

    // User 4 joined 2024-03-05 at 23:59.
    let march_5 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    dashboard.apply_filter(UserFilter::new().with_date_joined(march_5));
    let visible: Vec<&User> = dashboard.visible_users();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].username, "user4");

    let march_6 = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
    dashboard.apply_filter(UserFilter::new().with_date_joined(march_6));
    assert_eq!(dashboard.visible_users()[0].username, "user5");
}

#[tokio::test]
async fn test_pagination_walk() {
    let harness = Harness::new().await;
    let mut dashboard = harness.dashboard();
    dashboard.load().await;

    assert_eq!(dashboard.total_pages(), 3);
    assert!(dashboard.go_to_page(3));
    assert_eq!(dashboard.visible_users().len(), 5);
    assert!(!dashboard.next_page());

    dashboard.set_page_size(PageSize::Hundred);
    assert_eq!(dashboard.current_page(), 1);
    assert_eq!(dashboard.visible_users().len(), 25);
}

#[tokio::test]
async fn test_row_menu_to_detail() {
    let harness = Harness::new().await;
    let mut dashboard = harness.dashboard();
    dashboard.load().await;

    let id = dashboard.visible_users()[2].id.clone();
    dashboard.toggle_action_menu(&id);
    dashboard.emit_interaction(Interaction::FocusLost);
    assert!(dashboard.pump_interactions());
    assert!(dashboard.open_action_menu().is_none());

    dashboard.toggle_action_menu(&id);
    let RowActionOutcome::ShowDetails(target) =
        dashboard.perform_row_action(&id, RowAction::ViewDetails)
    else {
        panic!("View Details should navigate");
    };
    dashboard.unmount();

    let user = find_user(&harness.cache(), &harness.api(), &target.to_string())
        .await
        .unwrap();
    assert_eq!(user.username, "user3");
    assert_eq!(harness.requests().await, 1);
}

#[tokio::test]
async fn test_mixed_timestamp_formats_all_load() {
    let server = MockServer::start().await;
    let users: Vec<Value> = [
        "2024-03-05T23:59:00",
        "2024-03-05 10:00:00",
        "2024-03-05 08:30",
        "2024-03-05",
    ]
    .iter()
    .enumerate()
    .map(|(i, joined)| {
        json!({
            "id": i + 1,
            "organization": "Lendsqr",
            "username": format!("user{i}"),
            "email": format!("user{i}@example.com"),
            "phoneNumber": "08030000000",
            "dateJoined": joined,
            "status": "Pending"
        })
    })
    .collect();
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let mut dashboard = Dashboard::new(UsersApi::new(server.uri()), UsersCache::new(store));
    dashboard.load().await;

    assert_eq!(dashboard.phase(), &LoadPhase::Ready);
    assert_eq!(dashboard.users().len(), 4);

    dashboard.apply_filter(
        UserFilter::new().with_date_joined(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
    );
    assert_eq!(dashboard.filtered_users().len(), 4);
}
