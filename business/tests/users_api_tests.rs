//! Users API client against a mock json-server.

use lendsqr_business::{ApiError, UserFilter, UserId, UserStatus, UsersApi};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn raw_user(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "organization": "Lendsqr",
        "username": format!("user{id}"),
        "email": format!("user{id}@lendsqr.com"),
        "phoneNumber": "08012345678",
        "dateJoined": "2024-03-05T23:59:00",
        "status": status
    })
}

async fn server_with(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_all_users_bare_array() {
    let server = server_with(
        ResponseTemplate::new(200).set_body_json(json!([
            raw_user(1, "Active"),
            raw_user(2, "Pending")
        ])),
    )
    .await;
    let api = UsersApi::new(server.uri());

    let page = api.fetch_users(None, None, &[]).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.records[0].id, UserId::Number(1));
    assert_eq!(page.records[1].status, UserStatus::Pending);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_paginated_envelope_sends_page_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("_page", "1"))
        .and(query_param("_per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first": 1,
            "prev": null,
            "next": 2,
            "last": 50,
            "pages": 50,
            "items": 500,
            "data": [raw_user(1, "Active")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let api = UsersApi::new(server.uri());

    // Page 0 is clamped to 1.
    let page = api.fetch_users(Some(0), Some(10), &[]).await.unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.total, 500);
}

#[tokio::test]
async fn test_filters_forwarded_verbatim_and_empty_skipped() {
    let server = server_with(ResponseTemplate::new(200).set_body_json(json!([]))).await;
    let api = UsersApi::new(server.uri());

    let mut filters = UserFilter::new()
        .with_organization("Lendsqr")
        .with_status(UserStatus::Active)
        .to_query_pairs();
    filters.push(("email".to_owned(), String::new()));

    api.fetch_users(None, None, &filters).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("organization=Lendsqr&status=Active")
    );
}

#[tokio::test]
async fn test_unexpected_shape_is_empty_page() {
    let server =
        server_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "hi" }))).await;
    let api = UsersApi::new(server.uri());

    let page = api.fetch_users(None, None, &[]).await.unwrap();

    assert!(page.records.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_server_error_message() {
    let server = server_with(ResponseTemplate::new(503)).await;
    let api = UsersApi::new(server.uri());

    let err = api.fetch_users(None, None, &[]).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP Error 503: Service Unavailable");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on the discard port.
    let api = UsersApi::new("http://127.0.0.1:9");

    let err = api.fetch_users(None, None, &[]).await.unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(
        err.to_string(),
        "Network error: Please check if the API server is running."
    );
}

#[tokio::test]
async fn test_fetch_user_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "organization": "Irorun",
            "username": "Grace",
            "email": "grace@irorun.com",
            "phoneNumber": "07060780922",
            "dateJoined": "2020-04-30T10:00:00Z",
            "status": "Blacklisted",
            "account": { "balance": 200000.0, "bankName": "Providus Bank", "accountNumber": "9912345678" },
            "socials": { "twitter": "@grace_effiom" }
        })))
        .mount(&server)
        .await;
    let api = UsersApi::new(server.uri());

    let user = api.fetch_user_by_id("3").await.unwrap();

    assert_eq!(user.username, "Grace");
    let account = user.details.account.unwrap();
    assert_eq!(account.bank_name, "Providus Bank");
    assert_eq!(user.details.socials.unwrap().facebook, "");
}

#[tokio::test]
async fn test_fetch_user_by_id_encodes_the_id_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/a%2Fb%3Fc%23d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_user(9, "Active")))
        .expect(1)
        .mount(&server)
        .await;
    let api = UsersApi::new(server.uri());

    let user = api.fetch_user_by_id("a/b?c#d").await.unwrap();

    assert_eq!(user.username, "user9");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_fetch_user_by_id_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    let api = UsersApi::new(server.uri());

    let null_body = api.fetch_user_by_id("8").await.unwrap_err();
    let not_found = api.fetch_user_by_id("9").await.unwrap_err();

    assert_eq!(null_body, ApiError::NotFound { id: "8".to_owned() });
    assert_eq!(not_found, ApiError::NotFound { id: "9".to_owned() });
}

#[tokio::test]
async fn test_fetch_user_by_id_server_error_uses_detail_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(599))
        .mount(&server)
        .await;
    let api = UsersApi::new(server.uri());

    let err = api.fetch_user_by_id("1").await.unwrap_err();

    assert_eq!(err.to_string(), "HTTP Error 599: Failed to fetch user details");
}
