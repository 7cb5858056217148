//! Request executor behaviour against a mock backend
//!
//! Covers header negotiation, credential attachment per session state, and
//! classification of success / failure bodies.

mod helpers;

use helpers::{client_for, header, token_client, user_json, TEST_TOKEN};
use mqlm_admin::api::{RequestBody, ResponseBody, User};
use mqlm_admin::{AdminClient, AdminError, ClientConfig, Credential, CredentialStore};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_token_session_sends_bearer_and_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header_is("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(header_is("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json(1, "alice")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = token_client(&server).list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");
}

#[tokio::test]
async fn test_logged_out_and_no_auth_sessions_send_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    client_for(&server, CredentialStore::in_memory())
        .list_users()
        .await
        .unwrap();
    client_for(&server, CredentialStore::from_credential(Credential::NoAuthMode))
        .list_users()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(header(request, "authorization"), None);
        assert_eq!(header(request, "accept").as_deref(), Some("application/json"));
    }
}

#[tokio::test]
async fn test_blank_token_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = CredentialStore::from_credential(Credential::Token(String::new()));
    assert!(!session.is_logged_in());
    client_for(&server, session).list_users().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(header(&requests[0], "authorization"), None);
}

#[tokio::test]
async fn test_get_sends_no_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    token_client(&server).list_packages().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(header(&requests[0], "content-type"), None);
}

#[tokio::test]
async fn test_credential_is_read_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "time": "now"})),
        )
        .mount(&server)
        .await;

    let session = CredentialStore::in_memory();
    let client = client_for(&server, session.clone());

    session.set_credential(Some("first")).unwrap();
    client.health().await.unwrap();
    session.set_credential(Some("second")).unwrap();
    client.health().await.unwrap();
    session.clear().unwrap();
    client.health().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let auth: Vec<Option<String>> = requests.iter().map(|r| header(r, "authorization")).collect();
    assert_eq!(
        auth,
        vec![
            Some("Bearer first".to_string()),
            Some("Bearer second".to_string()),
            None
        ]
    );
}

#[tokio::test]
async fn test_json_error_message_is_surfaced_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "user not found"})))
        .mount(&server)
        .await;

    let err = token_client(&server).get_user(99).await.unwrap_err();
    assert_eq!(err.to_string(), "user not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_plain_text_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let request = mqlm_admin::api::CreateUserRequest::new("", "");
    let err = token_client(&server).create_user(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "bad request");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"detail": "upstream"})))
        .mount(&server)
        .await;

    let client = token_client(&server);
    assert_eq!(client.delete_user(1).await.unwrap_err().to_string(), "API error");
    assert_eq!(client.delete_user(2).await.unwrap_err().to_string(), "API error");
}

#[tokio::test]
async fn test_plain_text_error_keeps_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/3"))
        .respond_with(ResponseTemplate::new(409).set_body_string("  locked: try later \n"))
        .mount(&server)
        .await;

    let err = token_client(&server).get_user(3).await.unwrap_err();
    assert_eq!(err.to_string(), "  locked: try later ");
}

#[tokio::test]
async fn test_unauthorized_is_an_ordinary_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "unauthorized"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, CredentialStore::in_memory())
        .list_users()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdminError::Api { status: 401, ref message } if message == "unauthorized"
    ));
}

#[tokio::test]
async fn test_text_body_for_typed_operation_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = token_client(&server).list_users().await.unwrap_err();
    assert!(matches!(err, AdminError::UnexpectedResponse(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/packages/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    token_client(&server).delete_package(3).await.unwrap();
}

#[tokio::test]
async fn test_execute_returns_tagged_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1.2.3"))
        .mount(&server)
        .await;

    let client = token_client(&server);
    let json_body = client
        .execute(Method::GET, "/api/health", RequestBody::None)
        .await
        .unwrap();
    assert_eq!(json_body, ResponseBody::Json(json!({"ok": true})));

    let text_body = client
        .execute(Method::GET, "/api/version", RequestBody::None)
        .await
        .unwrap();
    assert_eq!(text_body, ResponseBody::Text("1.2.3".to_string()));
}

#[tokio::test]
async fn test_execute_typed_and_unit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "alice")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/custom"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let client = token_client(&server);
    let user: User = client
        .execute_typed(Method::GET, "/api/users/1", RequestBody::None)
        .await
        .unwrap();
    assert_eq!(user.username, "alice");

    client
        .execute_unit(
            Method::POST,
            "/api/custom",
            RequestBody::json(&json!({"x": 1})).unwrap(),
        )
        .await
        .unwrap();

    let err = client
        .execute_typed::<User>(Method::POST, "/api/custom", RequestBody::None)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Port 1 is reserved and nothing listens there.
    let client = AdminClient::new(
        &ClientConfig::new("http://127.0.0.1:1"),
        CredentialStore::in_memory(),
    )
    .unwrap();

    let err = client.health().await.unwrap_err();
    assert!(err.is_network_error(), "got {err:?}");
    assert_eq!(err.status(), None);
}
