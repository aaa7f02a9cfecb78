#![allow(clippy::unwrap_used)]
// Operation contracts of `DeviceClient` against wiremock devices.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwadmin_core::{
    BackendKind, CoreError, Credentials, DeviceBackend, DeviceClient, DeviceConfig, Role,
};

const SYSUSERS: &str = "/api/fdm/latest/devicesettings/default/sysusers";

// ── Helpers ─────────────────────────────────────────────────────────

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn config(server: &MockServer, backend: BackendKind) -> DeviceConfig {
    let mut cfg = DeviceConfig::new(
        Url::parse(&server.uri()).unwrap(),
        backend,
        Credentials {
            username: "admin".into(),
            password: secret("Admin123"),
        },
    );
    cfg.timeout = Duration::from_secs(5);
    cfg
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/xml")
}

async fn rest_device() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fdm/latest/fdm/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "TOKEN",
            "token_type": "Bearer",
            "expires_in": 1800
        })))
        .mount(&server)
        .await;
    let client = DeviceClient::connect(&config(&server, BackendKind::Rest))
        .await
        .unwrap();
    (server, client)
}

async fn xml_device() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("type", "keygen"))
        .respond_with(xml(
            "<response status=\"success\"><result><key>KEY</key></result></response>",
        ))
        .mount(&server)
        .await;
    let client = DeviceClient::connect(&config(&server, BackendKind::Xml))
        .await
        .unwrap();
    (server, client)
}

async fn requests_with_method(server: &MockServer, verb: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == verb)
        .count()
}

// ── REST backend ────────────────────────────────────────────────────

#[tokio::test]
async fn rest_update_password_restates_record() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .and(header("authorization", "Bearer TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "u1", "name": "alice", "role": "READ_ONLY"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{SYSUSERS}/u1")))
        .and(body_json(json!({
            "id": "u1",
            "name": "alice",
            "password": "newpw",
            "role": "READ_ONLY",
            "type": "sysuser"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .update_password("alice", &secret("newpw"))
        .await
        .unwrap();
    assert!(result.success, "{result:?}");
}

#[tokio::test]
async fn rest_update_password_missing_user_sends_no_put() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .update_password("ghost", &secret("pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { ref name } if name == "ghost"));
}

#[tokio::test]
async fn rest_update_password_propagates_rejected_list() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client
        .update_password("alice", &secret("pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }), "got {err:?}");
    assert_eq!(requests_with_method(&server, "PUT").await, 0);
}

#[tokio::test]
async fn rest_list_create_list() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "a0", "name": "admin", "role": "ADMIN"}]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SYSUSERS))
        .and(body_json(json!({
            "name": "carol",
            "password": "pw",
            "role": "READ_WRITE",
            "type": "sysuser"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "a0", "name": "admin", "role": "ADMIN"},
                {"id": "c1", "name": "carol", "role": "READ_WRITE"}
            ]
        })))
        .mount(&server)
        .await;

    let before = client.list_users().await.unwrap();
    assert!(before.iter().all(|u| u.name != "carol"));

    let created = client
        .create_user("carol", &secret("pw"), Role::ReadWrite)
        .await
        .unwrap();
    assert!(created.success);

    let after = client.list_users().await.unwrap();
    assert_eq!(after.iter().filter(|u| u.name == "carol").count(), 1);
    let carol = after.iter().find(|u| u.name == "carol").unwrap();
    assert_eq!(carol.role, Role::ReadWrite);
    assert!(carol.password.is_none());
}

#[tokio::test]
async fn rest_create_rejects_invalid_role_locally() {
    let (server, client) = rest_device().await;

    let err = client
        .create_user("dave", &secret("pw"), Role::Superuser)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(requests_with_method(&server, "POST").await, 1, "only the login");
}

#[tokio::test]
async fn rest_create_rejection_is_failed_result() {
    let (server, client) = rest_device().await;

    Mock::given(method("POST"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"severity": "ERROR", "key": "Validation",
                      "messages": [{"description": "Password does not meet complexity requirements"}]}
        })))
        .mount(&server)
        .await;

    let result = client
        .create_user("erin", &secret("x"), Role::ReadOnly)
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Password does not meet complexity requirements");
    assert!(result.raw_body.contains("complexity"));
}

#[tokio::test]
async fn rest_admin_is_never_deleted() {
    let (server, client) = rest_device().await;

    let err = client.delete_user("admin", true).await.unwrap_err();
    assert!(matches!(err, CoreError::ProtectedAccount { .. }));
    assert_eq!(requests_with_method(&server, "GET").await, 0);
    assert_eq!(requests_with_method(&server, "DELETE").await, 0);
}

#[tokio::test]
async fn rest_delete_missing_user_is_failed_result() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let result = client.delete_user("frank", false).await.unwrap();
    assert!(!result.success);
    assert_eq!(requests_with_method(&server, "DELETE").await, 0);
}

#[tokio::test]
async fn rest_delete_keeps_vendor_message_when_list_refused() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"messages": [{"description": "User lacks privilege"}]}
        })))
        .mount(&server)
        .await;

    let result = client.delete_user("bob", false).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "User lacks privilege");
    assert!(result.raw_body.contains("User lacks privilege"));
    assert_eq!(requests_with_method(&server, "DELETE").await, 0);
}

#[tokio::test]
async fn rest_delete_by_id() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "g7", "name": "grace", "role": "READ_ONLY"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{SYSUSERS}/g7")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.delete_user("grace", false).await.unwrap();
    assert!(result.success);
}

#[tokio::test]
async fn rest_rejected_list_is_empty() {
    let (server, client) = rest_device().await;

    Mock::given(method("GET"))
        .and(path(SYSUSERS))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    assert!(client.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn rest_commit_reports_job() {
    let (server, client) = rest_device().await;

    Mock::given(method("POST"))
        .and(path("/api/fdm/latest/operational/deploy"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-42", "state": "QUEUED", "type": "deployment"
        })))
        .mount(&server)
        .await;

    let result = client.commit().await.unwrap();
    assert!(result.success);
    assert_eq!(result.message, "deployment job started");
    assert_eq!(result.job_id.as_deref(), Some("job-42"));
}

#[tokio::test]
async fn rest_bad_login_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fdm/latest/fdm/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let err = DeviceClient::connect(&config(&server, BackendKind::Rest))
        .await
        .unwrap_err();
    assert!(err.is_fatal_to_session(), "got {err:?}");
}

#[tokio::test]
async fn slow_device_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fdm/latest/fdm/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "TOKEN"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut cfg = config(&server, BackendKind::Rest);
    cfg.timeout = Duration::from_secs(1);
    let err = DeviceClient::connect(&cfg).await.unwrap_err();
    assert!(
        matches!(err, CoreError::Timeout { timeout_secs: 1 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn operations_before_login_fail_without_requests() {
    let server = MockServer::start().await;
    let client = DeviceClient::new(&config(&server, BackendKind::Rest)).unwrap();

    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── XML backend ─────────────────────────────────────────────────────

#[tokio::test]
async fn xml_delete_targets_entry() {
    let (server, client) = xml_device().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("type", "config"))
        .and(query_param("action", "delete"))
        .and(query_param(
            "xpath",
            "/config/mgt-config/users/entry[@name='bob']",
        ))
        .and(query_param("key", "KEY"))
        .respond_with(xml(
            "<response status=\"success\" code=\"20\"><msg>command succeeded</msg></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.delete_user("bob", false).await.unwrap();
    assert!(result.success);
    assert!(result.raw_body.contains("command succeeded"));
}

#[tokio::test]
async fn xml_admin_needs_force() {
    let (server, client) = xml_device().await;

    let err = client.delete_user("admin", false).await.unwrap_err();
    assert!(matches!(err, CoreError::ProtectedAccount { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 1, "only keygen");

    Mock::given(method("GET"))
        .and(query_param("action", "delete"))
        .respond_with(xml("<response status=\"success\" code=\"20\"/>"))
        .expect(1)
        .mount(&server)
        .await;
    assert!(client.delete_user("admin", true).await.unwrap().success);
}

#[tokio::test]
async fn xml_create_forces_superuser() {
    let (server, client) = xml_device().await;

    Mock::given(method("GET"))
        .and(query_param("action", "set"))
        .and(query_param(
            "xpath",
            "/config/mgt-config/users/entry[@name='hank']",
        ))
        .and(query_param(
            "element",
            "<password>pw</password><permissions><role-based><superuser>yes</superuser></role-based></permissions>",
        ))
        .respond_with(xml("<response status=\"success\" code=\"20\"><msg>command succeeded</msg></response>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .create_user("hank", &secret("pw"), Role::ReadOnly)
        .await
        .unwrap();
    assert!(result.success);
}

#[tokio::test]
async fn xml_unsafe_name_is_validation_error() {
    let (server, client) = xml_device().await;

    let err = client
        .update_password("x'] | //*[@name='y", &secret("pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn xml_list_uses_superuser_heuristic() {
    let (server, client) = xml_device().await;

    Mock::given(method("GET"))
        .and(query_param("action", "get"))
        .and(query_param("xpath", "/config/mgt-config/users"))
        .respond_with(xml(
            r#"<response status="success"><result><users>
                <entry name="admin"><permissions><role-based><superuser>yes</superuser></role-based></permissions></entry>
                <entry name="audit"><permissions><role-based><superreader>yes</superreader></role-based></permissions></entry>
            </users></result></response>"#,
        ))
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();
    let summary: Vec<(String, Role)> = users.into_iter().map(|u| (u.name, u.role)).collect();
    assert_eq!(
        summary,
        vec![
            ("admin".to_string(), Role::Superuser),
            ("audit".to_string(), Role::Unknown),
        ]
    );
}

#[tokio::test]
async fn xml_rejection_is_failed_result() {
    let (server, client) = xml_device().await;

    Mock::given(method("GET"))
        .and(query_param("action", "set"))
        .respond_with(xml(
            "<response status=\"error\" code=\"12\"><msg><line>Invalid syntax</line></msg></response>",
        ))
        .mount(&server)
        .await;

    let result = client
        .update_password("ivy", &secret("pw"))
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Invalid syntax");
}

#[tokio::test]
async fn xml_commit_reports_job() {
    let (server, client) = xml_device().await;

    Mock::given(method("GET"))
        .and(query_param("type", "commit"))
        .respond_with(xml(
            "<response status=\"success\" code=\"19\"><result><msg><line>Commit job enqueued with jobid 12</line></msg><job>12</job></result></response>",
        ))
        .mount(&server)
        .await;

    let result = client.commit().await.unwrap();
    assert!(result.success);
    assert_eq!(result.message, "Commit job enqueued with jobid 12");
    assert_eq!(result.job_id.as_deref(), Some("12"));
}

#[tokio::test]
async fn xml_connection_error_hides_credentials() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let cfg = DeviceConfig::new(
        Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        BackendKind::Xml,
        Credentials {
            username: "admin".into(),
            password: secret("S3cretPw"),
        },
    );

    let err = DeviceClient::connect(&cfg).await.unwrap_err();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }), "got {err:?}");
    for shown in [err.to_string(), format!("{err:?}")] {
        assert!(!shown.contains("S3cretPw"), "{shown}");
        assert!(!shown.contains("password="), "{shown}");
    }
}
