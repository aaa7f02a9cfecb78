#![allow(clippy::unwrap_used)]
// Integration tests for `XmlClient` using wiremock.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwadmin_api::xml::UserEntry;
use fwadmin_api::{Error, Transport, XmlClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, XmlClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let transport = Transport::with_client(reqwest::Client::new(), Duration::from_secs(5));
    let mut client = XmlClient::with_transport(transport, base_url);
    client.set_key(SecretString::from("KEY123".to_string()));
    (server, client)
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/xml")
}

// ── Keygen tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_keygen_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("type", "keygen"))
        .and(query_param("user", "admin"))
        .and(query_param("password", "p&ss word"))
        .respond_with(xml(
            "<response status=\"success\"><result><key>LUFRPT14MW5xOEo1R09KVlBZNnpnemh0VHRBOWl6TGM9</key></result></response>",
        ))
        .mount(&server)
        .await;

    let secret = SecretString::from("p&ss word".to_string());
    let key = client.request_key("admin", &secret).await.unwrap();
    assert_eq!(
        key.expose_secret(),
        "LUFRPT14MW5xOEo1R09KVlBZNnpnemh0VHRBOWl6TGM9"
    );
}

#[tokio::test]
async fn test_keygen_invalid_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("type", "keygen"))
        .respond_with(
            ResponseTemplate::new(403).set_body_raw(
                "<response status=\"error\" code=\"403\"><result><msg>Invalid Credential</msg></result></response>"
                    .as_bytes()
                    .to_vec(),
                "application/xml",
            ),
        )
        .mount(&server)
        .await;

    let secret = SecretString::from("nope".to_string());
    let result = client.request_key("admin", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Invalid Credential"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_keygen_success_without_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("type", "keygen"))
        .respond_with(xml("<response status=\"success\"><result/></response>"))
        .mount(&server)
        .await;

    let secret = SecretString::from("pw".to_string());
    let result = client.request_key("admin", &secret).await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Config tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_users() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("type", "config"))
        .and(query_param("action", "get"))
        .and(query_param("xpath", "/config/mgt-config/users"))
        .and(query_param("key", "KEY123"))
        .respond_with(xml(
            r#"<response status="success" code="19"><result total-count="2" count="2">
                <users>
                  <entry name="admin"><phash>*</phash><permissions><role-based><superuser>yes</superuser></role-based></permissions></entry>
                  <entry name="ops"><permissions><role-based><deviceadmin><member>localhost.localdomain</member></deviceadmin></role-based></permissions></entry>
                </users>
            </result></response>"#,
        ))
        .mount(&server)
        .await;

    let resp = client
        .get_config("/config/mgt-config/users")
        .await
        .unwrap();

    assert_eq!(
        resp.users,
        vec![
            UserEntry {
                name: "admin".into(),
                superuser: true
            },
            UserEntry {
                name: "ops".into(),
                superuser: false
            },
        ]
    );
}

#[tokio::test]
async fn test_set_password_element() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("action", "set"))
        .and(query_param(
            "xpath",
            "/config/mgt-config/users/entry[@name='carol']",
        ))
        .and(query_param(
            "element",
            "<password>pw</password><permissions><role-based><superuser>yes</superuser></role-based></permissions>",
        ))
        .respond_with(xml(
            "<response status=\"success\" code=\"20\"><msg>command succeeded</msg></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .set_config(
            &fwadmin_api::xml::codec::user_xpath("carol"),
            &fwadmin_api::xml::codec::password_element("pw"),
        )
        .await
        .unwrap();
    assert_eq!(resp.message.as_deref(), Some("command succeeded"));
}

#[tokio::test]
async fn test_commit_job() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("type", "commit"))
        .and(query_param("cmd", "<commit></commit>"))
        .and(query_param("key", "KEY123"))
        .respond_with(xml(
            "<response status=\"success\" code=\"19\"><result><msg><line>Commit job enqueued with jobid 7</line></msg><job>7</job></result></response>",
        ))
        .mount(&server)
        .await;

    let resp = client.commit().await.unwrap();
    assert_eq!(resp.job.as_deref(), Some("7"));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_status_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("action", "delete"))
        .respond_with(xml(
            "<response status=\"error\" code=\"12\"><msg><line>Object doesn't exist</line></msg></response>",
        ))
        .mount(&server)
        .await;

    let result = client
        .delete_config("/config/mgt-config/users/entry[@name='ghost']")
        .await;

    match result {
        Err(Error::Rejected { status, ref message, ref body }) => {
            assert_eq!(status, 200);
            assert_eq!(message, "Object doesn't exist");
            assert!(body.contains("code=\"12\""));
        }
        other => panic!("expected Rejected error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(xml("<response status=\"success\"><result><users>"))
        .mount(&server)
        .await;

    let result = client.get_config("/config/mgt-config/users").await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_calls_require_key() {
    let server = MockServer::start().await;
    let client = XmlClient::with_transport(
        Transport::with_client(reqwest::Client::new(), Duration::from_secs(5)),
        Url::parse(&server.uri()).unwrap(),
    );

    assert!(!client.has_key());
    assert!(matches!(client.commit().await, Err(Error::NotAuthenticated)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
