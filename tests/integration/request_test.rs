//! Request building and dispatch against a mock server.

use super::{closed_port_url, server_and_factory};
use please::{ClientConfig, Error, Form, MultipartForm, RequestFactory};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_send_and_verify() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/status/200"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/status/369"))
        .respond_with(ResponseTemplate::new(369))
        .mount(&server)
        .await;

    factory.get("/status/200").send_and_verify().await.unwrap();

    let err = factory.get("/status/369").send_and_verify().await.unwrap_err();
    assert!(err.is_response_error());
    assert_eq!(err.status(), Some(369));
    assert!(err.to_string().contains("369"));
    let response = err.into_response().expect("response kept in the error");
    assert_eq!(response.status(), 369);
}

#[tokio::test]
async fn test_send_returns_error_statuses_as_ok() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = factory.get("/missing").send().await.unwrap();
    assert_eq!(response.status(), 404);
    assert!(!response.is_ok());
}

#[tokio::test]
async fn test_parameters_from_builder_only() {
    let (server, factory) = server_and_factory().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("hey", "listen"))
        .and(query_param("pi", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .get("/get")
        .parameter("hey", "listen")
        .parameter("pi", 3)
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_parameters_mixed() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/get"))
        .and(query_param("a", "b"))
        .and(query_param("c", "d"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .get("/get?a=b")
        .parameter("c", "d")
        .send_and_verify()
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("a=b&c=d"));
}

#[tokio::test]
async fn test_header() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/headers"))
        .and(header("X-Thing", "thing"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .get("/headers")
        .header("X-Thing", "thing")
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_default_headers() {
    let (server, factory) = server_and_factory().await;
    let factory = factory.add_default_header("X-Test", "test");
    Mock::given(path("/headers"))
        .and(header("X-Test", "test"))
        .and(header("X-Test-Again", "still"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .get("/headers")
        .header("X-Test-Again", "still")
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_json_body() {
    let (server, factory) = server_and_factory().await;
    Mock::given(method("POST"))
        .and(path("/post"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"6x9": "42"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .post("/post")
        .header("Accept", "application/json")
        .json(&json!({"6x9": "42"}))
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_explicit_content_type_wins() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/post"))
        .and(header("Content-Type", "application/vnd.api+json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .post("/post")
        .header("Content-Type", "application/vnd.api+json")
        .json(&json!({"data": []}))
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_string_body() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/post"))
        .and(header("Content-Type", "text/plain; charset=UTF-8"))
        .and(body_string("foxtrot uniform"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .post("/post")
        .body_text("foxtrot uniform")
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bytes_body_has_no_content_type() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    factory
        .put("/upload")
        .body_bytes(vec![0u8, 1, 2, 255])
        .send_and_verify()
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, vec![0u8, 1, 2, 255]);
    assert!(received[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_stream_body() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/upload"))
        .and(body_string("Nerevar, Moon and Star"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let chunks = futures::stream::iter(vec![
        Ok::<_, std::io::Error>("Nerevar, "),
        Ok("Moon and Star"),
    ]);
    factory
        .post("/upload")
        .body_stream(chunks)
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_form_body() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/post"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("daylight=burning&time=money&k=a&k=b&k=c&6x9base7=42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = std::collections::BTreeMap::new();
    fields.insert("time", "money");
    fields.insert("daylight", "burning");

    factory
        .post("/post")
        .form(
            Form::new()
                .add_all(fields)
                .add_values("k", ["a", "b", "c"])
                .add("6x9base7", 42),
        )
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_multipart() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/post"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("test.txt");
    std::fs::write(&file_path, "There and Back Again").unwrap();

    factory
        .post("/post")
        .multipart(
            MultipartForm::new()
                .file("file", &file_path)
                .data("bytes", "The Talos Mistake".as_bytes())
                .field("x", "y")
                .field("m1a", 1),
        )
        .send_and_verify()
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let content_type = received[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&received[0].body).into_owned();
    assert!(body.contains("name=\"file\"; filename=\"test.txt\""));
    assert!(body.contains("There and Back Again"));
    assert!(body.contains("name=\"bytes\"; filename=\"bytes\""));
    assert!(body.contains("The Talos Mistake"));
    assert!(body.contains("Content-Type: application/octet-stream"));
    assert!(body.contains("name=\"x\"\r\n\r\ny\r\n"));
    assert!(body.contains("name=\"m1a\"\r\n\r\n1\r\n"));
}

#[tokio::test]
async fn test_arbitrary_methods() {
    let (server, factory) = server_and_factory().await;
    for verb in ["PATCH", "OPTIONS", "PROPFIND"] {
        Mock::given(method(verb))
            .and(path("/any"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    factory.patch("/any").send_and_verify().await.unwrap();
    factory.options("/any").send_and_verify().await.unwrap();
    factory.request("PROPFIND", "/any").send_and_verify().await.unwrap();
}

#[tokio::test]
async fn test_basic_auth() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/secure"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    factory
        .get("/secure")
        .basic_auth("user", "pass")
        .send_and_verify()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timeout() {
    let (server, factory) = server_and_factory().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let err = factory
        .get("/slow")
        .timeout(Duration::from_millis(50))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    assert!(err.is_request_error());
}

#[tokio::test]
async fn test_connection_refused() {
    let err = RequestFactory::new()
        .get(&closed_port_url())
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Request(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_invalid_url() {
    let err = RequestFactory::new()
        .get("hey hello")
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));
}

async fn mount_redirect(server: &wiremock::MockServer) {
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirects_followed_by_default() {
    let (server, factory) = server_and_factory().await;
    mount_redirect(&server).await;

    let mut response = factory.get("/old").send_and_verify().await.unwrap();
    assert_eq!(response.url().path(), "/new");
    assert_eq!(response.text().await.unwrap(), "moved");
}

#[tokio::test]
async fn test_zero_max_redirects_returns_the_redirect() {
    let server = wiremock::MockServer::start().await;
    mount_redirect(&server).await;

    let config = ClientConfig {
        base_url: Some(server.uri()),
        max_redirects: 0,
        ..Default::default()
    };
    let response = RequestFactory::from_config(&config)
        .get("/old")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 302);
    assert_eq!(response.header("Location"), Some("/new"));

    let config = ClientConfig {
        base_url: Some(server.uri()),
        follow_redirects: false,
        ..Default::default()
    };
    let response = RequestFactory::from_config(&config)
        .get("/old")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 302);
}

#[tokio::test]
async fn test_unverified_client_sends() {
    let server = wiremock::MockServer::start().await;
    Mock::given(path("/insecure"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: Some(server.uri()),
        verify_certificates: false,
        ..Default::default()
    };
    RequestFactory::from_config(&config)
        .get("/insecure")
        .send_and_verify()
        .await
        .unwrap();

    RequestFactory::with_base_url(server.uri())
        .get("/insecure")
        .verify_certificates(false)
        .send_and_verify()
        .await
        .unwrap();
}
