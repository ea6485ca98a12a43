#![allow(clippy::unwrap_used)]
// Integration tests for `LocalClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slide_api::{ApiVersion, Error, LocalClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LocalClient, String) {
    let server = MockServer::start().await;
    let host = server.address().to_string();
    let client = LocalClient::with_client(reqwest::Client::new());
    client.add_host(&host, SecretString::from(String::new()), ApiVersion::V2);
    (server, client, host)
}

fn info_body(pos: f64) -> serde_json::Value {
    json!({
        "slide_id": "slide_300000000000",
        "mac": "300000000000",
        "board_rev": 1,
        "device_name": "",
        "zone_name": "",
        "curtain_type": 0,
        "calib_time": 10239,
        "pos": pos,
        "touch_go": true
    })
}

// ── Read tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_info() {
    let (server, client, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.GetInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body(0.42)))
        .mount(&server)
        .await;

    let info = client.info(&host).await.unwrap();
    assert_eq!(info.slide_id.as_deref(), Some("slide_300000000000"));
    assert_eq!(info.pos, Some(0.42));
    assert_eq!(info.touch_go, Some(true));
}

#[tokio::test]
async fn test_info_unknown_host() {
    let client = LocalClient::with_client(reqwest::Client::new());
    let result = client.info("10.0.0.99").await;
    assert!(matches!(result, Err(Error::UnknownHost { .. })));
}

#[tokio::test]
async fn test_info_v1_host_unsupported() {
    let (_server, client, host) = setup().await;
    client.add_host(&host, SecretString::from("abcd".to_string()), ApiVersion::V1);
    let result = client.info(&host).await;
    assert!(matches!(result, Err(Error::UnsupportedOperation(_))));
}

#[tokio::test]
async fn test_device_error_status() {
    let (server, client, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.GetInfo"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let result = client.info(&host).await;
    assert!(matches!(result, Err(Error::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_unreachable_host_is_transient() {
    let client = LocalClient::with_client(reqwest::Client::new());
    // Port 9 (discard) on localhost is closed in test environments.
    client.add_host("127.0.0.1:9", SecretString::from(String::new()), ApiVersion::V2);
    let err = client.info("127.0.0.1:9").await.unwrap_err();
    assert!(err.is_transient(), "expected transient error, got: {err:?}");
}

// ── Command tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_set_position() {
    let (server, client, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.SetPos"))
        .and(body_json(json!({ "pos": 0.75 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_position(&host, 0.75).await.unwrap();
}

#[tokio::test]
async fn test_stop_and_calibrate_accept_empty_body() {
    let (server, client, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.Stop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.Calibrate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.stop(&host).await.unwrap();
    client.calibrate(&host).await.unwrap();
}

#[tokio::test]
async fn test_motor_strength_body() {
    let (server, client, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.Config.Motor"))
        .and(body_json(json!({ "maxcurrent": 1250, "calib_current": 1200 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_motor_strength(&host, 1250, 1200).await.unwrap();
}

#[tokio::test]
async fn test_touch_go_body() {
    let (server, client, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc/Slide.Config.TouchGo"))
        .and(body_json(json!({ "touch_go": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_touch_go(&host, false).await.unwrap();
}
