//! API client tests
//!
//! Runs the client against a local fake of the Nature Remo API.

mod common;

use axum::http::StatusCode;
use common::{spawn_api, MockApi, TEST_TOKEN};
use nature_remo_exporter::config::NatureConfig;
use nature_remo_exporter::error::ExporterError;
use nature_remo_exporter::nature::NatureClient;
use secrecy::SecretString;
use serde_json::json;

fn client_for(base_url: &str, token: &str) -> NatureClient {
    let config = NatureConfig {
        base_url: base_url.to_string(),
        access_token: SecretString::from(token),
    };
    NatureClient::new(&config).expect("Failed to create client")
}

#[tokio::test]
async fn test_fetch_devices_excludes_energy_bridges() {
    // Given: An account with a Remo 3 and a Remo E lite
    let api = MockApi::ok(
        json!([common::living_room_json(), common::energy_bridge_json()]),
        common::appliances_json(),
    );
    let client = client_for(&spawn_api(api).await, TEST_TOKEN);

    // When: Fetching devices
    let devices = client.fetch_devices().await.expect("fetch devices");

    // Then: Only the ambient sensor unit is returned
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "Living Room");
}

#[tokio::test]
async fn test_fetch_devices_filters_by_firmware_substring() {
    let api = MockApi::ok(
        json!([
            {"name": "a", "firmware_version": "Remo-E"},
            {"name": "b", "firmware_version": "Remo-1"},
            {"name": "c", "firmware_version": "Remo-Eplus"}
        ]),
        json!({"appliances": []}),
    );
    let client = client_for(&spawn_api(api).await, TEST_TOKEN);

    let devices = client.fetch_devices().await.expect("fetch devices");

    let versions: Vec<&str> = devices
        .iter()
        .map(|d| d.firmware_version.as_str())
        .collect();
    assert_eq!(versions, vec!["Remo-1"]);
}

#[tokio::test]
async fn test_fetch_appliances_returns_all() {
    let api = MockApi::ok(json!([]), common::appliances_json());
    let client = client_for(&spawn_api(api).await, TEST_TOKEN);

    let appliances = client.fetch_appliances().await.expect("fetch appliances");

    assert_eq!(appliances.len(), 1);
    assert_eq!(appliances[0].name, "Smart Meter");
    assert_eq!(appliances[0].properties.len(), 2);
}

#[tokio::test]
async fn test_wrong_token_is_http_error() {
    let api = MockApi::ok(json!([]), json!({"appliances": []}));
    let client = client_for(&spawn_api(api).await, "wrong-token");

    let err = client.fetch_devices().await.unwrap_err();

    assert!(
        matches!(err, ExporterError::Http { status: 401 }),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_server_error_status_is_http_error() {
    let api = MockApi {
        devices: (StatusCode::OK, "[]".to_string()),
        appliances: (StatusCode::INTERNAL_SERVER_ERROR, "oops".to_string()),
    };
    let client = client_for(&spawn_api(api).await, TEST_TOKEN);

    let err = client.fetch_appliances().await.unwrap_err();

    assert!(matches!(err, ExporterError::Http { status: 500 }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let api = MockApi {
        devices: (StatusCode::OK, "<html>maintenance</html>".to_string()),
        appliances: (StatusCode::OK, json!({"items": []}).to_string()),
    };
    let client = client_for(&spawn_api(api).await, TEST_TOKEN);

    let devices_err = client.fetch_devices().await.unwrap_err();
    let appliances_err = client.fetch_appliances().await.unwrap_err();

    assert!(matches!(devices_err, ExporterError::Decode(_)));
    assert!(matches!(appliances_err, ExporterError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    // Given: A port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = client_for(&format!("http://{}", addr), TEST_TOKEN);

    // When: Fetching devices
    let err = client.fetch_devices().await.unwrap_err();

    // Then: The failure is reported as a transport error
    assert!(matches!(err, ExporterError::Transport(_)));
}

#[tokio::test]
async fn test_client_is_reusable_across_calls() {
    let api = MockApi::ok(json!([common::living_room_json()]), common::appliances_json());
    let client = client_for(&spawn_api(api).await, TEST_TOKEN);

    for _ in 0..3 {
        assert_eq!(client.fetch_devices().await.expect("devices").len(), 1);
        assert_eq!(client.fetch_appliances().await.expect("appliances").len(), 1);
    }
}
