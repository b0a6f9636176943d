//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use nature_remo_exporter::error::{ExporterError, Result};
use nature_remo_exporter::nature::{
    Appliance, ApplianceDevice, Device, NewestEvents, Property, SensorValue,
};
use nature_remo_exporter::refresh::DataSource;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TEST_TOKEN: &str = "test-token";

/// A Remo 3 as returned by `GET /1/devices`
pub fn living_room_json() -> Value {
    json!({
        "name": "Living Room",
        "id": "2b8e3f6a-0000-4c4c-8f1e-000000000001",
        "created_at": "2021-03-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "mac_address": "aa:bb:cc:dd:ee:ff",
        "bt_mac_address": "aa:bb:cc:dd:ee:f0",
        "serial_number": "1W320010000001",
        "firmware_version": "Remo/1.0.77-g808448c",
        "temperature_offset": 0,
        "humidity_offset": 0,
        "users": [],
        "newest_events": {
            "hu": {"val": 45, "created_at": "2024-05-01T09:59:00Z"},
            "il": {"val": 120.5, "created_at": "2024-05-01T09:58:00Z"},
            "mo": {"val": 1, "created_at": "2024-05-01T09:30:00Z"},
            "te": {"val": 23.5, "created_at": "2024-05-01T09:59:30Z"}
        }
    })
}

/// A Remo E lite, which reports no ambient sensors
pub fn energy_bridge_json() -> Value {
    json!({
        "name": "Smart Meter Bridge",
        "id": "2b8e3f6a-0000-4c4c-8f1e-000000000002",
        "created_at": "2021-03-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "mac_address": "11:22:33:44:55:66",
        "serial_number": "4W120010000002",
        "firmware_version": "Remo-E-lite/1.3.0",
        "temperature_offset": 0,
        "humidity_offset": 0,
        "newest_events": {}
    })
}

/// Body of `GET /1/echonetlite/appliances`
pub fn appliances_json() -> Value {
    json!({
        "appliances": [{
            "id": "7c0f9a1e-0000-4d2b-9a3c-000000000010",
            "nickname": "Smart Meter",
            "type": "EL_SMART_METER",
            "device": {
                "name": "Smart Meter Bridge",
                "id": "2b8e3f6a-0000-4c4c-8f1e-000000000002",
                "created_at": "2021-03-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z",
                "mac_address": "11:22:33:44:55:66",
                "serial_number": "4W120010000002",
                "firmware_version": "Remo-E-lite/1.3.0",
                "temperature_offset": 0,
                "humidity_offset": 0
            },
            "properties": [
                {"epc": "e7", "val": "1A", "updated_at": "2024-05-01T09:59:00Z"},
                {"epc": "d3", "val": "zz", "updated_at": "2024-05-01T09:59:00Z"}
            ]
        }]
    })
}

pub fn device(name: &str, firmware: &str, temperature: f64, humidity: f64) -> Device {
    Device {
        id: format!("{}-id", name),
        name: name.to_string(),
        firmware_version: firmware.to_string(),
        mac_address: "aa:bb:cc:dd:ee:ff".to_string(),
        serial_number: "1W320010000001".to_string(),
        newest_events: NewestEvents {
            temperature: SensorValue {
                value: temperature,
                created_at: None,
            },
            humidity: SensorValue {
                value: humidity,
                created_at: None,
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn appliance(name: &str, properties: &[(&str, &str)]) -> Appliance {
    Appliance {
        id: format!("{}-id", name),
        name: name.to_string(),
        kind: "EL_SMART_METER".to_string(),
        device: ApplianceDevice {
            name: "Bridge".to_string(),
            firmware_version: "Remo-E-lite/1.3.0".to_string(),
            mac_address: "11:22:33:44:55:66".to_string(),
            serial_number: "4W120010000002".to_string(),
            ..Default::default()
        },
        properties: properties
            .iter()
            .map(|(code, value)| Property {
                code: code.to_string(),
                value: value.to_string(),
                updated_at: None,
            })
            .collect(),
    }
}

/// Data source that replays queued results, failing once a queue runs dry
#[derive(Default)]
pub struct ScriptedSource {
    devices: Mutex<VecDeque<Result<Vec<Device>>>>,
    appliances: Mutex<VecDeque<Result<Vec<Appliance>>>>,
    pub device_calls: AtomicUsize,
    pub appliance_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_devices(&self, result: Result<Vec<Device>>) {
        self.devices.lock().unwrap().push_back(result);
    }

    pub fn push_appliances(&self, result: Result<Vec<Appliance>>) {
        self.appliances.lock().unwrap().push_back(result);
    }

    pub fn device_calls(&self) -> usize {
        self.device_calls.load(Ordering::SeqCst)
    }

    pub fn appliance_calls(&self) -> usize {
        self.appliance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn fetch_devices(&self) -> Result<Vec<Device>> {
        self.device_calls.fetch_add(1, Ordering::SeqCst);
        self.devices
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ExporterError::Http { status: 503 }))
    }

    async fn fetch_appliances(&self) -> Result<Vec<Appliance>> {
        self.appliance_calls.fetch_add(1, Ordering::SeqCst);
        self.appliances
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ExporterError::Http { status: 503 }))
    }
}

/// Canned responses of a fake Nature Remo API
#[derive(Clone)]
pub struct MockApi {
    pub devices: (StatusCode, String),
    pub appliances: (StatusCode, String),
}

impl MockApi {
    pub fn ok(devices: Value, appliances: Value) -> Self {
        Self {
            devices: (StatusCode::OK, devices.to_string()),
            appliances: (StatusCode::OK, appliances.to_string()),
        }
    }
}

fn respond(headers: &HeaderMap, (status, body): &(StatusCode, String)) -> Response {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            r#"{"code":401001,"message":"Unauthorized"}"#,
        )
            .into_response();
    }
    (*status, body.clone()).into_response()
}

async fn devices_handler(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    respond(&headers, &api.devices)
}

async fn appliances_handler(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    respond(&headers, &api.appliances)
}

/// Serve `api` on an ephemeral port and return its base URL
pub async fn spawn_api(api: MockApi) -> String {
    let app = Router::new()
        .route("/1/devices", get(devices_handler))
        .route("/1/echonetlite/appliances", get(appliances_handler))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().expect("mock api addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api server");
    });

    format!("http://{}", addr)
}
