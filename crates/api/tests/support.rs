//! Shared helpers for `rallypoint-api` route tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rallypoint_api::{router, AppContext};
use rallypoint_domain::{AccessCredential, AvailabilityRecord, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const USER: &str = "user-1";

/// Router over a real context: temp SQLite file, provider pointed at wiremock.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub router: Router,
    pub provider: MockServer,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let provider = MockServer::start().await;

        let mut config = Config::default();
        config.database.path =
            temp_dir.path().join("rallypoint-api.db").to_string_lossy().into_owned();
        config.provider.api_base_url = provider.uri();
        config.provider.token_endpoint = format!("{}/token", provider.uri());
        config.provider.client_id = "test-client".to_string();
        config.provider.fetch_timeout_secs = 2;

        let ctx = Arc::new(AppContext::new_with_config(config).expect("context should build"));
        let router = router(Arc::clone(&ctx));

        Self { ctx, router, provider, _temp_dir: temp_dir }
    }

    /// Link `USER` with a token expiring `expires_in` from now.
    pub async fn link(&self, expires_in: Duration, refresh_token: Option<&str>) {
        let credential = AccessCredential {
            access_token: "stored-token".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: Utc::now() + expires_in,
        };
        self.ctx.credentials.save_credential(USER, &credential).await.expect("credential saved");
    }

    pub async fn insert(&self, record: &AvailabilityRecord) {
        self.ctx.availability.insert_record(record).await.expect("record inserted");
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).expect("request")).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("router responded");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body read");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, json)
    }
}

pub fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
}

pub fn record(id: &str, group: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> AvailabilityRecord {
    AvailabilityRecord {
        id: id.to_string(),
        owner_user: USER.to_string(),
        group_id: group.to_string(),
        start,
        end,
    }
}
