#![allow(dead_code)]

use axum::body::{self, Body};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use pricetracker::app_state::AppState;
use pricetracker::configuration::{
    Application, BackendSettings, DisplaySettings, Settings, StorageSettings,
};
use pricetracker::storage::in_memory::MemoryStore;
use pricetracker::storage::{KeyValueStore, USER_EMAIL_KEY};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

pub const BLOCKED_DOMAIN: &str = "@blocked.test";

/// In-process stand-in for the tracking backend.
#[derive(Debug, Default)]
pub struct Backend {
    pub records: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<String>>,
    pub received_urls: Mutex<Vec<String>>,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
    next_id: AtomicU64,
}

impl Backend {
    pub fn with_products(count: usize) -> Arc<Self> {
        let backend = Arc::new(Self::default());
        for _ in 0..count {
            let url = format!("https://www.amazon.in/dp/{}", random_asin());
            let record = backend.tracking_record(&url);
            backend.records.lock().unwrap().push(record);
        }
        backend
    }

    fn tracking_record(&self, url: &str) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        json!({
            "id": id + 1000,
            "initial_price": "120.00",
            "product": {
                "id": id,
                "title": format!("Tracked item {id}"),
                "amazon_url": url,
                "current_price": "99.99",
                "image_url": null,
                "last_checked": "2026-01-14T10:00:00"
            }
        })
    }

    pub fn product_ids(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|record| record_id(record))
            .collect()
    }

    /// Adds a record whose product id is the given string.
    pub fn push_with_id(&self, id: &str) {
        let mut record = self.tracking_record(&format!(
            "https://www.amazon.in/dp/{}",
            random_asin()
        ));
        record["product"]["id"] = json!(id);
        self.records.lock().unwrap().push(record);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.starts_with(prefix))
            .count()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

fn record_id(record: &Value) -> String {
    match &record["product"]["id"] {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

fn detail(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn list(State(backend): State<Arc<Backend>>) -> axum::response::Response {
    backend.record("GET /tracking_products".to_string());
    if backend.fail_list.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let records = backend.records.lock().unwrap().clone();
    Json(records).into_response()
}

async fn track(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    backend.record("POST /track_product".to_string());
    let url = body["url"].as_str().unwrap_or_default().to_string();
    backend.received_urls.lock().unwrap().push(url.clone());
    let already_tracked = backend
        .records
        .lock()
        .unwrap()
        .iter()
        .any(|record| record["product"]["amazon_url"] == url.as_str());
    if already_tracked {
        return detail(StatusCode::BAD_REQUEST, "Already tracking this product");
    }
    let record = backend.tracking_record(&url);
    backend.records.lock().unwrap().push(record.clone());
    Json(record).into_response()
}

async fn remove(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    backend.record(format!("DELETE /delete_tracking/{id}"));
    if backend.fail_delete.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "delete failed");
    }
    let mut records = backend.records.lock().unwrap();
    let before = records.len();
    records.retain(|record| record_id(record) != id);
    if records.len() == before {
        return detail(StatusCode::NOT_FOUND, "Tracking not found");
    }
    Json(json!({ "message": "Stopped tracking" })).into_response()
}

async fn email(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    backend.record("PUT /submit_email".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    if email.ends_with(BLOCKED_DOMAIN) {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Email domain not allowed");
    }
    Json(json!({ "message": "Email saved" })).into_response()
}

/// Serves `backend` on an ephemeral port and returns its base url.
pub async fn spawn_backend(backend: Arc<Backend>) -> Url {
    let app = Router::new()
        .route("/tracking_products", get(list))
        .route("/track_product", post(track))
        .route("/delete_tracking/:id", delete(remove))
        .route("/submit_email", put(email))
        .with_state(backend);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake backend stopped");
    });
    Url::parse(&format!("http://{addr}")).expect("Failed to parse backend url")
}

/// Port 1 on loopback refuses connections.
pub fn unreachable_backend() -> Url {
    Url::parse("http://127.0.0.1:1").unwrap()
}

pub fn settings(base_url: Url) -> Settings {
    Settings {
        application: Application {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        backend: BackendSettings { base_url },
        storage: StorageSettings::default(),
        display: DisplaySettings::default(),
    }
}

pub fn store_with_email(email: Option<&str>) -> Arc<dyn KeyValueStore> {
    match email {
        Some(email) => Arc::new(MemoryStore::with_value(USER_EMAIL_KEY, email)),
        None => Arc::new(MemoryStore::default()),
    }
}

pub fn app_state(base_url: Url, store: Arc<dyn KeyValueStore>) -> AppState {
    AppState::with_store(&settings(base_url), store).expect("Failed to create app state")
}

pub async fn read_body(body: Body) -> String {
    let bytes = body::to_bytes(body, usize::MAX).await.expect("Failed");
    String::from_utf8(bytes.to_vec()).expect("response was not valid utf-8")
}

pub fn random_asin() -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("B0{}", suffix.to_uppercase())
}

/// Polls `check` until it holds; background tasks finish within this window.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}
