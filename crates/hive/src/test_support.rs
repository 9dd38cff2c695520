//! Shared fixtures for unit tests: a fake openSenseMap server, an
//! instrumented cache and an instrumented sense box repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use hive_core::cache::{
    entity_key, serialize_entry, serialize_index, AggregateIndex, Cache, CacheEntry, CacheError,
    Result as CacheResult,
};
use hive_core::sensebox::{Measurement, SenseBox, Sensor};
use hive_core::storage::Repository;

/// Upstream body of a box with one temperature sensor.
pub fn sense_box_json(id: &str, value: f64, created_at: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "name": format!("Box {id}"),
        "sensors": [{
            "_id": format!("{id}-temperature"),
            "title": "Temperatur",
            "unit": "°C",
            "sensorType": "HDC1080",
            "lastMeasurement": {
                "createdAt": created_at.to_rfc3339(),
                "value": value.to_string()
            }
        }]
    })
}

/// Domain box with one temperature sensor.
pub fn sense_box(id: &str, value: f64, created_at: DateTime<Utc>) -> SenseBox {
    SenseBox::new(id, format!("Box {id}")).with_sensor(
        Sensor::new(format!("{id}-temperature"), "Temperatur")
            .with_unit("°C")
            .with_measurement(Measurement::new(created_at, value)),
    )
}

/// Router serving `GET /boxes/{id}` from a fixed set of bodies; unknown ids get 404.
pub fn upstream_router(boxes: Vec<(&'static str, serde_json::Value)>) -> Router {
    let boxes: HashMap<String, serde_json::Value> = boxes
        .into_iter()
        .map(|(id, body)| (id.to_string(), body))
        .collect();

    Router::new()
        .route("/boxes/{id}", get(serve_box))
        .with_state(Arc::new(boxes))
}

async fn serve_box(
    State(boxes): State<Arc<HashMap<String, serde_json::Value>>>,
    Path(id): Path<String>,
) -> Response {
    match boxes.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({"code": "NotFound"})))
            .into_response(),
    }
}

/// Router answering `GET /boxes/{id}` with a valid body only after `delay`.
pub fn slow_upstream_router(delay: Duration) -> Router {
    Router::new().route(
        "/boxes/{id}",
        get(move |Path(id): Path<String>| async move {
            tokio::time::sleep(delay).await;
            Json(sense_box_json(&id, 20.0, Utc::now()))
        }),
    )
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// In-memory cache that counts writes and can be told to fail.
#[derive(Default)]
pub struct MockCache {
    store: RwLock<HashMap<String, (Vec<u8>, Option<Duration>)>>,
    set_calls: AtomicUsize,
    ttl_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn ttl_calls(&self) -> usize {
        self.ttl_calls.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stores raw bytes without counting a write.
    pub async fn seed_raw(&self, key: &str, value: &[u8]) {
        self.store
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), None));
    }

    /// Stores a sense box entry written at `cached_at`.
    pub async fn seed_entry(&self, sense_box: &SenseBox, cached_at: DateTime<Utc>) {
        let entry = CacheEntry::new(sense_box.clone(), cached_at);
        let key = entity_key("sensebox", &sense_box.id);
        self.seed_raw(&key, &serialize_entry(&entry).unwrap()).await;
    }

    /// Stores an aggregate index under `key`.
    pub async fn seed_index(&self, key: &str, ids: &[&str]) {
        let index = AggregateIndex::new(ids.iter().map(|id| id.to_string()).collect());
        self.seed_raw(key, &serialize_index(&index).unwrap()).await;
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(self.store.read().await.get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        self.store
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn time_to_live(&self, key: &str) -> CacheResult<Option<Duration>> {
        self.ttl_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(self.store.read().await.get(key).and_then(|(_, ttl)| *ttl))
    }
}

/// Sense box repository that counts calls and can be made slow.
pub struct MockRepository {
    ids: Vec<String>,
    boxes: RwLock<HashMap<String, SenseBox>>,
    find_calls: AtomicUsize,
    find_all_calls: AtomicUsize,
    delay: Duration,
}

impl MockRepository {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            boxes: RwLock::new(HashMap::new()),
            find_calls: AtomicUsize::new(0),
            find_all_calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Delays every lookup, keeping refreshes in flight long enough to overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn insert(&self, sense_box: SenseBox) {
        self.boxes
            .write()
            .await
            .insert(sense_box.id.clone(), sense_box);
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    async fn lookup(&self, id: &str) -> Option<SenseBox> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.boxes.read().await.get(id).cloned()
    }
}

#[async_trait]
impl Repository<SenseBox> for MockRepository {
    fn collection(&self) -> &str {
        "senseboxes"
    }

    fn ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    async fn find(&self, id: &str) -> Option<SenseBox> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(id).await
    }

    async fn find_all(&self) -> Vec<Option<SenseBox>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        let mut boxes = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            boxes.push(self.lookup(id).await);
        }
        boxes
    }
}
