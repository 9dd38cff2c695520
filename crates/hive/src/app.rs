use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        health::{livez, readyz},
        temperature::get_temperature,
        version::version,
    },
    state::AppState,
};

/// Upper bound for any request, above the upstream timeout of a single fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/temperature", get(get_temperature))
        .route("/readyz", get(readyz))
        .route("/livez", get(livez))
        .route("/version", get(version))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeDelta, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::storage::opensensemap::{OpenSenseMapClient, SenseBoxRepository};
    use crate::test_support::{
        sense_box, sense_box_json, spawn_upstream, upstream_router, MockCache,
    };

    const INDEX_KEY: &str = "index:senseboxes";

    /// App over a fake upstream serving `boxes`, polling `ids`.
    async fn app(
        boxes: Vec<(&'static str, serde_json::Value)>,
        ids: &[&str],
        cache: Arc<MockCache>,
    ) -> Router {
        let base_url = spawn_upstream(upstream_router(boxes)).await;
        let ids = ids.join(",");
        let config = Config::from_lookup(|key| match key {
            "SENSE_BOX_IDS" => Some(ids.clone()),
            "OPENSENSEMAP_BASE_URL" => Some(base_url.clone()),
            _ => None,
        });

        let client =
            OpenSenseMapClient::new(&config.opensensemap_base_url, config.upstream_timeout())
                .unwrap();
        let upstream = Arc::new(SenseBoxRepository::new(client, config.sense_box_ids.clone()));

        create_app(AppState::build(upstream, cache, &config))
    }

    async fn request(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_temperature_good() {
        let boxes = vec![("a", sense_box_json("a", 10.0, Utc::now()))];
        let app = app(boxes, &["a"], Arc::new(MockCache::new())).await;

        let (status, body) = request(app, "/temperature").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "Good", "temperature": 10.0})
        );
    }

    #[tokio::test]
    async fn test_temperature_without_values() {
        let app = app(vec![], &["a", "b"], Arc::new(MockCache::new())).await;

        let (status, body) = request(app, "/temperature").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "No values present", "temperature": null})
        );
    }

    #[tokio::test]
    async fn test_temperature_is_served_from_cache() {
        let cache = Arc::new(MockCache::new());
        cache.seed_index(INDEX_KEY, &["a"]).await;
        cache
            .seed_entry(&sense_box("a", 38.5, Utc::now()), Utc::now())
            .await;
        // The upstream is down; the fresh entry answers.
        let app = app(vec![], &["a"], cache).await;

        let (_, body) = request(app, "/temperature").await;

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "Too Hot", "temperature": 38.5})
        );
    }

    #[tokio::test]
    async fn test_readyz_with_quorum() {
        let now = Utc::now();
        let boxes = vec![
            ("a", sense_box_json("a", 10.0, now)),
            ("b", sense_box_json("b", 12.0, now)),
        ];
        let app = app(boxes, &["a", "b", "c"], Arc::new(MockCache::new())).await;

        let (status, body) = request(app, "/readyz").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_readyz_unavailable_without_cache() {
        let app = app(vec![], &["a", "b", "c"], Arc::new(MockCache::new())).await;

        let (status, body) = request(app, "/readyz").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_readyz_available_with_recent_cache() {
        let cache = Arc::new(MockCache::new());
        let written = Utc::now() - TimeDelta::minutes(1);
        cache.seed_index(INDEX_KEY, &["a", "b", "c"]).await;
        cache.seed_entry(&sense_box("b", 10.0, written), written).await;
        let app = app(vec![], &["a", "b", "c"], cache).await;

        let (status, _) = request(app, "/readyz").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_while_no_values_present() {
        let cache = Arc::new(MockCache::new());
        let written = Utc::now() - TimeDelta::minutes(1);
        let measured = Utc::now() - TimeDelta::hours(2);
        cache.seed_index(INDEX_KEY, &["a"]).await;
        cache.seed_entry(&sense_box("a", 20.0, measured), written).await;
        let app = app(vec![], &["a"], cache).await;

        let (status, _) = request(app.clone(), "/readyz").await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = request(app, "/temperature").await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "No values present");
    }

    #[tokio::test]
    async fn test_livez() {
        let app = app(vec![], &["a"], Arc::new(MockCache::new())).await;

        let (status, body) = request(app, "/livez").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_version() {
        let app = app(vec![], &["a"], Arc::new(MockCache::new())).await;

        let (status, body) = request(app, "/version").await;

        assert_eq!(status, StatusCode::OK);
        let version: String = serde_json::from_slice(&body).unwrap();
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app(vec![], &["a"], Arc::new(MockCache::new())).await;

        let (status, _) = request(app, "/metrics").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
