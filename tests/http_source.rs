//! HTTP source tests against a local mock sensor service

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thermowatch::{
    FetchError, HistoryFeed, HttpSensorSource, LatestFeed, Phase, PollOptions, Poller,
    SensorSource, SourceConfig, Timestamp, Trend,
};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source_for(addr: SocketAddr) -> HttpSensorSource {
    HttpSensorSource::new(&SourceConfig {
        base_url: format!("http://{}", addr),
        request_timeout_secs: 1,
    })
    .unwrap()
}

fn sensor_app() -> Router {
    Router::new()
        .route(
            "/api/latest",
            get(|| async {
                Json(json!({
                    "temperature": 21.44,
                    "time": "2024-03-01T14:05:00Z",
                    "trend": "up"
                }))
            }),
        )
        .route(
            "/api/history",
            get(|| async {
                Json(json!({
                    "lastTimestamps": ["2024-03-01T14:00:00Z", "2024-03-01T14:00:30Z", 1709301660000i64],
                    "lastTemperatures": [18.0, null, 22.0],
                    "count": 3
                }))
            }),
        )
}

#[tokio::test]
async fn test_fetch_latest() {
    let addr = serve(sensor_app()).await;
    let reading = source_for(addr).fetch_latest().await.unwrap();

    assert_eq!(reading.temperature, Some(21.44));
    assert_eq!(reading.time, Some(Timestamp::new("2024-03-01T14:05:00Z")));
    assert_eq!(reading.trend, Trend::Rising);
}

#[tokio::test]
async fn test_fetch_history() {
    let addr = serve(sensor_app()).await;
    let window = source_for(addr).fetch_history().await.unwrap();

    assert_eq!(window.len(), 3);
    assert_eq!(window.count, 3);
    assert_eq!(window.temperatures, vec![Some(18.0), None, Some(22.0)]);
    assert_eq!(window.timestamps[2], Timestamp::from_millis(1_709_301_660_000));
}

#[tokio::test]
async fn test_missing_fields_take_defaults() {
    let app = Router::new()
        .route("/api/latest", get(|| async { Json(json!({})) }))
        .route(
            "/api/history",
            get(|| async { Json(json!({ "lastTimestamps": null })) }),
        );
    let source = source_for(serve(app).await);

    let reading = source.fetch_latest().await.unwrap();
    assert_eq!(reading.temperature, None);
    assert_eq!(reading.time, None);
    assert_eq!(reading.trend, Trend::Stable);

    let window = source.fetch_history().await.unwrap();
    assert!(window.is_empty());
    assert_eq!(window.count, 0);
}

#[tokio::test]
async fn test_server_error_status() {
    let app = Router::new().route(
        "/api/latest",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "sensor offline") }),
    );
    let err = source_for(serve(app).await).fetch_latest().await.unwrap_err();

    match err {
        FetchError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "sensor offline");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_uses_reason() {
    let err = source_for(serve(Router::new()).await)
        .fetch_history()
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let app = Router::new().route("/api/latest", get(|| async { "not json" }));
    let err = source_for(serve(app).await).fetch_latest().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source_for(addr).fetch_latest().await.unwrap_err();
    assert!(matches!(err, FetchError::Unavailable));
    assert!(err.is_network());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let app = Router::new().route(
        "/api/latest",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "temperature": 20.0 }))
        }),
    );
    let err = source_for(serve(app).await).fetch_latest().await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout));
}

#[tokio::test]
async fn test_pollers_over_http() {
    let source: Arc<dyn SensorSource> = Arc::new(source_for(serve(sensor_app()).await));

    let latest = Poller::mount(LatestFeed::new(Arc::clone(&source)), PollOptions::default());
    let history = Poller::mount(HistoryFeed::new(source), PollOptions::default());

    let mut latest_rx = latest.subscribe();
    let mut history_rx = history.subscribe();

    tokio::time::timeout(Duration::from_secs(5), latest_rx.wait_for(|s| !s.loading))
        .await
        .unwrap()
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), history_rx.wait_for(|s| !s.loading))
        .await
        .unwrap()
        .unwrap();

    let state = latest.snapshot();
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.data.unwrap().temperature, Some(21.44));

    let state = history.snapshot();
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.data.unwrap().len(), 3);

    latest.unmount();
    history.unmount();
}

#[tokio::test]
async fn test_history_error_over_http() {
    let app = Router::new().route(
        "/api/history",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let source: Arc<dyn SensorSource> = Arc::new(source_for(serve(app).await));
    let history = Poller::mount(HistoryFeed::new(source), PollOptions::default());

    let mut rx = history.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| !s.loading))
        .await
        .unwrap()
        .unwrap();

    let state = history.snapshot();
    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(
        state.error.as_deref(),
        Some("Could not load temperature history: HTTP error 503: Service Unavailable")
    );
    assert!(state.data.is_none());
}
