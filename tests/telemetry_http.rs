// tests/telemetry_http.rs
use axum::body::{self, Body};
use http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use hackathon_radar::telemetry::Metrics;

async fn get(app: axum::Router, path: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn healthz_is_ok() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let (status, body) = get(Metrics::router_for(handle), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn metrics_renders_recorded_series() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::with_local_recorder(&recorder, || {
        metrics::counter!("cycles_total").increment(2);
        metrics::counter!("deliveries_total", "transport" => "log").increment(1);
    });

    let (status, body) = get(Metrics::router_for(handle), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("cycles_total 2"), "body:\n{body}");
    assert!(body.contains(r#"deliveries_total{transport="log"} 1"#), "body:\n{body}");
}

#[tokio::test]
async fn unknown_path_is_404() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let (status, _) = get(Metrics::router_for(handle), "/decide").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
