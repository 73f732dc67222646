use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use checkout_sim::checkout::SimulationParams;
use checkout_sim::web::api::{app, create_router};
use tower::ServiceExt; // for .oneshot()

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_run_simulation_returns_result() {
    let (status, json) = get_json(
        app(),
        "/run-simulation?duration=30&cashiers=2&arrival_rate=1.5&service_time=4&basket_behavior=seasonal&seed=9",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for field in [
        "customers_served",
        "avg_queue_length",
        "max_queue_length",
        "avg_wait_time",
        "max_wait_time",
        "cashier_utilization",
        "throughput",
        "basket_behavior",
        "queue_lengths",
        "logs",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(json["basket_behavior"], "seasonal");
    assert_eq!(json["cashiers"], 2);
    assert_eq!(json["seed"], 9);
    assert_eq!(json["queue_lengths"].as_array().unwrap().len(), 30);
    assert!(json["logs"].as_array().unwrap().iter().all(|l| l.is_string()));
}

#[tokio::test]
async fn test_same_seed_same_response() {
    let uri = "/run-simulation?duration=20&seed=123";
    let (_, first) = get_json(app(), uri).await;
    let (_, second) = get_json(app(), uri).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_defaults_come_from_config() {
    let defaults = SimulationParams {
        horizon: 15.0,
        capacity: 3,
        seed: Some(1),
        ..Default::default()
    };
    let (status, json) = get_json(create_router(defaults, true), "/run-simulation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["horizon"], 15.0);
    assert_eq!(json["cashiers"], 3);
    assert_eq!(json["basket_behavior"], "normal");
}

#[tokio::test]
async fn test_invalid_parameters_return_400() {
    let (status, json) = get_json(app(), "/run-simulation?cashiers=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("capacity"));

    let (status, _) = get_json(app(), "/run-simulation?arrival_rate=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

}

#[tokio::test]
async fn test_malformed_query_returns_json_error() {
    for uri in ["/run-simulation?duration=soon", "/run-simulation?cashiers=-1"] {
        let (status, json) = get_json(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].is_string(), "{uri}: {json}");
    }
}

#[tokio::test]
async fn test_cross_origin_get_allowed() {
    let request = Request::builder()
        .uri("/run-simulation?duration=5&seed=3")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight_answered() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/run-simulation")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_cors_disabled_sends_no_headers() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let router = create_router(SimulationParams::default(), false);
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_health() {
    let (status, json) = get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}
