//! Integration Tests for the HTTP API
//! Router-level checks for the positions and health endpoints

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use tradeops_core::api;
use tradeops_core::observability::health::HealthState;

fn app() -> axum::Router {
    let state = HealthState::new();
    state.ready.store(true, std::sync::atomic::Ordering::Relaxed);
    api::router(state)
}

fn post_positions(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/positions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn trade_json(symbol: &str, side: &str, quantity: i64, price: &str) -> Value {
    json!({
        "symbol": symbol,
        "instrumentType": "EQUITY",
        "side": side,
        "quantity": quantity,
        "price": price,
        "tradeTime": "2026-01-15T14:30:00Z",
        "portfolioId": "5f2b7c1e-8a4d-4e0b-9c3f-2d6a1b0e7f55",
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let response = app()
        .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_version() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_positions_happy_path() {
    let body = json!([
        trade_json("AAPL", "BUY", 100, "100.00"),
        trade_json("AAPL", "BUY", 100, "200.00"),
        trade_json("GOOGL", "BUY", 50, "2800.00"),
    ]);

    let response = app().oneshot(post_positions(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let positions = body_json(response).await;
    assert_eq!(positions["AAPL"]["netQuantity"], 200);
    assert_eq!(
        positions["AAPL"]["avgPrice"].as_str().unwrap().parse::<f64>().unwrap(),
        150.0
    );
    assert_eq!(positions["GOOGL"]["netQuantity"], 50);
    assert_eq!(positions["AAPL"]["instrument"]["symbol"], "AAPL");
}

#[tokio::test]
async fn test_null_trade_list_is_invalid_input() {
    let response = app().oneshot(post_positions(Value::Null)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn test_null_trade_element_is_invalid_input() {
    let body = json!([trade_json("AAPL", "BUY", 100, "150.00"), Value::Null]);

    let response = app().oneshot(post_positions(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_input");
    assert_eq!(body["error"], "trade at index 1 is missing");
}

#[tokio::test]
async fn test_invalid_quantity_is_invalid_input() {
    let body = json!([trade_json("AAPL", "BUY", 0, "150.00")]);

    let response = app().oneshot(post_positions(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn test_oversell_is_domain_violation() {
    let body = json!([trade_json("AAPL", "SELL", 50, "150.00")]);

    let response = app().oneshot(post_positions(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["code"], "domain_violation");
    assert!(body["error"].as_str().unwrap().contains("AAPL"));
}

#[tokio::test]
async fn test_empty_trade_list_returns_empty_map() {
    let response = app().oneshot(post_positions(json!([]))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({}));
}
