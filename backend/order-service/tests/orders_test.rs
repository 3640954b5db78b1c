//! Integration tests for the order endpoint against stub payment backends.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{test, web, App, HttpResponse, HttpServer};
use http_telemetry::{DownstreamClient, RequestTracker, Telemetry};
use order_service::config::Config;
use order_service::handlers;
use order_service::metrics::OrderMetrics;
use serde_json::json;

fn test_config() -> Config {
    let mut config = Config::from_env();
    config.order.delay_min_ms = 1;
    config.order.delay_max_ms = 2;
    config
}

fn test_telemetry(name: &str) -> Arc<Telemetry> {
    Telemetry::new(name, "test", "http://localhost:14268/api/traces").expect("telemetry")
}

/// Stub payment-service that either approves everything or declines
/// everything, echoing back the order id it was sent.
fn spawn_payment_stub(decline: bool) -> SocketAddr {
    let handler = move |body: web::Json<serde_json::Value>| async move {
        let order_id = body["orderId"].clone();
        if decline {
            HttpResponse::BadRequest().json(json!({
                "status": "declined",
                "error": "Card declined",
                "orderId": order_id,
            }))
        } else {
            HttpResponse::Ok().json(json!({
                "status": "approved",
                "paymentId": "pay-stub-1",
                "orderId": order_id,
                "amount": body["amount"].clone(),
            }))
        }
    };

    let server = HttpServer::new(move || {
        App::new().route("/api/v1/payments", web::post().to(handler))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind payment stub");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    addr
}

async fn call_create_order(
    payment_addr: &str,
    metrics: OrderMetrics,
    telemetry: Arc<Telemetry>,
    body: serde_json::Value,
) -> actix_web::dev::ServiceResponse {
    let payments = DownstreamClient::new("payment-service", payment_addr);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_config()))
            .app_data(web::Data::new(metrics))
            .app_data(web::Data::new(payments))
            .wrap(RequestTracker::new(telemetry))
            .route("/api/v1/orders", web::post().to(handlers::create_order)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(body)
        .to_request();
    test::call_service(&app, req).await
}

#[actix_web::test]
async fn approved_payment_completes_the_order() {
    let telemetry = test_telemetry("order-complete");
    let metrics = OrderMetrics::register(telemetry.registry()).expect("metrics");
    let payment_addr = spawn_payment_stub(false);

    let resp = call_create_order(
        &format!("http://{payment_addr}"),
        metrics.clone(),
        telemetry,
        json!({"total": 42.5}),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["total"], 42.5);
    let order_id = body["orderId"].as_str().unwrap();
    assert!(!order_id.is_empty());
    assert_eq!(body["payment"]["status"], "approved");
    assert_eq!(body["payment"]["orderId"], order_id);
    assert_eq!(body["payment"]["amount"], 42.5);

    assert_eq!(
        metrics.orders_total.with_label_values(&["completed"]).get(),
        1
    );
}

#[actix_web::test]
async fn declined_payment_propagates_status_and_error_text() {
    let telemetry = test_telemetry("order-declined");
    let metrics = OrderMetrics::register(telemetry.registry()).expect("metrics");
    let payment_addr = spawn_payment_stub(true);

    let resp = call_create_order(
        &format!("http://{payment_addr}"),
        metrics.clone(),
        telemetry,
        json!({"total": 10.0}),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Card declined");

    assert_eq!(metrics.orders_total.with_label_values(&["failed"]).get(), 1);
}

#[actix_web::test]
async fn unreachable_payment_service_synthesizes_a_500() {
    let telemetry = test_telemetry("order-unreachable");
    let metrics = OrderMetrics::register(telemetry.registry()).expect("metrics");

    let resp = call_create_order(
        "http://127.0.0.1:9",
        metrics.clone(),
        telemetry,
        json!({"total": 10.0}),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("payment call failed"));

    assert_eq!(metrics.orders_total.with_label_values(&["failed"]).get(), 1);
}

#[actix_web::test]
async fn non_positive_total_fails_validation_without_a_payment_call() {
    let telemetry = test_telemetry("order-validation");
    let metrics = OrderMetrics::register(telemetry.registry()).expect("metrics");

    // No stub is running; validation must reject before any downstream call.
    let resp = call_create_order(
        "http://127.0.0.1:9",
        metrics.clone(),
        telemetry,
        json!({"total": -1.0}),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "total must be positive");

    assert_eq!(metrics.processing_duration_seconds.get_sample_count(), 0);
}
