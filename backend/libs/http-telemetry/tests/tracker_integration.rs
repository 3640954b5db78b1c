//! Lifecycle tracker behavior through a real actix service chain.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::Service;
use actix_web::{test, web, App, HttpResponse};
use futures::future::join_all;
use http_telemetry::{RequestContext, RequestTracker, Telemetry, TraceContext, TRACE_CONTEXT_HEADER};

fn test_telemetry(name: &str) -> Arc<Telemetry> {
    Telemetry::new(name, "test", "http://localhost:14268/api/traces").expect("telemetry")
}

async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

async fn failing_handler() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({"error": "boom"}))
}

async fn slow_handler() -> HttpResponse {
    tokio::time::sleep(Duration::from_millis(50)).await;
    HttpResponse::Ok().finish()
}

async fn echo_context(ctx: RequestContext) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "traceId": ctx.trace.trace_id_hex(),
        "spanId": ctx.trace.span_id_hex(),
        "parentSpanId": ctx.trace.parent_span_id_hex(),
        "correlationId": ctx.correlation_id,
    }))
}

#[actix_web::test]
async fn completed_request_is_counted_exactly_once() {
    let telemetry = test_telemetry("tracker-ok");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/ok", web::get().to(ok_handler)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
    assert!(resp.status().is_success());

    let http = telemetry.http();
    assert_eq!(http.requests_in_flight.get(), 0);
    assert_eq!(
        http.requests_total
            .with_label_values(&["GET", "/ok", "2xx"])
            .get(),
        1
    );
    assert_eq!(
        http.request_duration_seconds
            .with_label_values(&["GET", "/ok", "2xx"])
            .get_sample_count(),
        1
    );
}

#[actix_web::test]
async fn server_errors_count_in_their_status_class() {
    let telemetry = test_telemetry("tracker-5xx");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/fail", web::get().to(failing_handler)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/fail").to_request()).await;
    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(
        telemetry
            .http()
            .requests_total
            .with_label_values(&["GET", "/fail", "5xx"])
            .get(),
        1
    );
}

#[actix_web::test]
async fn health_and_metrics_paths_are_exempt() {
    let telemetry = test_telemetry("tracker-exempt");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/health", web::get().to(ok_handler)),
    )
    .await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());

    assert_eq!(telemetry.http().requests_in_flight.get(), 0);
    assert_eq!(
        telemetry
            .http()
            .requests_total
            .with_label_values(&["GET", "/health", "2xx"])
            .get(),
        0
    );
}

#[actix_web::test]
async fn burst_returns_gauge_to_baseline() {
    let telemetry = test_telemetry("tracker-burst");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/work", web::get().to(slow_handler)),
    )
    .await;

    let baseline = telemetry.http().requests_in_flight.get();
    let calls = (0..16).map(|_| {
        let req = test::TestRequest::get().uri("/work").to_request();
        app.call(req)
    });
    let results = join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(telemetry.http().requests_in_flight.get(), baseline);
    assert_eq!(
        telemetry
            .http()
            .requests_total
            .with_label_values(&["GET", "/work", "2xx"])
            .get(),
        16
    );
}

#[actix_web::test]
async fn aborted_request_decrements_gauge_without_duration() {
    let telemetry = test_telemetry("tracker-abort");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/work", web::get().to(slow_handler)),
    )
    .await;

    {
        let fut = app.call(test::TestRequest::get().uri("/work").to_request());
        futures::pin_mut!(fut);
        tokio::select! {
            _ = &mut fut => panic!("handler should still be sleeping"),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }
        // Dropping the in-flight future here is the client going away.
    }

    let http = telemetry.http();
    assert_eq!(http.requests_in_flight.get(), 0);
    assert_eq!(
        http.requests_total
            .with_label_values(&["GET", "/work", "2xx"])
            .get(),
        0
    );
    assert_eq!(
        http.request_duration_seconds
            .with_label_values(&["GET", "/work", "2xx"])
            .get_sample_count(),
        0
    );
}

#[actix_web::test]
async fn inbound_trace_header_continues_the_trace() {
    let telemetry = test_telemetry("tracker-trace");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/ctx", web::get().to(echo_context)),
    )
    .await;

    let upstream = TraceContext::new_root();
    let req = test::TestRequest::get()
        .uri("/ctx")
        .insert_header((TRACE_CONTEXT_HEADER, upstream.header_value()))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["traceId"], upstream.trace_id_hex());
    assert_eq!(body["parentSpanId"], upstream.span_id_hex());
    assert_ne!(body["spanId"], upstream.span_id_hex());
    assert!(!body["correlationId"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn missing_trace_header_starts_a_root_trace() {
    let telemetry = test_telemetry("tracker-root");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/ctx", web::get().to(echo_context)),
    )
    .await;

    let req = test::TestRequest::get().uri("/ctx").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["parentSpanId"].is_null());
    assert_eq!(body["traceId"].as_str().unwrap().len(), 32);
}

#[actix_web::test]
async fn unmatched_routes_use_a_bounded_path_label() {
    let telemetry = test_telemetry("tracker-unmatched");
    let app = test::init_service(
        App::new()
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/ok", web::get().to(ok_handler)),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/no-such-route").to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(
        telemetry
            .http()
            .requests_total
            .with_label_values(&["GET", "unmatched", "4xx"])
            .get(),
        1
    );
}
