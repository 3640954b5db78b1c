//! Payment HTTP request handlers.

use std::time::{Duration, Instant};

use actix_web::{web, HttpResponse};
use chrono::Utc;
use http_telemetry::RequestContext;
use rand::Rng;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::{Config, PaymentConfig};
use crate::error::{AppError, Result};
use crate::metrics::PaymentMetrics;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount: f64,
}

/// `POST /api/v1/payments` — simulate processing and answer with an
/// approval or a decline. A decline is a normal business outcome, rendered
/// as a structured 400 rather than treated as a fault.
pub async fn process_payment(
    request: web::Json<PaymentRequest>,
    ctx: RequestContext,
    config: web::Data<Config>,
    metrics: web::Data<PaymentMetrics>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    if request.order_id.trim().is_empty() {
        return Err(AppError::Validation("orderId must not be empty".into()));
    }
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }

    let started = Instant::now();
    simulate_processing(&config.payment).await;

    let declined = {
        let mut rng = rand::thread_rng();
        rng.gen_bool(config.payment.decline_rate)
    };
    metrics.record(
        if declined { "declined" } else { "approved" },
        started.elapsed().as_secs_f64(),
    );

    if declined {
        tracing::warn!(
            correlation_id = %ctx.correlation_id,
            order_id = %request.order_id,
            amount = request.amount,
            "payment declined"
        );
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "status": "declined",
            "error": "Card declined",
            "orderId": request.order_id,
        })));
    }

    let payment_id = Uuid::new_v4().to_string();
    tracing::info!(
        correlation_id = %ctx.correlation_id,
        order_id = %request.order_id,
        payment_id = %payment_id,
        amount = request.amount,
        "payment approved"
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "approved",
        "paymentId": payment_id,
        "orderId": request.order_id,
        "amount": request.amount,
    })))
}

/// `GET /health` — liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": crate::server::SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn simulate_processing(config: &PaymentConfig) {
    let delay_ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(config.delay_min_ms..=config.delay_max_ms)
    };
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
