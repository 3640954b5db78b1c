//! Order HTTP request handlers.

use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use http_telemetry::{DownstreamClient, RequestContext};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, OrderConfig};
use crate::error::{AppError, Result};
use crate::metrics::OrderMetrics;

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequest<'a> {
    order_id: &'a str,
    amount: f64,
}

/// `POST /api/v1/orders` — create an order and charge it through
/// payment-service. A structured payment failure keeps its HTTP status and
/// error text on the way up; only transport failures are synthesized into a
/// local 500.
pub async fn create_order(
    request: web::Json<OrderRequest>,
    ctx: RequestContext,
    config: web::Data<Config>,
    metrics: web::Data<OrderMetrics>,
    payments: web::Data<DownstreamClient>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    if !request.total.is_finite() || request.total <= 0.0 {
        return Err(AppError::Validation("total must be positive".into()));
    }

    let order_id = Uuid::new_v4().to_string();
    let started = Instant::now();
    tracing::info!(
        correlation_id = %ctx.correlation_id,
        order_id = %order_id,
        total = request.total,
        "processing order"
    );

    simulate_processing(&config.order).await;

    let payment_request = PaymentRequest {
        order_id: &order_id,
        amount: request.total,
    };
    let reply = match payments
        .post_json("/api/v1/payments", &payment_request, &ctx)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            metrics.record("failed", started.elapsed().as_secs_f64());
            tracing::error!(
                correlation_id = %ctx.correlation_id,
                order_id = %order_id,
                error = %err,
                "payment call failed"
            );
            return Err(err.into());
        }
    };

    let elapsed = started.elapsed().as_secs_f64();
    if reply.is_success() {
        metrics.record("completed", elapsed);
        tracing::info!(
            correlation_id = %ctx.correlation_id,
            order_id = %order_id,
            "order completed"
        );
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "completed",
            "orderId": order_id,
            "total": request.total,
            "payment": reply.body,
        })))
    } else {
        metrics.record("failed", elapsed);
        let error = reply
            .error_text()
            .unwrap_or("payment was not approved")
            .to_owned();
        let status =
            StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::warn!(
            correlation_id = %ctx.correlation_id,
            order_id = %order_id,
            payment_status = reply.status,
            error = %error,
            "order failed"
        );
        Ok(HttpResponse::build(status).json(serde_json::json!({
            "status": "failed",
            "error": error,
        })))
    }
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

async fn simulate_processing(config: &OrderConfig) {
    let delay_ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(config.delay_min_ms..=config.delay_max_ms)
    };
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
