//! Checkout and chaos HTTP request handlers.

use std::time::Instant;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use http_telemetry::{DownstreamClient, RequestContext};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::metrics::GatewayMetrics;

#[derive(Debug, Deserialize, Serialize)]
pub struct CheckoutRequest {
    pub total: f64,
}

/// `POST /api/v1/orders` — forward the checkout to order-service and return
/// its status and body unchanged, success or failure alike.
pub async fn submit_order(
    request: web::Json<CheckoutRequest>,
    ctx: RequestContext,
    metrics: web::Data<GatewayMetrics>,
    orders: web::Data<DownstreamClient>,
) -> Result<HttpResponse> {
    let started = Instant::now();
    let reply = match orders
        .post_json("/api/v1/orders", &request.into_inner(), &ctx)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            metrics.record("failed", started.elapsed().as_secs_f64());
            tracing::error!(
                correlation_id = %ctx.correlation_id,
                error = %err,
                "order call failed"
            );
            return Err(err.into());
        }
    };

    let outcome = if reply.is_success() {
        "completed"
    } else {
        "failed"
    };
    metrics.record(outcome, started.elapsed().as_secs_f64());

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(HttpResponse::build(status).json(reply.body))
}

/// `GET /api/v1/chaos` — failure injection for error-rate dashboards.
pub async fn chaos(ctx: RequestContext, config: web::Data<Config>) -> HttpResponse {
    let fail = {
        let mut rng = rand::thread_rng();
        rng.gen_bool(config.chaos.failure_rate)
    };

    if fail {
        tracing::error!(correlation_id = %ctx.correlation_id, "injected failure triggered");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "error",
            "error": "injected failure",
        }))
    } else {
        HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
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
