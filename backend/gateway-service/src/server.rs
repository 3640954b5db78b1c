//! HTTP server assembly.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use http_telemetry::{serve_metrics, DownstreamClient, RequestTracker, Telemetry};

use crate::config::Config;
use crate::handlers;
use crate::metrics::GatewayMetrics;

pub const SERVICE_NAME: &str = "gateway-service";

/// Bind and build the HTTP server. Returns the server future and the bound
/// address (the address matters when the configured port is 0).
pub fn serve(
    config: Config,
    telemetry: Arc<Telemetry>,
    metrics: GatewayMetrics,
) -> io::Result<(Server, SocketAddr)> {
    let bind_addr = (config.app.host.clone(), config.app.port);
    let orders = DownstreamClient::new("order-service", &config.downstream.order_url);

    let telemetry_data = web::Data::from(telemetry.clone());
    let config_data = web::Data::new(config);
    let metrics_data = web::Data::new(metrics);
    let orders_data = web::Data::new(orders);

    let server = HttpServer::new(move || {
        let cors = build_cors(&config_data.cors.allowed_origins);
        App::new()
            .app_data(telemetry_data.clone())
            .app_data(config_data.clone())
            .app_data(metrics_data.clone())
            .app_data(orders_data.clone())
            .wrap(cors)
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/health", web::get().to(handlers::health))
            .route("/metrics", web::get().to(serve_metrics))
            .service(
                web::scope("/api/v1")
                    .route("/orders", web::post().to(handlers::submit_order))
                    .route("/chaos", web::get().to(handlers::chaos)),
            )
    })
    .bind(bind_addr)?;

    let addr = server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no bound address"))?;
    Ok((server.run(), addr))
}

fn build_cors(allowed_origins: &str) -> Cors {
    if allowed_origins.trim() == "*" {
        return Cors::permissive();
    }
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600);
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}
