//! HTTP server assembly.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use http_telemetry::{serve_metrics, DownstreamClient, RequestTracker, Telemetry};

use crate::config::Config;
use crate::handlers;
use crate::metrics::OrderMetrics;

pub const SERVICE_NAME: &str = "order-service";

/// Bind and build the HTTP server. Returns the server future and the bound
/// address (the address matters when the configured port is 0).
pub fn serve(
    config: Config,
    telemetry: Arc<Telemetry>,
    metrics: OrderMetrics,
) -> io::Result<(Server, SocketAddr)> {
    let bind_addr = (config.app.host.clone(), config.app.port);
    let payments = DownstreamClient::new("payment-service", &config.downstream.payment_url);

    let telemetry_data = web::Data::from(telemetry.clone());
    let config_data = web::Data::new(config);
    let metrics_data = web::Data::new(metrics);
    let payments_data = web::Data::new(payments);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(telemetry_data.clone())
            .app_data(config_data.clone())
            .app_data(metrics_data.clone())
            .app_data(payments_data.clone())
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/health", web::get().to(handlers::health))
            .route("/metrics", web::get().to(serve_metrics))
            .service(
                web::scope("/api/v1").route("/orders", web::post().to(handlers::create_order)),
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
