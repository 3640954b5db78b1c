//! HTTP server assembly.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use http_telemetry::{serve_metrics, RequestTracker, Telemetry};

use crate::config::Config;
use crate::handlers;
use crate::metrics::PaymentMetrics;

pub const SERVICE_NAME: &str = "payment-service";

/// Bind and build the HTTP server. Returns the server future and the bound
/// address (the address matters when the configured port is 0).
pub fn serve(
    config: Config,
    telemetry: Arc<Telemetry>,
    metrics: PaymentMetrics,
) -> io::Result<(Server, SocketAddr)> {
    let bind_addr = (config.app.host.clone(), config.app.port);
    let telemetry_data = web::Data::from(telemetry.clone());
    let config_data = web::Data::new(config);
    let metrics_data = web::Data::new(metrics);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(telemetry_data.clone())
            .app_data(config_data.clone())
            .app_data(metrics_data.clone())
            .wrap(RequestTracker::new(telemetry.clone()))
            .route("/health", web::get().to(handlers::health))
            .route("/metrics", web::get().to(serve_metrics))
            .service(
                web::scope("/api/v1")
                    .route("/payments", web::post().to(handlers::process_payment)),
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
