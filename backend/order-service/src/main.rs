use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;
use order_service::config::Config;
use order_service::metrics::OrderMetrics;
use order_service::server::{serve, SERVICE_NAME};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Support container healthchecks via CLI subcommand: `healthcheck-http`
    if run_healthcheck_subcommand().await? {
        return Ok(());
    }

    dotenv().ok();
    let config = Config::from_env();
    http_telemetry::init_tracing(SERVICE_NAME, &config.app.env);

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Payment service at {}", config.downstream.payment_url);

    let telemetry = http_telemetry::Telemetry::new(
        SERVICE_NAME,
        &config.app.env,
        &config.telemetry.trace_collector_url,
    )
    .context("failed to initialize telemetry")?;
    let metrics =
        OrderMetrics::register(telemetry.registry()).context("failed to register metrics")?;

    let (server, addr) = serve(config, telemetry.clone(), metrics)
        .context("failed to bind HTTP server")?;
    tracing::info!("Listening on {addr}");

    server.await.context("HTTP server terminated abnormally")?;
    telemetry.flush();
    Ok(())
}

async fn run_healthcheck_subcommand() -> anyhow::Result<bool> {
    let mut args = std::env::args();
    let _bin = args.next();
    match args.next().as_deref() {
        Some("healthcheck") | Some("healthcheck-http") => {
            let port = Config::from_env().app.port;
            let url = format!("http://127.0.0.1:{port}/health");
            let response = reqwest::Client::new()
                .get(&url)
                .timeout(Duration::from_secs(2))
                .send()
                .await
                .context("healthcheck request failed")?;
            anyhow::ensure!(
                response.status().is_success(),
                "healthcheck HTTP status: {}",
                response.status()
            );
            Ok(true)
        }
        _ => Ok(false),
    }
}
