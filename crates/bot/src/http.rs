//! Local HTTP endpoint for health checks and Prometheus metrics.

use std::net::{IpAddr, SocketAddr};

use axum::{routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use tracing::info;

use reelbot_core::metrics::REGISTRY;

pub async fn serve(host: IpAddr, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics));

    let addr = SocketAddr::new(host, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Health/metrics endpoint listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Encode all metrics as Prometheus text format.
async fn metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
