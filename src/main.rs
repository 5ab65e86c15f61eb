//! # Buses
//!
//! Serves the live and last-known positions of the tracked bus fleet as a
//! GeoJSON `FeatureCollection`.

mod provider;
mod routes;

use std::env;

use anyhow::{Context, Result};
use bus_tracker::TrackerConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default().with(filter).with(fmt::layer()).init();

    let config = TrackerConfig::from_env();
    let addr = env::var("BUSES_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let listener = TcpListener::bind(&addr).await.with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, route = %config.route_id, roster = config.roster.len(), "serving vehicles");

    axum::serve(listener, routes::router(config)).await.context("serving requests")
}
