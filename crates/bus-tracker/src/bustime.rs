//! # Bus Time
//!
//! Live vehicle positions from the Clever Devices Bus Time `getvehicles` API.

use anyhow::{Context, Result};
use bytes::Bytes;
use http::Method;
use http_body_util::Empty;
use realtime::{Config, HttpRequest, bad_gateway, invalid_format};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use urlencoding::encode;

const DEFAULT_URL: &str = "https://bustracker.gocarta.org/bustime/api/v3/getvehicles";

/// Fetch the vehicles currently reporting on `route_id`.
///
/// # Errors
///
/// Returns a `BadGateway` error when the API cannot be reached or answers
/// with a non-success status, and `InvalidFormat` when the payload has no
/// `bustime-response.vehicle` list.
pub async fn vehicles<P>(route_id: &str, provider: &P) -> Result<Vec<LiveVehicle>>
where
    P: Config + HttpRequest,
{
    let api_key = Config::get(provider, "CLEVER_BUS_TIME_API_KEY")
        .await
        .context("getting `CLEVER_BUS_TIME_API_KEY`")?;
    let url = Config::get(provider, "BUSTIME_URL").await.unwrap_or_else(|_| {
        tracing::trace!("BUSTIME_URL not set, using default: {DEFAULT_URL}");
        DEFAULT_URL.to_string()
    });

    let request = http::Request::builder()
        .method(Method::GET)
        .uri(format!("{url}?format=json&key={}&rt={}", encode(&api_key), encode(route_id)))
        .body(Empty::<Bytes>::new())
        .context("building Bus Time request")?;

    let response = HttpRequest::fetch(provider, request)
        .await
        .map_err(|e| bad_gateway!("calling Bus Time API: {e:#}"))?;
    if !response.status().is_success() {
        return Err(bad_gateway!("Bus Time API returned {}", response.status()).into());
    }

    let body = response.into_body();
    debug!(route = %route_id, payload = %String::from_utf8_lossy(&body), "Bus Time response");

    let vehicles = parse(&body)?;
    info!(monotonic_counter.live_vehicles = vehicles.len(), route = %route_id);

    Ok(vehicles)
}

// Extract `bustime-response.vehicle`, failing when it is absent.
fn parse(body: &[u8]) -> Result<Vec<LiveVehicle>> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| invalid_format!("deserializing Bus Time response: {e}"))?;

    let BustimeResponse { vehicle, error } = envelope.response;
    let Some(vehicles) = vehicle else {
        let reasons = error.iter().map(|e| e.msg.as_str()).collect::<Vec<_>>().join("; ");
        if reasons.is_empty() {
            return Err(invalid_format!("`bustime-response.vehicle` missing").into());
        }
        return Err(invalid_format!("`bustime-response.vehicle` missing: {reasons}").into());
    };

    Ok(vehicles)
}

/// A vehicle currently reporting its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveVehicle {
    #[serde(rename = "vid")]
    pub vehicle_id: String,

    #[serde(rename = "lat", deserialize_with = "coordinate")]
    pub latitude: f64,

    #[serde(rename = "lon", deserialize_with = "coordinate")]
    pub longitude: f64,

    #[serde(rename = "tmstmp")]
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "bustime-response")]
    response: BustimeResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BustimeResponse {
    vehicle: Option<Vec<LiveVehicle>>,
    error: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    msg: String,
}

// The v3 API sends coordinates as strings, older versions as numbers.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coordinate {
        Number(f64),
        Text(String),
    }

    match Coordinate::deserialize(deserializer)? {
        Coordinate::Number(n) => Ok(n),
        Coordinate::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}
