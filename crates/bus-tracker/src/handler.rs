//! Vehicle aggregator
//!
//! Build the vehicle `FeatureCollection` for the configured route: every live
//! vehicle first, then the last recorded position of each rostered vehicle
//! that is not reporting.

use std::collections::HashSet;

use anyhow::Context as _;
use futures::future::try_join_all;
use http::HeaderMap;
use realtime::{PositionStore, Reply, Result, bad_gateway};
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::geojson::{Feature, FeatureCollection};
use crate::position::{VehicleKey, clean_number};
use crate::{Provider, bustime};

/// Inbound request for the vehicle collection.
#[derive(Debug, Clone, Default)]
pub struct VehiclesRequest {
    /// Request headers. Currently not consulted.
    pub headers: HeaderMap,
}

/// Aggregate live and recorded vehicle positions.
///
/// Any failure (tracking API, position store, undecodable stored value)
/// fails the whole request; no partial collection is returned.
///
/// # Errors
///
/// Returns `BadGateway` when the tracking API or the position store fails and
/// `InvalidFormat` when either returns data that cannot be interpreted.
pub async fn handle(
    request: VehiclesRequest, config: &TrackerConfig, provider: &impl Provider,
) -> Result<Reply<FeatureCollection>> {
    debug!(headers = request.headers.len(), route = %config.route_id, "vehicles request");

    let mut collection = FeatureCollection::default();
    let mut seen = HashSet::new();

    let live = bustime::vehicles(&config.route_id, provider)
        .await
        .with_context(|| format!("fetching live vehicles for route {}", config.route_id))?;
    for vehicle in live {
        seen.insert(VehicleKey::from(vehicle.vehicle_id.as_str()));
        collection.features.push(vehicle.into());
    }

    let missing = missing(&config.roster, &seen);
    let recorded = if config.concurrent_fallback {
        try_join_all(missing.iter().map(|id| recorded_position(id, config, provider))).await?
    } else {
        let mut recorded = Vec::with_capacity(missing.len());
        for id in &missing {
            recorded.push(recorded_position(id, config, provider).await?);
        }
        recorded
    };

    let found = recorded.into_iter().flatten().collect::<Vec<_>>();
    info!(
        monotonic_counter.fallback_hits = found.len(),
        monotonic_counter.fallback_misses = missing.len() - found.len(),
        route = %config.route_id
    );
    collection.features.extend(found);

    Ok(Reply::ok_json(collection))
}

// Roster members not reporting live, in roster order, each once.
fn missing<'a>(roster: &'a [String], seen: &HashSet<VehicleKey>) -> Vec<&'a str> {
    let mut queued = HashSet::new();
    roster
        .iter()
        .map(String::as_str)
        .filter(|id| {
            let key = VehicleKey::from(*id);
            !seen.contains(&key) && queued.insert(key)
        })
        .collect()
}

// Feature for the most recent recorded position of `vehicle_id`, if any.
async fn recorded_position(
    vehicle_id: &str, config: &TrackerConfig, provider: &impl PositionStore,
) -> anyhow::Result<Option<Feature>> {
    let stored = PositionStore::latest(provider, &config.table_name, vehicle_id)
        .await
        .map_err(|e| bad_gateway!("querying `{}` for {vehicle_id}: {e:#}", config.table_name))?;

    let Some(stored) = stored else {
        debug!(vehicle_id = %vehicle_id, "no recorded position");
        return Ok(None);
    };

    let latitude = clean_number(&stored.latitude)
        .with_context(|| format!("decoding latitude of {vehicle_id}"))?;
    let longitude = clean_number(&stored.longitude)
        .with_context(|| format!("decoding longitude of {vehicle_id}"))?;

    Ok(Some(Feature::point(vehicle_id, latitude, longitude, stored.timestamp)))
}
