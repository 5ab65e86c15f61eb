#![allow(missing_docs)]

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use bus_tracker::{Config, HttpRequest, PositionStore, StoredPosition};
use bytes::Bytes;
use http::{Request, Response, StatusCode};

pub const API_KEY: &str = "test-key";
pub const BUSTIME_URL: &str = "http://localhost:8080/bustime/api/v3/getvehicles";

#[derive(Clone)]
pub struct MockProvider {
    status: StatusCode,
    body: Bytes,
    positions: HashMap<String, Vec<StoredPosition>>,
    store_offline: bool,
    requests: Arc<Mutex<Vec<String>>>,
    lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockProvider {
    /// Provider answering the Bus Time API with `body`.
    #[must_use]
    pub fn new(body: &[u8]) -> Self {
        Self {
            status: StatusCode::OK,
            body: Bytes::copy_from_slice(body),
            positions: HashMap::new(),
            store_offline: false,
            requests: Arc::default(),
            lookups: Arc::default(),
        }
    }

    #[must_use]
    pub const fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Record a stored position row.
    #[must_use]
    pub fn position(mut self, vehicle_id: &str, lat: &str, lon: &str, timestamp: &str) -> Self {
        self.positions.entry(vehicle_id.to_string()).or_default().push(StoredPosition {
            vehicle_id: vehicle_id.to_string(),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            timestamp: timestamp.to_string(),
        });
        self
    }

    #[must_use]
    pub const fn store_offline(mut self) -> Self {
        self.store_offline = true;
        self
    }

    /// URIs of outbound HTTP requests, in order.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }

    /// Vehicle identifiers looked up in the position store, in order.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lock").iter().map(|(_, id)| id.clone()).collect()
    }

    /// Tables queried by position store lookups, in order.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        self.lookups.lock().expect("lock").iter().map(|(table, _)| table.clone()).collect()
    }
}

impl HttpRequest for MockProvider {
    async fn fetch<T>(&self, request: Request<T>) -> Result<Response<Bytes>>
    where
        T: http_body::Body + Send + 'static,
        T::Data: Send,
        T::Error: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        self.requests.lock().expect("lock").push(request.uri().to_string());

        if request.uri().path() != "/bustime/api/v3/getvehicles" {
            return Err(anyhow!("unknown path: {}", request.uri().path()));
        }

        Response::builder()
            .status(self.status)
            .body(self.body.clone())
            .context("failed to build response")
    }
}

impl Config for MockProvider {
    async fn get(&self, key: &str) -> Result<String> {
        match key {
            "CLEVER_BUS_TIME_API_KEY" => Ok(API_KEY.to_string()),
            "BUSTIME_URL" => Ok(BUSTIME_URL.to_string()),
            _ => Err(anyhow!("unknown config key: {key}")),
        }
    }
}

impl PositionStore for MockProvider {
    async fn latest(&self, table: &str, vehicle_id: &str) -> Result<Option<StoredPosition>> {
        self.lookups.lock().expect("lock").push((table.to_string(), vehicle_id.to_string()));

        if self.store_offline {
            return Err(anyhow!("connection refused"));
        }

        let latest = self
            .positions
            .get(vehicle_id)
            .and_then(|rows| rows.iter().max_by(|a, b| a.timestamp.cmp(&b.timestamp)))
            .cloned();
        Ok(latest)
    }
}
