//! # Provider
//!
//! Provider defines external data interfaces for the crate.

use std::error::Error;

use anyhow::Result;
use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;
use serde::{Deserialize, Serialize};

/// The `HttpRequest` trait defines the behavior for fetching data from a source.
pub trait HttpRequest: Send + Sync {
    /// Make outbound HTTP request.
    fn fetch<T>(&self, request: Request<T>) -> impl Future<Output = Result<Response<Bytes>>> + Send
    where
        T: Body + Send + 'static,
        T::Data: Send,
        T::Error: Into<Box<dyn Error + Send + Sync + 'static>>;
}

/// The `Config` trait is used by implementers to provide configuration
/// settings to dependent crates.
pub trait Config: Send + Sync {
    /// Request configuration setting.
    fn get(&self, key: &str) -> impl Future<Output = Result<String>> + Send;
}

/// A vehicle position as persisted by the position recorder.
///
/// Latitude and longitude are kept in their stored fixed-point form (e.g.
/// `+350456789`); decoding is left to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPosition {
    pub vehicle_id: String,
    pub latitude: String,
    pub longitude: String,
    pub timestamp: String,
}

/// The `PositionStore` trait defines read access to recorded vehicle
/// positions.
pub trait PositionStore: Send + Sync {
    /// Most recent position recorded for `vehicle_id` in `table`, if any.
    fn latest(
        &self, table: &str, vehicle_id: &str,
    ) -> impl Future<Output = Result<Option<StoredPosition>>> + Send;
}
