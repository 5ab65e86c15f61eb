//! # Bus Tracker
//!
//! Merges live Bus Time vehicle positions with the most recent recorded
//! position of any rostered vehicle not currently reporting, producing a
//! GeoJSON `FeatureCollection`.

mod bustime;
mod config;
mod geojson;
mod handler;
mod position;

pub use realtime::{Config, Error, HttpRequest, PositionStore, Reply, Result, StoredPosition};

pub use self::bustime::*;
pub use self::config::*;
pub use self::geojson::*;
pub use self::handler::*;
pub use self::position::*;

/// Provider entry point implemented by the host application.
pub trait Provider: Config + HttpRequest + PositionStore {}

impl<T> Provider for T where T: Config + HttpRequest + PositionStore {}
