//! # GeoJSON
//!
//! The response shape: a `FeatureCollection` of vehicle `Point` features.

use serde::{Deserialize, Serialize};

use crate::bustime::LiveVehicle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    #[default]
    Point,
}

/// Vehicle features in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Identifiers of the features, in order.
    #[must_use]
    pub fn vehicle_ids(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.properties.vehicle_id.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub properties: Properties,
    pub geometry: Geometry,
}

impl Feature {
    /// A point feature for a vehicle at the given position.
    #[must_use]
    pub fn point(
        vehicle_id: impl Into<String>, latitude: f64, longitude: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            kind: FeatureType::Feature,
            properties: Properties {
                vehicle_id: vehicle_id.into(),
                latitude,
                longitude,
                timestamp: timestamp.into(),
            },
            geometry: Geometry { kind: GeometryType::Point, coordinates: [longitude, latitude] },
        }
    }
}

impl From<LiveVehicle> for Feature {
    fn from(vehicle: LiveVehicle) -> Self {
        Self::point(vehicle.vehicle_id, vehicle.latitude, vehicle.longitude, vehicle.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

/// GeoJSON point. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}
