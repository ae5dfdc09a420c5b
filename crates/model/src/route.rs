use serde::{Deserialize, Serialize};

use crate::stop::Coordinates;

/// The geometry of one hop along a route: the two stops it connects, the
/// distance between them, an optional tracing of intermediate track points
/// and the direction TransXChange recorded for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLink {
    pub route_link_id: String,
    pub from_stop_point_ref: String,
    pub to_stop_point_ref: String,
    pub distance_metres: Option<f64>,
    pub track: Vec<Coordinates>,
    pub direction: Option<String>,
}

/// A reconstructed route: the stop sequence and per-hop geometry, built
/// either from `Routes`/`RouteSection`/`RouteLink` (preferred) or projected
/// from a `JourneyPatternSection`'s timing links (fallback).
///
/// Invariant: `stop_point_refs.len() == route_link_ids.len() + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: String,
    pub description: Option<String>,
    pub route_link_ids: Vec<String>,
    pub stop_point_refs: Vec<String>,
    pub distances_metres: Vec<Option<f64>>,
    pub directions: Vec<Option<String>>,
}

impl Route {
    pub fn is_well_formed(&self) -> bool {
        self.stop_point_refs.len() == self.route_link_ids.len() + 1
            && self.distances_metres.len() == self.route_link_ids.len()
            && self.directions.len() == self.route_link_ids.len()
    }
}
