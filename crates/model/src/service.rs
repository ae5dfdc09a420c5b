use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{DateRange, OperatingProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub file_name: String,
    pub schema_version: Option<String>,
    pub revision_number: Option<u32>,
    pub services: Vec<Service>,
    pub journey_pattern_sections: Vec<JourneyPatternSection>,
    pub vehicle_journeys: Vec<VehicleJourney>,
    pub routes: Vec<crate::route::Route>,
    pub route_links: Vec<crate::route::RouteLink>,
    pub serviced_organisations: Vec<crate::calendar::ServicedOrganisation>,
    pub operators: Vec<String>,
    /// The document's own embedded `StopPoints` block - a lighter summary
    /// than a resolved NaPTAN [`AccessNode`](crate::stop::AccessNode), used
    /// only to extract and reconcile ATCO codes against the NaPTAN register.
    pub stop_points: Vec<DocumentStopPoint>,
}

/// One entry from a TransXChange document's root `StopPoints` block,
/// either a full `StopPoint` or an `AnnotatedStopPointRef`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStopPoint {
    pub atco_code: String,
    pub common_name: Option<String>,
    pub locality_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_code: String,
    pub line_names: Vec<String>,
    pub operator_ref: Option<String>,
    pub origin: String,
    pub destination: String,
    pub operating_period: DateRange,
    /// The fallback profile a `VehicleJourney` inherits from when it omits
    /// its own `OperatingProfile`.
    pub operating_profile: Option<OperatingProfile>,
    pub journey_patterns: Vec<JourneyPattern>,
}

/// A `JourneyPattern`: one direction of running for a service, pointing at
/// the route geometry and the ordered timing-link sections that make up its
/// stop-to-stop schedule skeleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPattern {
    pub journey_pattern_id: String,
    pub route_ref: Option<String>,
    pub direction: Option<String>,
    pub journey_pattern_section_refs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPatternSection {
    pub journey_pattern_section_id: String,
    pub timing_links: Vec<JourneyPatternTimingLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPatternTimingLink {
    pub journey_pattern_timing_link_id: Option<String>,
    pub route_link_ref: Option<String>,
    pub from_stop_point_ref: String,
    pub to_stop_point_ref: String,
    pub run_time: chrono::Duration,
    pub from_wait_time: Option<chrono::Duration>,
    pub to_wait_time: Option<chrono::Duration>,
}

/// A single scheduled working of a journey pattern. `vehicle_journey_ref`
/// points at another `VehicleJourney` whose journey-pattern, route and
/// timing-link data should be reused when this journey omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleJourney {
    pub vehicle_journey_code: String,
    pub service_ref: String,
    pub line_ref: Option<String>,
    pub journey_pattern_ref: Option<String>,
    pub vehicle_journey_ref: Option<String>,
    /// Absent when this working only carries a `VehicleJourneyRef` and
    /// inherits its departure time from the journey it points at.
    pub departure_time: Option<NaiveTime>,
    pub operating_profile: Option<OperatingProfile>,
    pub operator_ref: Option<String>,
    pub vehicle_type_code: Option<String>,
    pub vehicle_type_description: Option<String>,
    /// Per-index overrides of this working's activities/wait-times, keyed
    /// by the `JourneyPatternTimingLinkRef` they target.
    pub timing_link_overrides: Vec<VehicleJourneyTimingLinkOverride>,
}

/// A `VehicleJourneyTimingLink` override: this working replaces the
/// projected wait-times at the JPTL it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleJourneyTimingLinkOverride {
    pub journey_pattern_timing_link_ref: String,
    pub from_wait_time: Option<chrono::Duration>,
    pub to_wait_time: Option<chrono::Duration>,
}

/// One deduplicated departure in the assembled timetable for a service: the
/// shared operating profile and vehicle metadata behind every vehicle
/// journey that produced an identical stop-time profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub departure_time: NaiveTime,
    pub operating_profile: OperatingProfile,
    pub stop_point_refs: Vec<String>,
    pub vehicle_journey_codes: Vec<String>,
    pub operator_refs: Vec<String>,
}

/// The per-stop absolute times produced by expanding a [`Departure`] against
/// its route's runtimes and wait times, with day-shift (`*`) carry applied
/// once more than 23 hours have elapsed since the anchor departure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    pub stop_point_ref: String,
    /// The arrival time, or the only time when this stop has no wait.
    pub time: NaiveTime,
    /// The departure time, present only when this stop's wait time is
    /// non-zero and therefore distinct from its arrival.
    pub departure_time: Option<NaiveTime>,
    /// `true` once this stop falls on the day after the anchor departure.
    pub day_shift: bool,
}
