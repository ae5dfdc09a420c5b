use std::collections::BTreeMap;

use chrono::Duration;
use model::calendar::OperatingProfile;
use model::service::{Departure, Document, JourneyPatternTimingLink, Service, VehicleJourney};

/// The flattened, per-stop projection of a `JourneyPattern`'s timing links,
/// with index `0` carrying the first link's `From.*` side and every other
/// index `i` carrying link `i-1`'s `To.*` side.
struct Projection {
    jptl_ids: Vec<Option<String>>,
    stop_chain: Vec<String>,
    runtimes: Vec<Duration>,
    wait_times: Vec<Duration>,
}

fn project(document: &Document, journey_pattern_section_refs: &[String]) -> Option<Projection> {
    let mut links: Vec<&JourneyPatternTimingLink> = Vec::new();
    for section_ref in journey_pattern_section_refs {
        let section = document
            .journey_pattern_sections
            .iter()
            .find(|section| &section.journey_pattern_section_id == section_ref)?;
        links.extend(section.timing_links.iter());
    }
    if links.is_empty() {
        return None;
    }

    let mut jptl_ids = Vec::with_capacity(links.len());
    let mut stop_chain = Vec::with_capacity(links.len() + 1);
    let mut runtimes = Vec::with_capacity(links.len());
    let mut wait_times = Vec::with_capacity(links.len() + 1);

    stop_chain.push(links[0].from_stop_point_ref.clone());
    wait_times.push(links[0].from_wait_time.unwrap_or_default());

    for link in &links {
        jptl_ids.push(link.journey_pattern_timing_link_id.clone());
        runtimes.push(link.run_time);
        stop_chain.push(link.to_stop_point_ref.clone());
        wait_times.push(link.to_wait_time.unwrap_or_default());
    }

    Some(Projection {
        jptl_ids,
        stop_chain,
        runtimes,
        wait_times,
    })
}

/// Applies a `VehicleJourney`'s `VehicleJourneyTimingLink[]` overrides to a
/// cloned copy of `projection.wait_times`, by index of the targeted JPTL.
fn apply_overrides(projection: &Projection, vehicle_journey: &VehicleJourney) -> Vec<Duration> {
    let mut wait_times = projection.wait_times.clone();
    for vjtl in &vehicle_journey.timing_link_overrides {
        let Some(index) = projection
            .jptl_ids
            .iter()
            .position(|id| id.as_deref() == Some(vjtl.journey_pattern_timing_link_ref.as_str()))
        else {
            continue;
        };
        if index == 0 {
            if let Some(wait) = vjtl.from_wait_time {
                wait_times[0] = wait;
            }
        }
        if let Some(wait) = vjtl.to_wait_time {
            wait_times[index + 1] = wait;
        }
    }
    wait_times
}

/// An assembled journey pattern: its stop-by-stop schedule skeleton plus
/// the deduplicated departures that run against it.
#[derive(Debug, Clone)]
pub struct AssembledJourneyPattern {
    pub journey_pattern_id: String,
    pub route_id: Option<String>,
    pub stop_point_refs: Vec<String>,
    pub runtimes: Vec<Duration>,
    pub wait_times: Vec<Duration>,
    pub departures: Vec<Departure>,
    pub vehicle: Option<String>,
    pub vehicle_descriptions: BTreeMap<String, String>,
}

/// What a `VehicleJourney` contributes to the timetable: which journey
/// pattern it runs, at which time, possibly carrying another journey's
/// wait-time overrides when it was only referenced for its departure time.
struct Contribution<'a> {
    journey_pattern_id: &'a str,
    departure_time: chrono::NaiveTime,
    vehicle_journey: &'a VehicleJourney,
}

fn resolve_contribution<'a>(
    vehicle_journey: &'a VehicleJourney,
    all: &'a [VehicleJourney],
) -> Option<Contribution<'a>> {
    if let Some(journey_pattern_id) = &vehicle_journey.journey_pattern_ref {
        return Some(Contribution {
            journey_pattern_id,
            departure_time: vehicle_journey.departure_time?,
            vehicle_journey,
        });
    }
    let referenced_code = vehicle_journey.vehicle_journey_ref.as_ref()?;
    let referenced = all
        .iter()
        .find(|candidate| &candidate.vehicle_journey_code == referenced_code)?;
    let journey_pattern_id = referenced.journey_pattern_ref.as_ref()?;
    Some(Contribution {
        journey_pattern_id,
        departure_time: referenced.departure_time?,
        vehicle_journey,
    })
}

fn effective_profile(vehicle_journey: &VehicleJourney, service: &Service) -> OperatingProfile {
    vehicle_journey
        .operating_profile
        .clone()
        .or_else(|| service.operating_profile.clone())
        .unwrap_or_default()
}

/// One group of departures sharing a deeply-equal operating profile.
struct ScheduleGroup {
    profile: OperatingProfile,
    departures: Vec<chrono::NaiveTime>,
    vehicle_journey_codes: Vec<String>,
    operator_refs: Vec<String>,
}

/// Assembles every live `Service`'s `JourneyPattern`s in `document` into
/// their stop-by-stop schedule skeleton and deduplicated departure groups.
/// A journey pattern whose section refs don't resolve is logged and skipped
/// rather than aborting the run.
pub fn assemble(document: &Document) -> Vec<AssembledJourneyPattern> {
    let mut assembled = Vec::new();

    for service in &document.services {
        for journey_pattern in &service.journey_patterns {
            let Some(projection) = project(document, &journey_pattern.journey_pattern_section_refs)
            else {
                log::warn!(
                    "journey pattern {} in {} has no resolvable timing links, skipping",
                    journey_pattern.journey_pattern_id,
                    document.file_name
                );
                continue;
            };

            let mut groups: Vec<ScheduleGroup> = Vec::new();
            let mut vehicle_descriptions = BTreeMap::new();
            let mut vehicle = None;
            let mut wait_times = projection.wait_times.clone();

            for vehicle_journey in &document.vehicle_journeys {
                let Some(contribution) =
                    resolve_contribution(vehicle_journey, &document.vehicle_journeys)
                else {
                    continue;
                };
                if contribution.journey_pattern_id != journey_pattern.journey_pattern_id {
                    continue;
                }

                if !vehicle_journey.timing_link_overrides.is_empty() {
                    wait_times = apply_overrides(&projection, vehicle_journey);
                }
                if let Some(code) = &vehicle_journey.vehicle_type_code {
                    vehicle_descriptions.insert(
                        code.clone(),
                        vehicle_journey
                            .vehicle_type_description
                            .clone()
                            .unwrap_or_default(),
                    );
                    vehicle = Some(code.clone());
                }

                let profile = effective_profile(vehicle_journey, service);
                let time = contribution.departure_time;

                match groups
                    .iter_mut()
                    .find(|group| group.profile == profile && !group.departures.contains(&time))
                {
                    Some(group) => {
                        group.departures.push(time);
                        group
                            .vehicle_journey_codes
                            .push(vehicle_journey.vehicle_journey_code.clone());
                        if let Some(operator) = &vehicle_journey.operator_ref {
                            group.operator_refs.push(operator.clone());
                        }
                    }
                    None => groups.push(ScheduleGroup {
                        profile,
                        departures: vec![time],
                        vehicle_journey_codes: vec![vehicle_journey.vehicle_journey_code.clone()],
                        operator_refs: vehicle_journey.operator_ref.clone().into_iter().collect(),
                    }),
                }
            }
            let departures = groups
                .into_iter()
                .flat_map(|group| {
                    group.departures.into_iter().map(move |time| Departure {
                        departure_time: time,
                        operating_profile: group.profile.clone(),
                        stop_point_refs: projection.stop_chain.clone(),
                        vehicle_journey_codes: group.vehicle_journey_codes.clone(),
                        operator_refs: group.operator_refs.clone(),
                    })
                })
                .collect();

            assembled.push(AssembledJourneyPattern {
                journey_pattern_id: journey_pattern.journey_pattern_id.clone(),
                route_id: journey_pattern.route_ref.clone(),
                stop_point_refs: projection.stop_chain.clone(),
                runtimes: projection.runtimes.clone(),
                wait_times,
                departures,
                vehicle,
                vehicle_descriptions,
            });
        }
    }

    assembled
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::calendar::{DateRange, WeekPattern};
    use model::service::{JourneyPattern, JourneyPatternSection};

    fn document_with_indirection() -> Document {
        let section = JourneyPatternSection {
            journey_pattern_section_id: "JPS1".to_string(),
            timing_links: vec![JourneyPatternTimingLink {
                journey_pattern_timing_link_id: Some("JPTL1".to_string()),
                route_link_ref: Some("RL1".to_string()),
                from_stop_point_ref: "A".to_string(),
                to_stop_point_ref: "B".to_string(),
                run_time: Duration::minutes(5),
                from_wait_time: None,
                to_wait_time: None,
            }],
        };
        let journey_pattern = JourneyPattern {
            journey_pattern_id: "JP7".to_string(),
            route_ref: Some("R1".to_string()),
            direction: None,
            journey_pattern_section_refs: vec!["JPS1".to_string()],
        };
        let service = Service {
            service_code: "S1".to_string(),
            line_names: vec!["23".to_string()],
            operator_ref: None,
            origin: "Leeds".to_string(),
            destination: "York".to_string(),
            operating_period: DateRange { start: None, end: None, note: None },
            operating_profile: None,
            journey_patterns: vec![journey_pattern],
        };
        let v2 = VehicleJourney {
            vehicle_journey_code: "V2".to_string(),
            service_ref: "S1".to_string(),
            line_ref: None,
            journey_pattern_ref: Some("JP7".to_string()),
            vehicle_journey_ref: None,
            departure_time: Some(chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
            operating_profile: None,
            operator_ref: None,
            vehicle_type_code: None,
            vehicle_type_description: None,
            timing_link_overrides: Vec::new(),
        };
        let v1 = VehicleJourney {
            vehicle_journey_code: "V1".to_string(),
            service_ref: "S1".to_string(),
            line_ref: None,
            journey_pattern_ref: None,
            vehicle_journey_ref: Some("V2".to_string()),
            departure_time: None,
            operating_profile: Some(OperatingProfile {
                regular_days: WeekPattern::monday_to_friday(),
                ..OperatingProfile::default()
            }),
            operator_ref: Some("OP1".to_string()),
            vehicle_type_code: None,
            vehicle_type_description: None,
            timing_link_overrides: Vec::new(),
        };

        Document {
            file_name: "test.xml".to_string(),
            schema_version: None,
            revision_number: None,
            services: vec![service],
            journey_pattern_sections: vec![section],
            vehicle_journeys: vec![v2, v1],
            routes: Vec::new(),
            route_links: Vec::new(),
            serviced_organisations: Vec::new(),
            operators: Vec::new(),
            stop_points: Vec::new(),
        }
    }

    #[test]
    fn a_vehicle_journey_ref_attributes_its_departure_to_the_referenced_pattern() {
        let document = document_with_indirection();
        let assembled = assemble(&document);
        assert_eq!(assembled.len(), 1);
        let jp = &assembled[0];
        // V2 contributes its own direct departure and V1 separately
        // contributes the same clock time under its own, distinct
        // operating profile via VehicleJourneyRef indirection - these are
        // two different calendar rules, not duplicates, so they stay two
        // separate departures rather than merging into one.
        assert_eq!(jp.departures.len(), 2);

        let indirect = jp
            .departures
            .iter()
            .find(|departure| departure.vehicle_journey_codes == vec!["V1".to_string()])
            .expect("V1's indirected departure");
        assert_eq!(indirect.departure_time, chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(indirect.operating_profile.regular_days, WeekPattern::monday_to_friday());

        let direct = jp
            .departures
            .iter()
            .find(|departure| departure.vehicle_journey_codes == vec!["V2".to_string()])
            .expect("V2's direct departure");
        assert_eq!(direct.departure_time, chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(direct.operating_profile, OperatingProfile::default());
    }
}
