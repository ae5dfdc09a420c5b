use model::route::Route;
use model::service::Document;

/// Returns every route a document's journey patterns can run against: the
/// routes reconstructed from `Routes`/`RouteSections` (preferred), plus a
/// fallback route projected from a journey pattern's own timing links for
/// any journey pattern whose `RouteRef` doesn't resolve to one of those.
///
/// This is the same shape either way - `{routeId, routeLinkIds, stopPoints,
/// distances, directions}` - so the Schedule Expander never has to know
/// which path produced a given route.
pub fn reconstruct(document: &Document) -> Vec<Route> {
    let mut routes = document.routes.clone();

    for service in &document.services {
        for journey_pattern in &service.journey_patterns {
            let route_id = journey_pattern.route_ref.clone().unwrap_or_default();
            if routes.iter().any(|route| route.route_id == route_id) {
                continue;
            }
            if let Some(fallback) = fallback_route(document, journey_pattern, &route_id) {
                routes.push(fallback);
            }
        }
    }

    routes
}

fn fallback_route(
    document: &Document,
    journey_pattern: &model::service::JourneyPattern,
    route_id: &str,
) -> Option<Route> {
    let mut stop_point_refs = Vec::new();
    let mut route_link_ids = Vec::new();
    let mut distances_metres = Vec::new();
    let mut directions = Vec::new();

    for section_ref in &journey_pattern.journey_pattern_section_refs {
        let section = document
            .journey_pattern_sections
            .iter()
            .find(|section| &section.journey_pattern_section_id == section_ref)?;

        for link in &section.timing_links {
            if stop_point_refs.is_empty() {
                stop_point_refs.push(link.from_stop_point_ref.clone());
            }
            stop_point_refs.push(link.to_stop_point_ref.clone());
            route_link_ids.push(link.route_link_ref.clone().unwrap_or_default());

            let route_link = link
                .route_link_ref
                .as_deref()
                .and_then(|id| document.route_links.iter().find(|rl| rl.route_link_id == id));
            distances_metres.push(route_link.and_then(|rl| rl.distance_metres));
            directions.push(route_link.and_then(|rl| rl.direction.clone()));
        }
    }

    if stop_point_refs.is_empty() {
        return None;
    }

    Some(Route {
        route_id: route_id.to_string(),
        description: None,
        route_link_ids,
        stop_point_refs,
        distances_metres,
        directions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use model::calendar::DateRange;
    use model::service::{JourneyPattern, JourneyPatternSection, JourneyPatternTimingLink, Service};

    fn document_without_routes() -> Document {
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
            journey_pattern_id: "JP1".to_string(),
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
        Document {
            file_name: "test.xml".to_string(),
            schema_version: None,
            revision_number: None,
            services: vec![service],
            journey_pattern_sections: vec![section],
            vehicle_journeys: Vec::new(),
            routes: Vec::new(),
            route_links: Vec::new(),
            serviced_organisations: Vec::new(),
            operators: Vec::new(),
            stop_points: Vec::new(),
        }
    }

    #[test]
    fn falls_back_to_the_journey_pattern_timing_links_when_routes_are_absent() {
        let document = document_without_routes();
        let routes = reconstruct(&document);
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.route_id, "R1");
        assert_eq!(route.stop_point_refs, vec!["A".to_string(), "B".to_string()]);
        assert!(route.is_well_formed());
    }
}
