use std::collections::{BTreeMap, HashSet};

use model::artefact::{StopOccurrence, StopReconciliation};
use model::service::Document;
use utility::slug::canonicalise;

/// Unions every stop point referenced anywhere in `documents`' embedded
/// `StopPoints` blocks, recording the set of slugs each one appears under.
/// A document's stop points are tagged with every service slug computed
/// for that same document, mirroring how one TNDS file's shared stop table
/// backs every line it describes.
pub fn extract(documents: &[Document]) -> BTreeMap<String, StopOccurrence> {
    let mut stops: BTreeMap<String, StopOccurrence> = BTreeMap::new();

    for document in documents {
        let slugs: Vec<String> = document
            .services
            .iter()
            .map(|service| canonicalise(&service.line_names, &service.origin, &service.destination))
            .collect();

        for stop_point in &document.stop_points {
            let entry = stops.entry(stop_point.atco_code.clone()).or_insert_with(|| StopOccurrence {
                name: stop_point.common_name.clone(),
                locality_ref: stop_point.locality_ref.clone(),
                slugs: Vec::new(),
            });
            for slug in &slugs {
                if !entry.slugs.contains(slug) {
                    entry.slugs.push(slug.clone());
                }
            }
        }
    }

    stops
}

/// Builds the reconciliation report: every stop found in TNDS, plus the
/// subset that NaPTAN has no record of at all.
pub fn reconcile(
    stops: BTreeMap<String, StopOccurrence>,
    naptan_atco_codes: &HashSet<String>,
) -> StopReconciliation {
    let mut stops_tnds_only: Vec<String> = stops
        .keys()
        .filter(|atco_code| !naptan_atco_codes.contains(atco_code.as_str()))
        .cloned()
        .collect();
    stops_tnds_only.sort();

    StopReconciliation { stops, stops_tnds_only }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::calendar::DateRange;
    use model::service::{DocumentStopPoint, Service};

    fn document(file_name: &str, atco_codes: &[&str]) -> Document {
        Document {
            file_name: file_name.to_string(),
            schema_version: None,
            revision_number: None,
            services: vec![Service {
                service_code: "S1".to_string(),
                line_names: vec!["7".to_string()],
                operator_ref: None,
                origin: "King's Cross / St Pancras".to_string(),
                destination: "Oxford Circus".to_string(),
                operating_period: DateRange { start: None, end: None, note: None },
                operating_profile: None,
                journey_patterns: Vec::new(),
            }],
            journey_pattern_sections: Vec::new(),
            vehicle_journeys: Vec::new(),
            routes: Vec::new(),
            route_links: Vec::new(),
            serviced_organisations: Vec::new(),
            operators: Vec::new(),
            stop_points: atco_codes
                .iter()
                .map(|code| DocumentStopPoint {
                    atco_code: code.to_string(),
                    common_name: Some("Stop".to_string()),
                    locality_ref: None,
                })
                .collect(),
        }
    }

    #[test]
    fn a_stop_is_tagged_with_every_slug_from_its_document() {
        let stops = extract(&[document("a.xml", &["340000001"])]);
        assert_eq!(stops["340000001"].slugs, vec!["7-kings-cross-st-pancras-oxford-circus".to_string()]);
    }

    #[test]
    fn stops_absent_from_naptan_are_reported_tnds_only() {
        let stops = extract(&[document("a.xml", &["340000001", "340000002"])]);
        let naptan: HashSet<String> = ["340000001".to_string()].into_iter().collect();
        let reconciliation = reconcile(stops, &naptan);
        assert_eq!(reconciliation.stops_tnds_only, vec!["340000002".to_string()]);
    }
}
