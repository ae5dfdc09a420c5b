use chrono::NaiveDate;
use model::calendar::active;
use model::service::Document;

/// Whether at least one of `document`'s services is still [`active`] on
/// `today`. A document with no live service is stale: it is recorded in the
/// out-of-date list and excluded from every later stage.
pub fn is_live(document: &Document, today: NaiveDate) -> bool {
    document
        .services
        .iter()
        .any(|service| active(service.operating_period.start, service.operating_period.end, today))
}

/// Splits a batch of parsed documents into the live set and the sorted list
/// of file names judged out of date.
pub fn partition(documents: Vec<Document>, today: NaiveDate) -> (Vec<Document>, Vec<String>) {
    let mut live = Vec::new();
    let mut out_of_date = Vec::new();

    for document in documents {
        if is_live(&document, today) {
            live.push(document);
        } else {
            out_of_date.push(document.file_name.clone());
        }
    }
    out_of_date.sort();
    (live, out_of_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::calendar::DateRange;
    use model::service::Service;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn document(file_name: &str, start: NaiveDate, end: Option<NaiveDate>) -> Document {
        Document {
            file_name: file_name.to_string(),
            schema_version: None,
            revision_number: None,
            services: vec![Service {
                service_code: "S1".to_string(),
                line_names: Vec::new(),
                operator_ref: None,
                origin: String::new(),
                destination: String::new(),
                operating_period: DateRange { start: Some(start), end, note: None },
                operating_profile: None,
                journey_patterns: Vec::new(),
            }],
            journey_pattern_sections: Vec::new(),
            vehicle_journeys: Vec::new(),
            routes: Vec::new(),
            route_links: Vec::new(),
            serviced_organisations: Vec::new(),
            operators: Vec::new(),
            stop_points: Vec::new(),
        }
    }

    #[test]
    fn a_document_whose_operating_period_has_ended_is_stale() {
        let documents = vec![document("a.xml", date(2020, 1, 1), Some(date(2020, 12, 31)))];
        let (live, stale) = partition(documents, date(2024, 6, 1));
        assert!(live.is_empty());
        assert_eq!(stale, vec!["a.xml".to_string()]);
    }

    #[test]
    fn a_document_with_an_open_ended_period_stays_live() {
        let documents = vec![document("b.xml", date(2020, 1, 1), None)];
        let (live, stale) = partition(documents, date(2024, 6, 1));
        assert_eq!(live.len(), 1);
        assert!(stale.is_empty());
    }
}
