use std::collections::BTreeMap;

use chrono::NaiveDate;
use model::artefact::{SlugIndex, SlugRecord};
use model::calendar::active;
use model::service::Document;
use utility::slug::canonicalise;

/// Builds one [`SlugRecord`] per service across every live document.
pub fn build_index(documents: &[Document]) -> SlugIndex {
    let mut slugs = Vec::new();
    for document in documents {
        for service in &document.services {
            let slug = canonicalise(&service.line_names, &service.origin, &service.destination);
            slugs.push(SlugRecord {
                slug,
                service_code: service.service_code.clone(),
                line_names: service.line_names.clone(),
                origin: service.origin.clone(),
                destination: service.destination.clone(),
                operating_period: service.operating_period.clone(),
                source_file: document.file_name.clone(),
            });
        }
    }
    SlugIndex { slugs }
}

/// Merges a locally-built slug index with a previously-published remote
/// one: local records are kept verbatim; a slug present only remotely
/// contributes only the records still [`active`] on `today`, and is
/// dropped entirely if none survive.
pub fn merge(local: SlugIndex, remote: SlugIndex, today: NaiveDate) -> SlugIndex {
    let local_slugs: std::collections::HashSet<&str> =
        local.slugs.iter().map(|record| record.slug.as_str()).collect();

    let mut by_slug: BTreeMap<String, Vec<SlugRecord>> = BTreeMap::new();
    for record in local.slugs {
        by_slug.entry(record.slug.clone()).or_default().push(record);
    }

    let mut remote_only: BTreeMap<String, Vec<SlugRecord>> = BTreeMap::new();
    for record in remote.slugs {
        if local_slugs.contains(record.slug.as_str()) {
            continue;
        }
        if active(record.operating_period.start, record.operating_period.end, today) {
            remote_only.entry(record.slug.clone()).or_default().push(record);
        }
    }

    for (slug, records) in remote_only {
        by_slug.insert(slug, records);
    }

    SlugIndex {
        slugs: by_slug.into_values().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::calendar::DateRange;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(slug: &str, start: NaiveDate, end: Option<NaiveDate>) -> SlugRecord {
        SlugRecord {
            slug: slug.to_string(),
            service_code: "S1".to_string(),
            line_names: vec!["1".to_string()],
            origin: "A".to_string(),
            destination: "B".to_string(),
            operating_period: DateRange { start: Some(start), end, note: None },
            source_file: "a.xml".to_string(),
        }
    }

    #[test]
    fn a_slug_present_locally_is_kept_unchanged_even_if_remote_has_expired_records() {
        let local = SlugIndex { slugs: vec![record("x", date(2024, 1, 1), None)] };
        let remote = SlugIndex {
            slugs: vec![
                record("x", date(2020, 1, 1), Some(date(2020, 12, 31))),
                record("x", date(2024, 1, 1), None),
            ],
        };
        let merged = merge(local, remote, date(2024, 6, 1));
        assert_eq!(merged.slugs.len(), 1);
        assert_eq!(merged.slugs[0].operating_period.start, Some(date(2024, 1, 1)));
    }

    #[test]
    fn a_remote_only_slug_keeps_only_its_still_active_records() {
        let local = SlugIndex { slugs: Vec::new() };
        let remote = SlugIndex {
            slugs: vec![
                record("y", date(2020, 1, 1), Some(date(2020, 12, 31))),
                record("y", date(2024, 1, 1), None),
            ],
        };
        let merged = merge(local, remote, date(2024, 6, 1));
        assert_eq!(merged.slugs.len(), 1);
        assert_eq!(merged.slugs[0].operating_period.start, Some(date(2024, 1, 1)));
    }

    #[test]
    fn a_remote_only_slug_with_no_surviving_records_is_dropped() {
        let local = SlugIndex { slugs: Vec::new() };
        let remote = SlugIndex {
            slugs: vec![record("z", date(2020, 1, 1), Some(date(2020, 12, 31)))],
        };
        let merged = merge(local, remote, date(2024, 6, 1));
        assert!(merged.slugs.is_empty());
    }
}
