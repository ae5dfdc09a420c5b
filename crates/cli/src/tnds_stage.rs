use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use fetch::error::{PipelineError, PipelineResult};
use fetch::ftp::{with_retry, MirrorSession};
use model::service::Document;
use serde_json::json;

use crate::config::Config;
use crate::write::{stem, write_json};

const TNDS_HOST: &str = "ftp.tnds.basemap.co.uk";
const TNDS_DIRECTORY: &str = "/TNDSV2.5";
const REMOTE_SLUG_SNAPSHOT: &str =
    "https://github.com/xavier114fch/naptan/raw/gh-pages/data/tnds/all_slugs.json";

/// Mirrors the TNDS archive, parses every TransXChange document inside it,
/// and runs the full normalisation pipeline: freshness, route
/// reconstruction, timetable assembly, slug indexing and stop
/// reconciliation against the NaPTAN set built by [`crate::naptan_stage`].
pub async fn run(
    client: &reqwest::Client,
    config: &Config,
    naptan_atco_codes: &HashSet<String>,
) -> PipelineResult<()> {
    let username = config
        .tnds_ftp_user
        .as_deref()
        .ok_or(PipelineError::ConfigMissing("TNDS_FTP_USER"))?;
    let password = config
        .tnds_ftp_pwd
        .as_deref()
        .ok_or(PipelineError::ConfigMissing("TNDS_FTP_PWD"))?;

    let root = config.data_root.join("tnds");
    mirror(&root, username, password)?;

    let today = chrono::Local::now().date_naive();
    let documents = load_documents(&root)?;
    log::info!("tnds: parsed {} documents", documents.len());

    let (live, out_of_date) = txc::freshness::partition(documents, today);
    write_json(&root.join("tnds_out_of_date.json"), &out_of_date)?;
    log::info!(
        "tnds: {} documents live, {} out of date",
        live.len(),
        out_of_date.len()
    );

    for document in &live {
        write_document_bundle(&root, document)?;
    }

    if config.emit_timetables {
        for document in &live {
            write_timetables(&root, document)?;
        }
    }

    let local_slugs = txc::slug_index::build_index(&live);
    let remote_slugs = fetch_remote_slug_index(client).await.unwrap_or_default();
    let merged_slugs = txc::slug_index::merge(local_slugs, remote_slugs, today);
    write_json(&root.join("all_slugs.json"), &merged_slugs)?;

    let stops = txc::stops::extract(&live);
    write_json(&root.join("all_stop_points.json"), &stops)?;
    for (atco_code, occurrence) in &stops {
        write_json(
            &root.join("stopPoints").join(format!("{atco_code}.json")),
            occurrence,
        )?;
    }
    let reconciliation = txc::stops::reconcile(stops, naptan_atco_codes);
    write_json(&root.join("stops_tnds_only.json"), &reconciliation.stops_tnds_only)?;

    log::info!(
        "tnds: {} slugs in merged index, {} stops tnds-only",
        merged_slugs.slugs.len(),
        reconciliation.stops_tnds_only.len()
    );
    Ok(())
}

/// Downloads every archive under [`TNDS_DIRECTORY`] that is newer than its
/// local copy and extracts it into a directory named after its stem.
fn mirror(root: &Path, username: &str, password: &str) -> PipelineResult<()> {
    let mut session = with_retry(|| MirrorSession::connect(TNDS_HOST, username, password))?;
    let mut entries = with_retry(|| session.list(TNDS_DIRECTORY))?;
    entries.sort();

    for entry in entries {
        if !entry.to_lowercase().ends_with(".zip") {
            continue;
        }
        let region = stem(&entry).to_string();
        let archive_path = root.join(format!("{region}.zip"));
        let local_mtime = local_mtime(&archive_path);

        let is_newer = with_retry(|| session.is_newer_than(&entry, local_mtime))?;
        if !is_newer {
            log::info!("tnds: {region} is up to date, skipping download");
            continue;
        }

        log::info!("tnds: downloading {region}");
        let bytes = with_retry(|| session.download(&entry))?;
        std::fs::create_dir_all(root)?;
        std::fs::write(&archive_path, &bytes)?;
        fetch::extract_zip(&archive_path, &root.join(&region))?;
    }
    Ok(())
}

fn local_mtime(path: &Path) -> Option<NaiveDateTime> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let since_epoch = modified.duration_since(std::time::UNIX_EPOCH).ok()?;
    chrono::DateTime::from_timestamp(since_epoch.as_secs() as i64, 0).map(|dt| dt.naive_utc())
}

/// Walks `root` for every `.xml` file, in lexicographic order, and parses
/// each one. A document that fails to parse is logged and skipped.
fn load_documents(root: &Path) -> PipelineResult<Vec<Document>> {
    let mut paths = Vec::new();
    collect_xml_paths(root, &mut paths)?;
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let file_name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        let xml = match std::fs::read_to_string(&path) {
            Ok(xml) => xml,
            Err(why) => {
                log::warn!("skipping {file_name}: {why}");
                continue;
            }
        };
        match txc::loader::parse(&file_name, &xml) {
            Ok(document) => documents.push(document),
            Err(why) => log::warn!("skipping {file_name}: {why}"),
        }
    }
    Ok(documents)
}

fn collect_xml_paths(dir: &Path, paths: &mut Vec<PathBuf>) -> PipelineResult<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_xml_paths(&path, paths)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("xml") {
            paths.push(path);
        }
    }
    Ok(())
}

/// Writes both the intermediate per-document bundle (parsed document plus
/// reconstructed routes and assembled timetables) and the final slug bundle
/// (`slug -> [service records]` restricted to this document).
fn write_document_bundle(root: &Path, document: &Document) -> PipelineResult<()> {
    let name = stem(&document.file_name);
    let routes = txc::route::reconstruct(document);
    let assembled = txc::timetable::assemble(document);

    write_json(
        &root.join(format!("_{name}.json")),
        &json!({ "document": document, "routes": routes, "journeyPatterns": assembled.iter().map(|jp| json!({
            "journeyPatternId": jp.journey_pattern_id,
            "routeId": jp.route_id,
            "stopPointRefs": jp.stop_point_refs,
            "departures": jp.departures,
        })).collect::<Vec<_>>() }),
    )?;

    let index = txc::slug_index::build_index(std::slice::from_ref(document));
    let mut by_slug: BTreeMap<String, Vec<&model::artefact::SlugRecord>> = BTreeMap::new();
    for record in &index.slugs {
        by_slug.entry(record.slug.clone()).or_default().push(record);
    }
    write_json(&root.join(format!("{name}.json")), &by_slug)?;
    Ok(())
}

/// Expands every journey pattern's departures and files them under every
/// weekday they run, per the `--emit-timetables` decision in `DESIGN.md`.
fn write_timetables(root: &Path, document: &Document) -> PipelineResult<()> {
    let assembled = txc::timetable::assemble(document);
    let mut by_weekday: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();

    for journey_pattern in &assembled {
        let expanded = txc::expander::expand(journey_pattern);
        for (departure, journey) in journey_pattern.departures.iter().zip(expanded.iter()) {
            let weekdays = txc::expander::weekday_buckets(&departure.operating_profile.regular_days);
            for weekday in weekdays {
                by_weekday.entry(weekday_name(weekday).to_string()).or_default().push(json!({
                    "journeyPatternId": journey_pattern.journey_pattern_id,
                    "routeId": journey_pattern.route_id,
                    "departureTime": journey.departure_time.format("%H:%M:%S").to_string(),
                    "stops": journey.stops,
                }));
            }
        }
    }

    let name = stem(&document.file_name);
    write_json(&root.join("timetables").join(format!("{name}.json")), &by_weekday)
}

fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    use chrono::Weekday::*;
    match weekday {
        Mon => "monday",
        Tue => "tuesday",
        Wed => "wednesday",
        Thu => "thursday",
        Fri => "friday",
        Sat => "saturday",
        Sun => "sunday",
    }
}

/// Best-effort fetch of the previously published slug snapshot: a missing
/// or unparseable response falls back to an empty index rather than
/// aborting the merge.
async fn fetch_remote_slug_index(client: &reqwest::Client) -> Option<model::artefact::SlugIndex> {
    let response = client.get(REMOTE_SLUG_SNAPSHOT).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}
