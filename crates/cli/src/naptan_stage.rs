use std::collections::HashSet;

use fetch::error::PipelineResult;
use gazetteer::Gazetteer;
use model::stop::{AccessNode, StopArea};
use serde_json::json;

use crate::config::Config;
use crate::geojson::point_feature_collection;
use crate::write::write_json;

/// Fetches NaPTAN stop points for every ATCO area the gazetteer lists,
/// sorted ascending per the reproducibility guarantee in the design's
/// ordering section. Areas that fail to fetch or parse are logged and
/// skipped, not fatal to the run.
pub async fn run(
    client: &reqwest::Client,
    config: &Config,
    gazetteer: &Gazetteer,
) -> PipelineResult<HashSet<String>> {
    let mut atco_area_codes: Vec<&str> = gazetteer
        .administrative_areas
        .values()
        .map(|area| area.atco_area_code.as_str())
        .collect();
    atco_area_codes.sort_unstable();
    atco_area_codes.dedup();

    let root = config.data_root.join("naptan");
    let mut all_stops: Vec<AccessNode> = Vec::new();
    let mut all_areas: Vec<StopArea> = Vec::new();

    for atco_area_code in atco_area_codes {
        log::info!("fetching naptan stop points for atco area {atco_area_code}");
        let url = naptan::access_nodes_endpoint(atco_area_code);

        let bytes = match fetch::http::get(client, &url).await {
            Ok(bytes) => bytes,
            Err(why) => {
                log::warn!("skipping naptan atco area {atco_area_code}: {why}");
                continue;
            }
        };
        let xml = String::from_utf8_lossy(&bytes).into_owned();
        let nodes = match naptan::parse(&xml) {
            Ok(nodes) => nodes,
            Err(why) => {
                log::warn!("skipping naptan atco area {atco_area_code}: {why}");
                continue;
            }
        };

        write_json(
            &root.join(format!("naptan_stop_points_{atco_area_code}.json")),
            &nodes.stop_points,
        )?;
        let geojson = point_feature_collection(
            &nodes.stop_points,
            |stop| stop.coordinates.map(|c| (c.longitude, c.latitude)),
            |stop| json!({ "atcoCode": stop.atco_code, "commonName": stop.common_name }),
        );
        write_json(
            &root.join(format!("naptan_stop_points_{atco_area_code}.geojson")),
            &geojson,
        )?;
        for stop in &nodes.stop_points {
            write_json(
                &root.join("stopPoints").join(format!("{}.json", stop.atco_code)),
                stop,
            )?;
        }

        write_json(
            &root.join(format!("naptan_stop_areas_{atco_area_code}.json")),
            &nodes.stop_areas,
        )?;
        let area_geojson = point_feature_collection(
            &nodes.stop_areas,
            |area| area.coordinates.map(|c| (c.longitude, c.latitude)),
            |area| json!({ "stopAreaCode": area.stop_area_code, "name": area.name }),
        );
        write_json(
            &root.join(format!("naptan_stop_areas_{atco_area_code}.geojson")),
            &area_geojson,
        )?;
        for area in &nodes.stop_areas {
            write_json(
                &root.join("stopAreas").join(format!("{}.json", area.stop_area_code)),
                area,
            )?;
        }

        all_stops.extend(nodes.stop_points);
        all_areas.extend(nodes.stop_areas);
    }

    write_json(&root.join("naptan_stop_points_all.json"), &all_stops)?;
    let aggregate_geojson = point_feature_collection(
        &all_stops,
        |stop| stop.coordinates.map(|c| (c.longitude, c.latitude)),
        |stop| json!({ "atcoCode": stop.atco_code, "commonName": stop.common_name }),
    );
    write_json(&root.join("naptan_stop_points_all.geojson"), &aggregate_geojson)?;

    write_json(&root.join("naptan_stop_areas_all.json"), &all_areas)?;
    let aggregate_area_geojson = point_feature_collection(
        &all_areas,
        |area| area.coordinates.map(|c| (c.longitude, c.latitude)),
        |area| json!({ "stopAreaCode": area.stop_area_code, "name": area.name }),
    );
    write_json(&root.join("naptan_stop_areas_all.geojson"), &aggregate_area_geojson)?;

    log::info!(
        "naptan: {} stop points and {} stop areas across all atco areas",
        all_stops.len(),
        all_areas.len()
    );
    Ok(all_stops.into_iter().map(|stop| stop.atco_code).collect())
}
