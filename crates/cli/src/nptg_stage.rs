use fetch::error::{PipelineError, PipelineResult};
use gazetteer::Gazetteer;
use serde_json::json;

use crate::config::Config;
use crate::geojson::{point_feature_collection, polygon_feature_collection};
use crate::write::write_json;

/// Fetches and shards the National Public Transport Gazetteer: the ATCO-area
/// table later drives which NaPTAN areas get fetched, so this stage must
/// complete before [`crate::naptan_stage`].
pub async fn run(client: &reqwest::Client, config: &Config) -> PipelineResult<Gazetteer> {
    log::info!("fetching nptg from {}", gazetteer::NPTG_ENDPOINT);
    let bytes = fetch::http::get(client, gazetteer::NPTG_ENDPOINT).await?;
    let xml = String::from_utf8_lossy(&bytes).into_owned();
    let gazetteer = gazetteer::parse(&xml)
        .map_err(|why| PipelineError::SchemaViolation(why.to_string()))?;

    let root = config.data_root.join("nptg");

    write_json(&root.join("nptg_atcoareas.json"), &gazetteer.administrative_areas)?;
    write_json(&root.join("nptg_localities.json"), &gazetteer.localities)?;
    for (code, locality) in &gazetteer.localities {
        write_json(&root.join("localities").join(format!("{code}.json")), locality)?;
    }

    let localities: Vec<_> = gazetteer.localities.values().collect();
    let locality_geojson = point_feature_collection(
        &localities,
        |locality| locality.coordinates.map(|c| (c.longitude, c.latitude)),
        |locality| json!({ "localityCode": locality.locality_code, "name": locality.name }),
    );
    write_json(&root.join("nptg_localities.geojson"), &locality_geojson)?;

    write_json(&root.join("nptg_plusbuszones.json"), &gazetteer.plusbus_zones)?;
    for zone in &gazetteer.plusbus_zones {
        write_json(
            &root.join("plusbuszones").join(format!("{}.json", zone.zone_code)),
            zone,
        )?;
    }
    let zone_geojson = polygon_feature_collection(
        &gazetteer.plusbus_zones,
        |zone| &zone.boundary,
        |zone| json!({ "zoneCode": zone.zone_code, "name": zone.name }),
    );
    write_json(&root.join("nptg_plusbuszones.geojson"), &zone_geojson)?;

    log::info!(
        "nptg: {} administrative areas, {} localities, {} plusbus zones",
        gazetteer.administrative_areas.len(),
        gazetteer.localities.len(),
        gazetteer.plusbus_zones.len()
    );
    Ok(gazetteer)
}
