use fetch::error::{PipelineError, PipelineResult};
use model::realtime::PublishedLineMapping;

use crate::config::Config;
use crate::write::write_json;

/// Maintains the BODS `publishedLineName -> lineRef -> [[origin, destination]]`
/// mapping. Requires `TFL_API_KEY`; absence aborts this stage only.
pub async fn run(client: &reqwest::Client, config: &Config) -> PipelineResult<()> {
    let api_key = config
        .tfl_api_key
        .as_deref()
        .ok_or(PipelineError::ConfigMissing("TFL_API_KEY"))?;

    let mapping_path = config.data_root.join("bods").join("bods_tflo_lineRef_mapping.json");
    let mut mapping: PublishedLineMapping = std::fs::read(&mapping_path)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default();

    log::info!("fetching bods siri-vm datafeed");
    let url = bods::datafeed_endpoint(api_key);
    let bytes = fetch::http::get(client, &url).await?;
    let xml = String::from_utf8_lossy(&bytes).into_owned();

    bods::merge_into(&mut mapping, &xml)
        .map_err(|why| PipelineError::SchemaViolation(why.to_string()))?;
    write_json(&mapping_path, &mapping)?;

    log::info!("bods: {} published line names tracked", mapping.lines.len());
    Ok(())
}
