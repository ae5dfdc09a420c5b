use fetch::error::{PipelineError, PipelineResult};

use crate::config::Config;
use crate::write::write_json;

/// Fetches and decodes the National Operator Codes register.
pub async fn run(client: &reqwest::Client, config: &Config) -> PipelineResult<()> {
    log::info!("fetching noc register from {}", noc::NOC_ENDPOINT);
    let bytes = fetch::http::get(client, noc::NOC_ENDPOINT).await?;
    let xml = noc::decode(&bytes);
    let operators =
        noc::parse(&xml).map_err(|why| PipelineError::SchemaViolation(why.to_string()))?;

    write_json(&config.data_root.join("noc").join("noc.json"), &operators)?;
    log::info!("noc: {} operators", operators.len());
    Ok(())
}
