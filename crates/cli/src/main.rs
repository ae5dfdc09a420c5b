//! Orchestrates the full reference-data pipeline: NPTG, NaPTAN, NOC and BODS
//! loaders run independently, TNDS runs last and folds the NaPTAN output in
//! for its stop reconciliation pass.

mod bods_stage;
mod config;
mod geojson;
mod naptan_stage;
mod noc_stage;
mod nptg_stage;
mod tnds_stage;
mod write;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = config::Config::from_env();
    let client = reqwest::Client::new();
    let mut ok = true;

    let gazetteer = match nptg_stage::run(&client, &config).await {
        Ok(gazetteer) => Some(gazetteer),
        Err(why) => {
            log::error!("nptg stage failed: {why}");
            ok = false;
            None
        }
    };

    let naptan_atco_codes = match &gazetteer {
        Some(gazetteer) => match naptan_stage::run(&client, &config, gazetteer).await {
            Ok(codes) => codes,
            Err(why) => {
                log::error!("naptan stage failed: {why}");
                ok = false;
                Default::default()
            }
        },
        None => {
            log::warn!("skipping naptan stage: no gazetteer available");
            Default::default()
        }
    };

    if let Err(why) = noc_stage::run(&client, &config).await {
        log::error!("noc stage failed: {why}");
        ok = false;
    }

    if let Err(why) = bods_stage::run(&client, &config).await {
        log::error!("bods stage failed: {why}");
        ok = false;
    }

    if let Err(why) = tnds_stage::run(&client, &config, &naptan_atco_codes).await {
        log::error!("tnds stage failed: {why}");
        ok = false;
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
