use std::env;
use std::path::PathBuf;

/// Environment-derived configuration shared by every pipeline stage. Absence
/// of an optional variable falls back to its documented default; absence of
/// a required one is surfaced by the stage that needs it as
/// [`fetch::error::PipelineError::ConfigMissing`].
pub struct Config {
    pub data_root: PathBuf,
    pub tfl_api_key: Option<String>,
    pub tnds_ftp_user: Option<String>,
    pub tnds_ftp_pwd: Option<String>,
    pub emit_timetables: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let data_root = env::var("TRANSIT_DATA_ROOT")
            .unwrap_or_else(|_| "data".to_string())
            .into();

        Self {
            data_root,
            tfl_api_key: env::var("TFL_API_KEY").ok(),
            tnds_ftp_user: env::var("TNDS_FTP_USER").ok(),
            tnds_ftp_pwd: env::var("TNDS_FTP_PWD").ok(),
            emit_timetables: env::args().any(|arg| arg == "--emit-timetables"),
        }
    }
}
