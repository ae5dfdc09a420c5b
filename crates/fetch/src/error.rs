use std::fmt;

/// The abstract error taxonomy every collaborator in the pipeline reports
/// through. Most variants are terminal for the stage that raised them;
/// `SchemaViolation` is the one exception - callers log it and skip the
/// offending record rather than aborting the run.
#[derive(Debug)]
pub enum PipelineError {
    ConfigMissing(&'static str),
    UpstreamRejected { url: String, status: u16 },
    UpstreamThrottled { url: String },
    UpstreamUnavailable { url: String, reason: String },
    FtpDropped(String),
    SchemaViolation(String),
    DurationMalformed(String),
    Io(std::io::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ConfigMissing(name) => write!(f, "missing configuration: {name}"),
            PipelineError::UpstreamRejected { url, status } => {
                write!(f, "upstream rejected {url} with status {status}")
            }
            PipelineError::UpstreamThrottled { url } => write!(f, "upstream throttled {url}"),
            PipelineError::UpstreamUnavailable { url, reason } => {
                write!(f, "upstream {url} unavailable: {reason}")
            }
            PipelineError::FtpDropped(reason) => write!(f, "ftp session dropped: {reason}"),
            PipelineError::SchemaViolation(reason) => write!(f, "schema violation: {reason}"),
            PipelineError::DurationMalformed(text) => {
                write!(f, "malformed duration: {text}")
            }
            PipelineError::Io(why) => write!(f, "io error: {why}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(why: std::io::Error) -> Self {
        PipelineError::Io(why)
    }
}

impl From<utility::duration::DurationMalformed> for PipelineError {
    fn from(why: utility::duration::DurationMalformed) -> Self {
        PipelineError::DurationMalformed(why.0)
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
