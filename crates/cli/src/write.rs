use std::path::Path;

use fetch::error::{PipelineError, PipelineResult};
use serde::Serialize;

/// Writes `value` as pretty-printed JSON to `path`, creating any missing
/// parent directories first. Every artefact in the on-disk layout is
/// rewritten wholesale on each run rather than patched in place.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|why| PipelineError::SchemaViolation(why.to_string()))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Returns a path's file stem (its name with the extension removed), or the
/// whole name if it has none.
pub fn stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}
