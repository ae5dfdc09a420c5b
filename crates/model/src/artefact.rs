use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;

/// One entry in `all_slugs.json`: enough of a service's identity to decide
/// freshness and to join it back to its TNDS source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugRecord {
    pub slug: String,
    pub service_code: String,
    pub line_names: Vec<String>,
    pub origin: String,
    pub destination: String,
    pub operating_period: DateRange,
    pub source_file: String,
}

/// The merged local/remote slug index: local records are kept verbatim,
/// remote-only records are filtered down to the ones still [`active`] on
/// the day the merge runs.
///
/// [`active`]: crate::calendar::active
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlugIndex {
    pub slugs: Vec<SlugRecord>,
}

/// One ATCO code's occurrences across every TNDS document it was seen in,
/// shared into per-code shard files under `stopPoints/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopOccurrence {
    pub name: Option<String>,
    pub locality_ref: Option<String>,
    pub slugs: Vec<String>,
}

/// The union of every stop point referenced across a TNDS batch, plus the
/// TNDS-only/remote-only diff against the NaPTAN register.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StopReconciliation {
    pub stops: std::collections::BTreeMap<String, StopOccurrence>,
    pub stops_tnds_only: Vec<String>,
}
