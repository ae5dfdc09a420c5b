use serde::{Deserialize, Serialize};

/// An operator as listed in the National Operator Codes register. Carried
/// through from the source XML with no reinterpretation beyond the
/// ISO-8859-1 re-escaping NOC requires before it is valid JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub noc_code: String,
    pub operator_public_name: String,
    pub vosa_psv_license_name: Option<String>,
    pub mode: Option<String>,
    pub licence_number: Option<String>,
}
