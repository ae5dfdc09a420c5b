use model::operator::Operator;
use utility::xml::{IntoList, Value};

pub const NOC_ENDPOINT: &str = "https://www.travelinedata.org.uk/noc/api/1.0/nocrecords.xml";

/// Decodes NOC's raw ISO-8859-1 response bytes into a UTF-8 string. The
/// register mixes ISO-8859-1 and ASCII without a consistent encoding
/// declaration, so the conversion happens before the XML is ever parsed
/// rather than by re-escaping individual text nodes afterwards.
pub fn decode(bytes: &[u8]) -> String {
    let (text, _encoding, _had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

pub fn parse(xml: &str) -> Result<Vec<Operator>, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;
    let root = Value::from_node(document.root_element());

    let lines = root
        .get("NOCLines")
        .and_then(|lines| lines.get("NOCLine"))
        .into_list();

    Ok(lines.iter().filter_map(parse_operator).collect())
}

fn parse_operator(line: &Value) -> Option<Operator> {
    Some(Operator {
        noc_code: text(line, "NOCCODE")?,
        operator_public_name: text(line, "OperatorPublicName").unwrap_or_default(),
        vosa_psv_license_name: text(line, "VOSA_PSVLicenseName"),
        mode: text(line, "Mode"),
        licence_number: text(line, "LicenceNumber"),
    })
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_text).map(str::to_string)
}
