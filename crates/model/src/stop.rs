use serde::{Deserialize, Serialize};

/// A WGS-84 longitude/latitude pair. `(0.0, 0.0)` never appears here - callers
/// that convert from NaPTAN's raw grid references treat that sentinel as a
/// missing coordinate and produce `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// The classification NaPTAN assigns a stop, flattened out of its
/// `StopClassification` tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum StopCategory {
    Bus {
        bus_stop_type: Option<BusStopType>,
    },
    Coach,
    Taxi,
    Car,
    Air,
    Ferry,
    Rail,
    Metro,
    Telecabine,
    BusAndCoach {
        bus_stop_type: Option<BusStopType>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BusStopType {
    Marked { bearing: Option<char> },
    CustomerRequest { bearing: Option<char> },
    HailAndRide { section: Option<String> },
    FlexibleZone { zone: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessNode {
    pub atco_code: String,
    pub naptan_code: Option<String>,
    pub common_name: String,
    pub locality_id: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub category: Option<StopCategory>,
    /// `status` and `notes` from `StopValidity`, preserved verbatim and
    /// never reinterpreted - see the design notes on `StopValidity`.
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// A National Public Transport Gazetteer locality, re-flattened from the
/// nested regions/administrative-areas/localities tree and relinked to its
/// parent and children in a second pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locality {
    pub locality_code: String,
    /// The locality name with its disambiguating qualifier appended, e.g.
    /// `"Newport (Newport)"`.
    pub name: String,
    pub alternative_name: Option<String>,
    pub administrative_area_code: String,
    pub parent_locality_code: Option<String>,
    pub child_locality_codes: Vec<String>,
    pub coordinates: Option<Coordinates>,
}

/// A NaPTAN stop area: a named grouping of stop points (a bus station, a
/// rail station's platforms) rather than a boardable point itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopArea {
    pub stop_area_code: String,
    pub parent: Option<String>,
    pub name: String,
    pub admin_area: String,
    #[serde(rename = "type")]
    pub area_type: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeArea {
    pub administrative_area_code: String,
    pub atco_area_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlusbusZone {
    pub zone_code: String,
    pub name: String,
    /// GeoJSON `Polygon` coordinate rings: `[longitude, latitude]` pairs.
    pub boundary: Vec<Vec<[f64; 2]>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_category_round_trips_through_json() {
        let category = StopCategory::Bus {
            bus_stop_type: Some(BusStopType::Marked {
                bearing: Some('N'),
            }),
        };
        let json = serde_json::to_string(&category).unwrap();
        let back: StopCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(category, back);
    }
}
