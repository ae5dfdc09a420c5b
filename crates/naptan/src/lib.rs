use model::stop::{AccessNode, BusStopType, Coordinates, StopArea, StopCategory};
use utility::xml::{IntoList, Value};

pub fn access_nodes_endpoint(atco_area_code: &str) -> String {
    format!("https://naptan.api.dft.gov.uk/v1/access-nodes?atcoAreaCodes={atco_area_code}&dataFormat=xml")
}

/// Everything produced from one ATCO area's NaPTAN document: its stop
/// points and the stop areas (bus stations, rail platform groups) they
/// belong to.
#[derive(Debug, Default)]
pub struct AccessNodes {
    pub stop_points: Vec<AccessNode>,
    pub stop_areas: Vec<StopArea>,
}

pub fn parse(xml: &str) -> Result<AccessNodes, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;
    let root = Value::from_node(document.root_element());

    let stop_points = root
        .get("StopPoints")
        .and_then(|sp| sp.get("StopPoint"))
        .into_list();
    let stop_areas = root
        .get("StopAreas")
        .and_then(|sa| sa.get("StopArea"))
        .into_list();

    Ok(AccessNodes {
        stop_points: stop_points.iter().filter_map(parse_stop_point).collect(),
        stop_areas: stop_areas.iter().filter_map(parse_stop_area).collect(),
    })
}

fn parse_stop_area(area: &Value) -> Option<StopArea> {
    Some(StopArea {
        stop_area_code: text(area, "StopAreaCode")?,
        parent: text(area, "ParentStopAreaRef"),
        name: text(area, "Name").unwrap_or_default(),
        admin_area: text(area, "AdministrativeAreaRef").unwrap_or_default(),
        area_type: text(area, "StopAreaType"),
        coordinates: area.get("Location").and_then(read_coordinates),
        created: text(area, "CreationDateTime"),
        updated: text(area, "ModificationDateTime"),
    })
}

fn parse_stop_point(point: &Value) -> Option<AccessNode> {
    let atco_code = text(point, "AtcoCode")?;
    let common_name = point
        .get("Descriptor")
        .and_then(|d| text(d, "CommonName"))
        .unwrap_or_default();

    Some(AccessNode {
        atco_code,
        naptan_code: text(point, "NaptanCode"),
        common_name,
        locality_id: point
            .get("Place")
            .and_then(|place| text(place, "NptgLocalityRef")),
        coordinates: place_coordinates(point),
        category: classify(point),
        status: text(point, "Status"),
        notes: point.get("Notes").and_then(Value::as_text).map(str::to_string),
    })
}

/// Reads a stop's location, preferring the `Translation` sub-object over
/// raw Easting/Northing, and treating `(0, 0)` as an absent coordinate.
fn place_coordinates(point: &Value) -> Option<Coordinates> {
    let location = point.get("Place")?.get("Location")?;
    read_coordinates(location)
}

fn read_coordinates(location: &Value) -> Option<Coordinates> {
    let source = location.get("Translation").unwrap_or(location);

    if let (Some(longitude), Some(latitude)) = (
        text(source, "Longitude").and_then(|t| t.parse::<f64>().ok()),
        text(source, "Latitude").and_then(|t| t.parse::<f64>().ok()),
    ) {
        if (longitude, latitude) != (0.0, 0.0) {
            return Some(Coordinates { longitude, latitude });
        }
    }

    let easting: f64 = text(location, "Easting")?.parse().ok()?;
    let northing: f64 = text(location, "Northing")?.parse().ok()?;
    let (longitude, latitude) = utility::geo::osgb36_to_wgs84(easting, northing).ok()?;
    Some(Coordinates { longitude, latitude })
}

fn classify(point: &Value) -> Option<StopCategory> {
    let classification = point.get("StopClassification")?;
    let mut stop_type = text(classification, "StopType")?;
    let on_street = classification.get("OnStreet").is_some();

    // BCE/BST/BCS/BCQ are reused for on-street bus/coach stops; treat them
    // as BCT once we know OnStreet data backs them.
    if on_street && matches!(stop_type.as_str(), "BCE" | "BST" | "BCS" | "BCQ") {
        stop_type = "BCT".to_string();
    }

    match stop_type.as_str() {
        "BCT" => Some(StopCategory::Bus {
            bus_stop_type: classification
                .get("OnStreet")
                .and_then(|s| s.get("Bus"))
                .and_then(classify_bus_stop_type),
        }),
        "BCE" => Some(StopCategory::BusAndCoach {
            bus_stop_type: classification
                .get("OffStreet")
                .and_then(|s| s.get("Bus"))
                .and_then(classify_bus_stop_type),
        }),
        "TXR" | "STR" => Some(StopCategory::Taxi),
        "SDA" => Some(StopCategory::Car),
        "AIR" | "GAT" => Some(StopCategory::Air),
        "FTD" | "FER" | "FBT" => Some(StopCategory::Ferry),
        "RSE" | "RLY" | "RPL" => Some(StopCategory::Rail),
        "TMU" | "MET" | "PLT" => Some(StopCategory::Metro),
        "LCE" | "LCB" | "LPL" => Some(StopCategory::Telecabine),
        _ => None,
    }
}

fn classify_bus_stop_type(bus: &Value) -> Option<BusStopType> {
    let kind = text(bus, "BusStopType")?;
    match kind.as_str() {
        "MKD" => Some(BusStopType::Marked {
            bearing: bus
                .get("MarkedPoint")
                .and_then(|p| p.get("Bearing"))
                .and_then(|b| text(b, "CompassPoint"))
                .and_then(|c| c.chars().next()),
        }),
        "CUS" => Some(BusStopType::CustomerRequest {
            bearing: bus
                .get("UnmarkedPoint")
                .and_then(|p| p.get("Bearing"))
                .and_then(|b| text(b, "CompassPoint"))
                .and_then(|c| c.chars().next()),
        }),
        "HAR" => Some(BusStopType::HailAndRide {
            section: bus.get("HailAndRideSection").map(|_| "hailAndRide".to_string()),
        }),
        "FLX" => Some(BusStopType::FlexibleZone {
            zone: bus.get("FlexibleZone").map(|_| "flexibleZone".to_string()),
        }),
        _ => None,
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <StopPoints>
      <StopPoint>
        <AtcoCode>340000001</AtcoCode>
        <NaptanCode>sffwadd</NaptanCode>
        <Descriptor>
          <CommonName>High Street</CommonName>
        </Descriptor>
        <Place>
          <NptgLocalityRef>E0028371</NptgLocalityRef>
          <Location>
            <Translation>
              <Longitude>-1.470000</Longitude>
              <Latitude>53.381000</Latitude>
            </Translation>
          </Location>
        </Place>
        <StopClassification>
          <StopType>BCT</StopType>
          <OnStreet>
            <Bus>
              <BusStopType>MKD</BusStopType>
              <MarkedPoint>
                <Bearing><CompassPoint>NE</CompassPoint></Bearing>
              </MarkedPoint>
            </Bus>
          </OnStreet>
        </StopClassification>
        <Status>active</Status>
      </StopPoint>
    </StopPoints>
    "#;

    const SAMPLE_WITH_STOP_AREA: &str = r#"
    <Naptan>
      <StopPoints/>
      <StopAreas>
        <StopArea CreationDateTime="2019-03-04T00:00:00" ModificationDateTime="2020-07-01T00:00:00">
          <StopAreaCode>910GSHEFFLD</StopAreaCode>
          <Name>Sheffield Interchange</Name>
          <AdministrativeAreaRef>020</AdministrativeAreaRef>
          <StopAreaType>GBCS</StopAreaType>
          <Location>
            <Translation>
              <Longitude>-1.470000</Longitude>
              <Latitude>53.381000</Latitude>
            </Translation>
          </Location>
        </StopArea>
      </StopAreas>
    </Naptan>
    "#;

    #[test]
    fn parses_a_marked_bus_stop() {
        let nodes = parse(SAMPLE).unwrap();
        assert_eq!(nodes.stop_points.len(), 1);
        let stop = &nodes.stop_points[0];
        assert_eq!(stop.atco_code, "340000001");
        assert_eq!(stop.coordinates, Some(Coordinates { longitude: -1.47, latitude: 53.381 }));
        assert!(matches!(
            stop.category,
            Some(StopCategory::Bus {
                bus_stop_type: Some(BusStopType::Marked { bearing: Some('N') })
            })
        ));
    }

    #[test]
    fn zero_zero_coordinates_are_treated_as_absent() {
        let xml = SAMPLE.replace("-1.470000", "0.000000").replace("53.381000", "0.000000");
        let nodes = parse(&xml).unwrap();
        assert_eq!(nodes.stop_points[0].coordinates, None);
    }

    #[test]
    fn parses_a_stop_area() {
        let nodes = parse(SAMPLE_WITH_STOP_AREA).unwrap();
        assert_eq!(nodes.stop_areas.len(), 1);
        let area = &nodes.stop_areas[0];
        assert_eq!(area.stop_area_code, "910GSHEFFLD");
        assert_eq!(area.admin_area, "020");
        assert_eq!(area.area_type.as_deref(), Some("GBCS"));
        assert_eq!(area.coordinates, Some(Coordinates { longitude: -1.47, latitude: 53.381 }));
        assert_eq!(area.created.as_deref(), Some("2019-03-04T00:00:00"));
    }
}
