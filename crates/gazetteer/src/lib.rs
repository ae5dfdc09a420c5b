use indexmap::IndexMap;
use model::stop::{AdministrativeArea, Coordinates, Locality, PlusbusZone};
use utility::xml::{IntoList, Value};

pub const NPTG_ENDPOINT: &str = "https://naptan.api.dft.gov.uk/v1/nptg";

/// Everything produced from one National Public Transport Gazetteer
/// document: the ATCO-area table, flattened localities with parent/child
/// links resolved, and Plusbus zone polygons.
#[derive(Debug, Default)]
pub struct Gazetteer {
    pub administrative_areas: IndexMap<String, AdministrativeArea>,
    pub localities: IndexMap<String, Locality>,
    pub plusbus_zones: Vec<PlusbusZone>,
}

pub fn parse(xml: &str) -> Result<Gazetteer, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;
    let root = Value::from_node(document.root_element());

    let mut gazetteer = Gazetteer::default();
    parse_administrative_areas(&root, &mut gazetteer);
    parse_localities(&root, &mut gazetteer);
    link_locality_children(&mut gazetteer);
    parse_plusbus_zones(&root, &mut gazetteer);
    Ok(gazetteer)
}

fn parse_administrative_areas(root: &Value, gazetteer: &mut Gazetteer) {
    let Some(regions) = root.get("Regions") else {
        return;
    };
    for region in regions.get("Region").into_list() {
        let Some(areas) = region.get("AdministrativeAreas") else {
            continue;
        };
        for area in areas.get("AdministrativeArea").into_list() {
            let Some(code) = text(&area, "AdministrativeAreaCode") else {
                continue;
            };
            gazetteer
                .administrative_areas
                .entry(code.clone())
                .or_insert_with(|| AdministrativeArea {
                    administrative_area_code: code,
                    atco_area_code: text(&area, "AtcoAreaCode").unwrap_or_default(),
                    name: text(&area, "Name").unwrap_or_default(),
                });
        }
    }
}

fn parse_localities(root: &Value, gazetteer: &mut Gazetteer) {
    let Some(localities) = root.get("NptgLocalities") else {
        return;
    };
    for locality in localities.get("NptgLocality").into_list() {
        let Some(code) = text(&locality, "NptgLocalityCode") else {
            continue;
        };
        let Some(coordinates) = locality_coordinates(&locality) else {
            continue;
        };

        let descriptor = locality.get("Descriptor");
        let base_name = descriptor
            .and_then(|d| text(d, "LocalityName"))
            .unwrap_or_default();
        let qualifier = descriptor
            .and_then(|d| d.get("Qualify"))
            .and_then(|q| text(q, "QualifierName"));
        let name = match qualifier {
            Some(qualifier) => format!("{base_name}, {qualifier}"),
            None => base_name,
        };
        let alternative_name = locality
            .get("AlternativeDescriptors")
            .and_then(|d| d.get("Descriptor"))
            .and_then(|d| text(d, "LocalityName"));

        let administrative_area_code = text(&locality, "AdministrativeAreaRef").unwrap_or_default();
        let parent_locality_code = locality
            .get("ParentNptgLocalityRef")
            .and_then(Value::as_text)
            .map(str::to_string)
            .filter(|text| !text.is_empty());

        gazetteer.localities.entry(code.clone()).or_insert(Locality {
            locality_code: code,
            name,
            alternative_name,
            administrative_area_code,
            parent_locality_code,
            child_locality_codes: Vec::new(),
            coordinates: Some(coordinates),
        });
    }
}

fn link_locality_children(gazetteer: &mut Gazetteer) {
    let links: Vec<(String, String)> = gazetteer
        .localities
        .values()
        .filter_map(|locality| {
            locality
                .parent_locality_code
                .clone()
                .map(|parent| (locality.locality_code.clone(), parent))
        })
        .collect();

    for (child, parent) in links {
        if let Some(parent_locality) = gazetteer.localities.get_mut(&parent) {
            parent_locality.child_locality_codes.push(child);
        }
    }
}

fn parse_plusbus_zones(root: &Value, gazetteer: &mut Gazetteer) {
    let Some(zones) = root.get("PlusbusZones") else {
        return;
    };
    for zone in zones.get("PlusbusZone").into_list() {
        let Some(code) = text(&zone, "PlusbusZoneCode") else {
            continue;
        };
        let ring: Vec<[f64; 2]> = zone
            .get("Mapping")
            .and_then(|m| m.get("Location"))
            .into_list()
            .into_iter()
            .filter_map(|location| {
                let easting: f64 = text(&location, "Easting")?.parse().ok()?;
                let northing: f64 = text(&location, "Northing")?.parse().ok()?;
                utility::geo::osgb36_to_wgs84(easting, northing)
                    .ok()
                    .map(|(lon, lat)| [lon, lat])
            })
            .collect();

        gazetteer.plusbus_zones.push(PlusbusZone {
            zone_code: code,
            name: text(&zone, "Name").unwrap_or_default(),
            boundary: vec![ring],
        });
    }
}

fn locality_coordinates(locality: &Value) -> Option<Coordinates> {
    let location = locality.get("Location")?;

    if let Some(translation) = location.get("Translation") {
        let longitude: Option<f64> = text(translation, "Longitude").and_then(|t| t.parse().ok());
        let latitude: Option<f64> = text(translation, "Latitude").and_then(|t| t.parse().ok());
        if let (Some(longitude), Some(latitude)) = (longitude, latitude) {
            if (longitude, latitude) != (0.0, 0.0) {
                return Some(Coordinates { longitude, latitude });
            }
        }
    }

    let easting: f64 = text(location, "Easting")?.parse().ok()?;
    let northing: f64 = text(location, "Northing")?.parse().ok()?;
    let (longitude, latitude) = utility::geo::osgb36_to_wgs84(easting, northing).ok()?;
    Some(Coordinates { longitude, latitude })
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <NationalPublicTransportGazetteer>
      <Regions>
        <Region>
          <AdministrativeAreas>
            <AdministrativeArea>
              <AdministrativeAreaCode>020</AdministrativeAreaCode>
              <AtcoAreaCode>030</AtcoAreaCode>
              <Name>South Yorkshire</Name>
            </AdministrativeArea>
          </AdministrativeAreas>
        </Region>
      </Regions>
      <NptgLocalities>
        <NptgLocality>
          <NptgLocalityCode>E0028371</NptgLocalityCode>
          <Descriptor>
            <LocalityName>Sheffield</LocalityName>
          </Descriptor>
          <AdministrativeAreaRef>020</AdministrativeAreaRef>
          <ParentNptgLocalityRef></ParentNptgLocalityRef>
          <Location>
            <Translation>
              <Longitude>-1.470000</Longitude>
              <Latitude>53.381000</Latitude>
            </Translation>
          </Location>
        </NptgLocality>
      </NptgLocalities>
      <PlusbusZones/>
    </NationalPublicTransportGazetteer>
    "#;

    #[test]
    fn parses_administrative_areas_and_localities() {
        let gazetteer = parse(SAMPLE).unwrap();
        assert_eq!(gazetteer.administrative_areas["020"].atco_area_code, "030");
        let locality = &gazetteer.localities["E0028371"];
        assert_eq!(locality.name, "Sheffield");
        assert!(locality.parent_locality_code.is_none());
    }
}
