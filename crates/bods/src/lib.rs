use model::realtime::PublishedLineMapping;
use utility::xml::{IntoList, Value};

pub fn datafeed_endpoint(api_key: &str) -> String {
    format!("https://data.bus-data.dft.gov.uk/api/v1/datafeed/?operatorRef=TFLO&api_key={api_key}")
}

/// Folds a SIRI-VM `VehicleMonitoringDelivery` document's vehicle
/// activities into an existing [`PublishedLineMapping`], adding any newly
/// observed `[origin, destination]` pair for each line reference.
pub fn merge_into(mapping: &mut PublishedLineMapping, xml: &str) -> Result<(), roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;
    let root = Value::from_node(document.root_element());

    let activities = root
        .get("ServiceDelivery")
        .and_then(|sd| sd.get("VehicleMonitoringDelivery"))
        .and_then(|vmd| vmd.get("VehicleActivity"))
        .into_list();

    for activity in activities {
        let Some(journey) = activity.get("MonitoredVehicleJourney") else {
            continue;
        };
        let (Some(line_ref), Some(published_line_name)) =
            (text(journey, "LineRef"), text(journey, "PublishedLineName"))
        else {
            continue;
        };
        let origin = text(journey, "OriginRef").unwrap_or_default();
        let destination = text(journey, "DestinationRef").unwrap_or_default();

        mapping.record(&published_line_name, &line_ref, origin, destination);
    }

    Ok(())
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <Siri>
      <ServiceDelivery>
        <VehicleMonitoringDelivery>
          <VehicleActivity>
            <MonitoredVehicleJourney>
              <LineRef>LINE:1</LineRef>
              <PublishedLineName>X1</PublishedLineName>
              <OriginRef>A</OriginRef>
              <DestinationRef>B</DestinationRef>
            </MonitoredVehicleJourney>
          </VehicleActivity>
        </VehicleMonitoringDelivery>
      </ServiceDelivery>
    </Siri>
    "#;

    #[test]
    fn records_a_pair_per_activity() {
        let mut mapping = PublishedLineMapping::default();
        merge_into(&mut mapping, SAMPLE).unwrap();
        assert_eq!(mapping.lines["X1"]["LINE:1"], vec![["A".to_string(), "B".to_string()]]);
    }
}
