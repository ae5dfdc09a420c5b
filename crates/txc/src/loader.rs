use chrono::{NaiveDate, NaiveTime};
use model::calendar::{
    BankHoliday, DateRange, OperatingProfile, OtherPublicHoliday, ServicedOrganisation,
    ServicedOrganisationRef, WeekPattern,
};
use model::route::{Route, RouteLink};
use model::service::{
    Document, DocumentStopPoint, JourneyPattern, JourneyPatternSection, JourneyPatternTimingLink,
    Service, VehicleJourney, VehicleJourneyTimingLinkOverride,
};
use model::stop::Coordinates;
use utility::duration::parse_iso8601;
use utility::xml::{IntoList, Value};

/// Parses one TransXChange document into its normalised form. Every
/// schema-typed "one or many" field has already been coerced to a list by
/// [`Value::from_node`]/[`IntoList`] by the time this function inspects it.
pub fn parse(file_name: &str, xml: &str) -> Result<Document, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;
    let root_node = document.root_element();
    let schema_version = root_node.attribute("SchemaVersion").map(str::to_string);
    let revision_number = root_node
        .attribute("RevisionNumber")
        .and_then(|text| text.parse().ok());
    let root = Value::from_node(root_node);

    Ok(Document {
        file_name: file_name.to_string(),
        schema_version,
        revision_number,
        services: parse_services(&root),
        journey_pattern_sections: parse_journey_pattern_sections(&root),
        vehicle_journeys: parse_vehicle_journeys(&root),
        routes: parse_routes(&root),
        route_links: parse_route_links(&root),
        serviced_organisations: parse_serviced_organisations(&root),
        operators: parse_operator_codes(&root),
        stop_points: parse_stop_points(&root),
    })
}

fn parse_services(root: &Value) -> Vec<Service> {
    let services = root
        .get("Services")
        .and_then(|s| s.get("Service"))
        .into_list();

    services
        .iter()
        .filter_map(|service| {
            let service_code = text(service, "ServiceCode")?;
            let standard_service = service.get("StandardService");

            let line_names = service
                .get("Lines")
                .and_then(|lines| lines.get("Line"))
                .into_list()
                .iter()
                .filter_map(|line| text(line, "LineName"))
                .collect();

            let journey_patterns = standard_service
                .and_then(|ss| ss.get("JourneyPattern"))
                .into_list()
                .iter()
                .filter_map(parse_journey_pattern)
                .collect();

            Some(Service {
                service_code,
                line_names,
                operator_ref: text(service, "RegisteredOperatorRef"),
                origin: standard_service
                    .and_then(|ss| text(ss, "Origin"))
                    .unwrap_or_default(),
                destination: standard_service
                    .and_then(|ss| text(ss, "Destination"))
                    .unwrap_or_default(),
                operating_period: parse_date_range(service.get("OperatingPeriod")),
                operating_profile: service.get("OperatingProfile").map(parse_operating_profile),
                journey_patterns,
            })
        })
        .collect()
}

fn parse_journey_pattern(jp: &Value) -> Option<JourneyPattern> {
    Some(JourneyPattern {
        journey_pattern_id: attribute(jp, "id")?,
        route_ref: text(jp, "RouteRef"),
        direction: text(jp, "Direction"),
        journey_pattern_section_refs: jp
            .get("JourneyPatternSectionRefs")
            .into_list()
            .iter()
            .filter_map(Value::as_text)
            .map(str::to_string)
            .collect(),
    })
}

fn parse_journey_pattern_sections(root: &Value) -> Vec<JourneyPatternSection> {
    root.get("JourneyPatternSections")
        .and_then(|s| s.get("JourneyPatternSection"))
        .into_list()
        .iter()
        .filter_map(|section| {
            Some(JourneyPatternSection {
                journey_pattern_section_id: attribute(section, "id")?,
                timing_links: section
                    .get("JourneyPatternTimingLink")
                    .into_list()
                    .iter()
                    .filter_map(parse_timing_link)
                    .collect(),
            })
        })
        .collect()
}

fn parse_timing_link(link: &Value) -> Option<JourneyPatternTimingLink> {
    let from = link.get("From")?;
    let to = link.get("To")?;
    Some(JourneyPatternTimingLink {
        journey_pattern_timing_link_id: attribute(link, "id"),
        route_link_ref: text(link, "RouteLinkRef"),
        from_stop_point_ref: text(from, "StopPointRef")?,
        to_stop_point_ref: text(to, "StopPointRef")?,
        run_time: text(link, "RunTime")
            .and_then(|text| parse_iso8601(&text).ok())
            .unwrap_or_default(),
        from_wait_time: text(from, "WaitTime").and_then(|text| parse_iso8601(&text).ok()),
        to_wait_time: text(to, "WaitTime").and_then(|text| parse_iso8601(&text).ok()),
    })
}

fn parse_vehicle_journeys(root: &Value) -> Vec<VehicleJourney> {
    root.get("VehicleJourneys")
        .and_then(|vjs| vjs.get("VehicleJourney"))
        .into_list()
        .iter()
        .filter_map(|vj| {
            Some(VehicleJourney {
                vehicle_journey_code: text(vj, "VehicleJourneyCode")?,
                service_ref: text(vj, "ServiceRef").unwrap_or_default(),
                line_ref: text(vj, "LineRef"),
                journey_pattern_ref: text(vj, "JourneyPatternRef"),
                vehicle_journey_ref: text(vj, "VehicleJourneyRef"),
                departure_time: text(vj, "DepartureTime")
                    .and_then(|t| NaiveTime::parse_from_str(&t, "%H:%M:%S").ok()),
                operating_profile: vj.get("OperatingProfile").map(parse_operating_profile),
                operator_ref: text(vj, "OperatorRef"),
                vehicle_type_code: vj
                    .get("Operational")
                    .and_then(|o| o.get("VehicleType"))
                    .and_then(|v| text(v, "VehicleTypeCode")),
                vehicle_type_description: vj
                    .get("Operational")
                    .and_then(|o| o.get("VehicleType"))
                    .and_then(|v| text(v, "Description")),
                timing_link_overrides: vj
                    .get("VehicleJourneyTimingLink")
                    .into_list()
                    .iter()
                    .filter_map(parse_timing_link_override)
                    .collect(),
            })
        })
        .collect()
}

fn parse_timing_link_override(link: &Value) -> Option<VehicleJourneyTimingLinkOverride> {
    Some(VehicleJourneyTimingLinkOverride {
        journey_pattern_timing_link_ref: text(link, "JourneyPatternTimingLinkRef")?,
        from_wait_time: link
            .get("From")
            .and_then(|f| text(f, "WaitTime"))
            .and_then(|t| parse_iso8601(&t).ok()),
        to_wait_time: link
            .get("To")
            .and_then(|t| text(t, "WaitTime"))
            .and_then(|t| parse_iso8601(&t).ok()),
    })
}

fn parse_operating_profile(profile: &Value) -> OperatingProfile {
    let regular_days = profile
        .get("RegularDayType")
        .and_then(|r| r.get("DaysOfWeek"))
        .map(week_pattern)
        .unwrap_or(WeekPattern::NONE);

    let special = profile.get("SpecialDaysOperation");
    let bank_holidays = profile.get("BankHolidayOperation");
    let serviced_organisation = profile.get("ServicedOrganisationDayType");

    OperatingProfile {
        regular_days,
        special_days_operation: special
            .and_then(|s| s.get("DaysOfOperation"))
            .into_list()
            .iter()
            .flat_map(date_ranges)
            .collect(),
        special_days_non_operation: special
            .and_then(|s| s.get("DaysOfNonOperation"))
            .into_list()
            .iter()
            .flat_map(date_ranges)
            .collect(),
        bank_holidays_operation: bank_holidays
            .and_then(|b| b.get("DaysOfOperation"))
            .map(parse_bank_holidays)
            .unwrap_or_default(),
        bank_holidays_non_operation: bank_holidays
            .and_then(|b| b.get("DaysOfNonOperation"))
            .map(parse_bank_holidays)
            .unwrap_or_default(),
        serviced_organisation_days_operation: serviced_organisation
            .and_then(|s| s.get("DaysOfOperation"))
            .map(|d| serviced_organisation_refs(d))
            .unwrap_or_default(),
        serviced_organisation_days_non_operation: serviced_organisation
            .and_then(|s| s.get("DaysOfNonOperation"))
            .map(|d| serviced_organisation_refs(d))
            .unwrap_or_default(),
    }
}

/// Every present child tag names a bank holiday, named verbatim, except
/// `OtherPublicHoliday` which carries its own description and date rather
/// than being identified by tag name alone.
fn parse_bank_holidays(days: &Value) -> Vec<BankHoliday> {
    let mut holidays: Vec<BankHoliday> = days
        .keys()
        .into_iter()
        .filter(|key| *key != "OtherPublicHoliday")
        .map(|key| BankHoliday::Named(key.to_string()))
        .collect();

    holidays.extend(days.get("OtherPublicHoliday").into_list().iter().filter_map(|entry| {
        Some(BankHoliday::Other(OtherPublicHoliday {
            description: text(entry, "Description")?,
            date: text(entry, "Date").and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())?,
        }))
    }));
    holidays
}

fn serviced_organisation_refs(days: &Value) -> Vec<ServicedOrganisationRef> {
    let working = days
        .get("WorkingDays")
        .and_then(|w| w.get("ServicedOrganisationRef"))
        .into_list()
        .iter()
        .filter_map(Value::as_text)
        .map(|code| ServicedOrganisationRef {
            code: code.to_string(),
            working_days: true,
        })
        .collect::<Vec<_>>();

    let holidays = days
        .get("Holidays")
        .and_then(|h| h.get("ServicedOrganisationRef"))
        .into_list()
        .iter()
        .filter_map(Value::as_text)
        .map(|code| ServicedOrganisationRef {
            code: code.to_string(),
            working_days: false,
        })
        .collect::<Vec<_>>();

    working.into_iter().chain(holidays).collect()
}

/// Composite weekday tokens (`MondayToFriday`, `Weekend`, ...) are unioned
/// together with any individually-named day present alongside them.
fn week_pattern(days: &Value) -> WeekPattern {
    let mut pattern = WeekPattern::NONE;
    for key in days.keys() {
        pattern = pattern.union(match key {
            "MondayToFriday" => WeekPattern::monday_to_friday(),
            "MondayToSaturday" => WeekPattern::monday_to_saturday(),
            "MondayToSunday" => WeekPattern::monday_to_sunday(),
            "Weekend" => WeekPattern::weekend(),
            "NotSaturday" => WeekPattern::not_saturday(),
            "Monday" => WeekPattern {
                monday: true,
                ..WeekPattern::NONE
            },
            "Tuesday" => WeekPattern {
                tuesday: true,
                ..WeekPattern::NONE
            },
            "Wednesday" => WeekPattern {
                wednesday: true,
                ..WeekPattern::NONE
            },
            "Thursday" => WeekPattern {
                thursday: true,
                ..WeekPattern::NONE
            },
            "Friday" => WeekPattern {
                friday: true,
                ..WeekPattern::NONE
            },
            "Saturday" => WeekPattern {
                saturday: true,
                ..WeekPattern::NONE
            },
            "Sunday" => WeekPattern {
                sunday: true,
                ..WeekPattern::NONE
            },
            _ => WeekPattern::NONE,
        });
    }
    pattern
}

fn parse_routes(root: &Value) -> Vec<Route> {
    let route_links = parse_route_links(root);
    let link_lookup: std::collections::HashMap<&str, &RouteLink> = route_links
        .iter()
        .map(|link| (link.route_link_id.as_str(), link))
        .collect();

    let sections = root
        .get("RouteSections")
        .and_then(|s| s.get("RouteSection"))
        .into_list();
    let section_lookup: std::collections::HashMap<String, Vec<String>> = sections
        .iter()
        .filter_map(|section| {
            let id = attribute(section, "id")?;
            let links = section
                .get("RouteLink")
                .into_list()
                .iter()
                .filter_map(|link| attribute(link, "id"))
                .collect();
            Some((id, links))
        })
        .collect();

    root.get("Routes")
        .and_then(|r| r.get("Route"))
        .into_list()
        .iter()
        .filter_map(|route| {
            let route_id = attribute(route, "id")?;
            let route_link_ids: Vec<String> = route
                .get("RouteSectionRef")
                .into_list()
                .iter()
                .filter_map(Value::as_text)
                .flat_map(|section_ref| {
                    section_lookup.get(section_ref).cloned().unwrap_or_default()
                })
                .collect();

            let mut stop_point_refs = Vec::new();
            let mut distances_metres = Vec::new();
            let mut directions = Vec::new();
            for link_id in &route_link_ids {
                let Some(link) = link_lookup.get(link_id.as_str()) else {
                    continue;
                };
                if stop_point_refs.is_empty() {
                    stop_point_refs.push(link.from_stop_point_ref.clone());
                }
                stop_point_refs.push(link.to_stop_point_ref.clone());
                distances_metres.push(link.distance_metres);
                directions.push(link.direction.clone());
            }

            Some(Route {
                route_id,
                description: text(route, "Description"),
                route_link_ids,
                stop_point_refs,
                distances_metres,
                directions,
            })
        })
        .collect()
}

fn parse_route_links(root: &Value) -> Vec<RouteLink> {
    let sections = root
        .get("RouteSections")
        .and_then(|s| s.get("RouteSection"))
        .into_list();

    sections
        .iter()
        .flat_map(|section| section.get("RouteLink").into_list())
        .filter_map(|link| {
            let from = link.get("From")?;
            let to = link.get("To")?;
            Some(RouteLink {
                route_link_id: attribute(&link, "id")?,
                from_stop_point_ref: text(from, "StopPointRef")?,
                to_stop_point_ref: text(to, "StopPointRef")?,
                distance_metres: text(&link, "Distance").and_then(|d| d.parse().ok()),
                track: track_points(&link),
                direction: text(&link, "Direction"),
            })
        })
        .collect()
}

/// Flattens a `RouteLink`'s `Track.Mapping.Location[]` into a polyline,
/// preferring each point's `Translation` (already WGS-84) over raw
/// Easting/Northing.
fn track_points(link: &Value) -> Vec<Coordinates> {
    link.get("Track")
        .and_then(|t| t.get("Mapping"))
        .and_then(|m| m.get("Location"))
        .into_list()
        .iter()
        .filter_map(read_coordinates)
        .collect()
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

fn parse_serviced_organisations(root: &Value) -> Vec<ServicedOrganisation> {
    root.get("ServicedOrganisations")
        .and_then(|s| s.get("ServicedOrganisation"))
        .into_list()
        .iter()
        .filter_map(|org| {
            Some(ServicedOrganisation {
                code: text(org, "OrganisationCode")?,
                name: text(org, "Name"),
                working_days: org.get("WorkingDays").into_list().iter().flat_map(date_ranges).collect(),
                holidays: org.get("Holidays").into_list().iter().flat_map(date_ranges).collect(),
            })
        })
        .collect()
}

fn date_ranges(value: &Value) -> Vec<DateRange> {
    value
        .get("DateRange")
        .into_list()
        .iter()
        .map(parse_date_range_value)
        .collect()
}

fn parse_date_range(value: Option<&Value>) -> DateRange {
    value.map(parse_date_range_value).unwrap_or(DateRange { start: None, end: None, note: None })
}

fn parse_date_range_value(value: &Value) -> DateRange {
    DateRange {
        start: text(value, "StartDate").and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        end: text(value, "EndDate").and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        note: text(value, "Note"),
    }
}

fn parse_operator_codes(root: &Value) -> Vec<String> {
    root.get("Operators")
        .and_then(|o| o.get("Operator"))
        .into_list()
        .iter()
        .filter_map(|operator| {
            text(operator, "NationalOperatorCode").or_else(|| text(operator, "OperatorCode"))
        })
        .collect()
}

fn parse_stop_points(root: &Value) -> Vec<DocumentStopPoint> {
    let Some(stop_points) = root.get("StopPoints") else {
        return Vec::new();
    };

    if let Some(points) = stop_points.get("StopPoint") {
        return points
            .into_list()
            .iter()
            .filter_map(|point| {
                Some(DocumentStopPoint {
                    atco_code: text(point, "AtcoCode")?,
                    common_name: point.get("Descriptor").and_then(|d| text(d, "CommonName")),
                    locality_ref: point.get("Place").and_then(|p| text(p, "NptgLocalityRef")),
                })
            })
            .collect();
    }

    stop_points
        .get("AnnotatedStopPointRef")
        .into_list()
        .iter()
        .filter_map(|point| {
            Some(DocumentStopPoint {
                atco_code: text(point, "StopPointRef")?,
                common_name: text(point, "CommonName"),
                locality_ref: text(point, "LocalityName"),
            })
        })
        .collect()
}

fn attribute(value: &Value, key: &str) -> Option<String> {
    text(value, key)
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <TransXChange SchemaVersion="2.4" RevisionNumber="1">
      <StopPoints>
        <AnnotatedStopPointRef>
          <StopPointRef>340000001</StopPointRef>
          <CommonName>High Street</CommonName>
        </AnnotatedStopPointRef>
      </StopPoints>
      <RouteSections>
        <RouteSection id="RS1">
          <RouteLink id="RL1">
            <From><StopPointRef>340000001</StopPointRef></From>
            <To><StopPointRef>340000002</StopPointRef></To>
            <Distance>500</Distance>
            <Direction>outbound</Direction>
          </RouteLink>
        </RouteSection>
      </RouteSections>
      <Routes>
        <Route id="R1">
          <Description>High Street to Low Street</Description>
          <RouteSectionRef>RS1</RouteSectionRef>
        </Route>
      </Routes>
      <JourneyPatternSections>
        <JourneyPatternSection id="JPS1">
          <JourneyPatternTimingLink id="JPTL1">
            <From SequenceNumber="1">
              <StopPointRef>340000001</StopPointRef>
              <Activity>pickUp</Activity>
            </From>
            <To SequenceNumber="2">
              <StopPointRef>340000002</StopPointRef>
              <Activity>setDown</Activity>
            </To>
            <RouteLinkRef>RL1</RouteLinkRef>
            <RunTime>PT5M</RunTime>
          </JourneyPatternTimingLink>
        </JourneyPatternSection>
      </JourneyPatternSections>
      <Operators>
        <Operator id="OP1">
          <NationalOperatorCode>ANEA</NationalOperatorCode>
        </Operator>
      </Operators>
      <Services>
        <Service>
          <ServiceCode>PB0000001:1</ServiceCode>
          <Lines><Line id="L1"><LineName>23</LineName></Line></Lines>
          <OperatingPeriod><StartDate>2020-01-01</StartDate></OperatingPeriod>
          <RegisteredOperatorRef>OP1</RegisteredOperatorRef>
          <StandardService>
            <Origin>Leeds</Origin>
            <Destination>York</Destination>
            <JourneyPattern id="JP1">
              <Direction>outbound</Direction>
              <RouteRef>R1</RouteRef>
              <JourneyPatternSectionRefs>JPS1</JourneyPatternSectionRefs>
            </JourneyPattern>
          </StandardService>
        </Service>
      </Services>
      <VehicleJourneys>
        <VehicleJourney>
          <VehicleJourneyCode>VJ1</VehicleJourneyCode>
          <ServiceRef>PB0000001:1</ServiceRef>
          <LineRef>L1</LineRef>
          <JourneyPatternRef>JP1</JourneyPatternRef>
          <DepartureTime>09:30:00</DepartureTime>
          <OperatingProfile>
            <RegularDayType><DaysOfWeek><MondayToFriday/></DaysOfWeek></RegularDayType>
          </OperatingProfile>
        </VehicleJourney>
      </VehicleJourneys>
    </TransXChange>
    "#;

    #[test]
    fn parses_a_minimal_document() {
        let document = parse("test.xml", SAMPLE).unwrap();
        assert_eq!(document.schema_version.as_deref(), Some("2.4"));
        assert_eq!(document.services.len(), 1);
        assert_eq!(document.services[0].line_names, vec!["23".to_string()]);
        assert_eq!(document.routes.len(), 1);
        assert!(document.routes[0].is_well_formed());
        assert_eq!(document.vehicle_journeys[0].operating_profile.as_ref().unwrap().regular_days, WeekPattern::monday_to_friday());
        assert_eq!(document.stop_points.len(), 1);
        assert_eq!(document.stop_points[0].atco_code, "340000001");
    }
}
