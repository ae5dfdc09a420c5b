use chrono::{Duration, NaiveTime, Weekday};
use model::calendar::WeekPattern;
use model::service::StopTime;

use crate::timetable::AssembledJourneyPattern;

/// One anchor departure expanded into its per-stop absolute times.
#[derive(Debug, Clone)]
pub struct ExpandedJourney {
    pub departure_time: NaiveTime,
    pub stops: Vec<StopTime>,
}

/// Expands every departure of `journey_pattern` against its stop-by-stop
/// wait-times and runtimes, producing one [`ExpandedJourney`] per anchor
/// departure. A journey pattern whose stop chain and wait-time count
/// disagree is a schema violation: logged and skipped, not fatal.
pub fn expand(journey_pattern: &AssembledJourneyPattern) -> Vec<ExpandedJourney> {
    if journey_pattern.stop_point_refs.len() != journey_pattern.wait_times.len()
        || journey_pattern.stop_point_refs.len() != journey_pattern.runtimes.len() + 1
    {
        log::warn!(
            "journey pattern {} has a stop chain of {} stops but {} wait times, skipping expansion",
            journey_pattern.journey_pattern_id,
            journey_pattern.stop_point_refs.len(),
            journey_pattern.wait_times.len()
        );
        return Vec::new();
    }

    journey_pattern
        .departures
        .iter()
        .map(|departure| ExpandedJourney {
            departure_time: departure.departure_time,
            stops: expand_one(
                departure.departure_time,
                &journey_pattern.stop_point_refs,
                &journey_pattern.wait_times,
                &journey_pattern.runtimes,
            ),
        })
        .collect()
}

/// Expands a single anchor departure. `elapsed` walks forward in time since
/// the anchor's own midnight rather than wrapping a `NaiveTime`, so that the
/// "more than 23 hours since the anchor's own midnight" day-shift test in
/// `§4.6` has somewhere to compare against; the carry is sticky once it
/// fires, matching a real overnight working never un-shifting partway
/// through its stop chain. At each stop the runtime from the previous link
/// is applied first to produce an arrival, then the stop's own wait time is
/// applied to produce a departure that becomes the next leg's cursor.
fn expand_one(
    anchor: NaiveTime,
    stop_chain: &[String],
    wait_times: &[Duration],
    runtimes: &[Duration],
) -> Vec<StopTime> {
    let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
    let mut elapsed = anchor - midnight;
    let mut carried = false;
    let mut stops = Vec::with_capacity(stop_chain.len());

    for (index, stop_point_ref) in stop_chain.iter().enumerate() {
        if index > 0 {
            elapsed += runtimes[index - 1];
        }
        let arrival = elapsed;
        if arrival.num_hours() > 23 {
            carried = true;
        }

        let wait = wait_times[index];
        elapsed += wait;
        if elapsed.num_hours() > 23 {
            carried = true;
        }

        stops.push(StopTime {
            stop_point_ref: stop_point_ref.clone(),
            time: midnight + wrap(arrival),
            departure_time: (wait != Duration::zero()).then(|| midnight + wrap(elapsed)),
            day_shift: carried,
        });
    }
    stops
}

fn wrap(elapsed: Duration) -> Duration {
    let day = Duration::hours(24);
    let mut remainder = elapsed;
    while remainder >= day {
        remainder -= day;
    }
    remainder
}

/// Maps a [`WeekPattern`] into its seven per-weekday membership buckets, so
/// that a single expanded schedule can be filed under every weekday it runs.
pub fn weekday_buckets(pattern: &WeekPattern) -> Vec<Weekday> {
    let mut buckets = Vec::new();
    if pattern.monday {
        buckets.push(Weekday::Mon);
    }
    if pattern.tuesday {
        buckets.push(Weekday::Tue);
    }
    if pattern.wednesday {
        buckets.push(Weekday::Wed);
    }
    if pattern.thursday {
        buckets.push(Weekday::Thu);
    }
    if pattern.friday {
        buckets.push(Weekday::Fri);
    }
    if pattern.saturday {
        buckets.push(Weekday::Sat);
    }
    if pattern.sunday {
        buckets.push(Weekday::Sun);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::calendar::OperatingProfile;
    use model::service::Departure;
    use std::collections::BTreeMap;

    fn journey_pattern(anchor: NaiveTime) -> AssembledJourneyPattern {
        AssembledJourneyPattern {
            journey_pattern_id: "JP1".to_string(),
            route_id: None,
            stop_point_refs: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            runtimes: vec![Duration::minutes(5), Duration::minutes(10)],
            wait_times: vec![Duration::zero(), Duration::minutes(1), Duration::zero()],
            departures: vec![Departure {
                departure_time: anchor,
                operating_profile: OperatingProfile::default(),
                stop_point_refs: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                vehicle_journey_codes: vec!["V1".to_string()],
                operator_refs: Vec::new(),
            }],
            vehicle: None,
            vehicle_descriptions: BTreeMap::new(),
        }
    }

    #[test]
    fn expands_a_three_stop_pattern_with_a_wait_time_in_the_middle() {
        let anchor = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let expanded = expand(&journey_pattern(anchor));
        assert_eq!(expanded.len(), 1);
        let stops = &expanded[0].stops;
        assert_eq!(stops[0].time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(stops[0].departure_time, None);
        assert!(!stops[0].day_shift);
        assert_eq!(stops[1].time, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
        assert_eq!(stops[1].departure_time, Some(NaiveTime::from_hms_opt(8, 6, 0).unwrap()));
        assert_eq!(stops[2].time, NaiveTime::from_hms_opt(8, 16, 0).unwrap());
        assert_eq!(stops[2].departure_time, None);
        assert!(!stops[2].day_shift);
    }

    #[test]
    fn a_journey_crossing_midnight_carries_the_day_shift_marker_for_every_later_stop() {
        let anchor = NaiveTime::from_hms_opt(23, 55, 0).unwrap();
        let expanded = expand(&journey_pattern(anchor));
        let stops = &expanded[0].stops;
        assert!(!stops[0].day_shift);
        assert!(stops[1].day_shift);
        assert!(stops[2].day_shift);
        assert_eq!(stops[2].time, NaiveTime::from_hms_opt(0, 11, 0).unwrap());
    }

    #[test]
    fn a_mismatched_stop_chain_and_wait_time_count_is_skipped_not_fatal() {
        let mut jp = journey_pattern(NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        jp.wait_times.pop();
        assert!(expand(&jp).is_empty());
    }

    #[test]
    fn monday_to_saturday_expands_into_six_weekday_buckets() {
        let buckets = weekday_buckets(&WeekPattern::monday_to_saturday());
        assert_eq!(buckets.len(), 6);
        assert!(!buckets.contains(&Weekday::Sun));
    }
}
