use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Decides whether a record with the given validity window is still current.
///
/// A missing `start` means the record was never live, so it is inactive
/// regardless of `end`. Otherwise it is active once `today` has reached
/// `start`, for as long as `end` is absent or not yet passed - and it is
/// also active ahead of its own start, so upcoming schedule changes surface
/// before they take effect.
pub fn active(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> bool {
    match start {
        None => false,
        Some(start) if today < start => true,
        Some(start) => match end {
            Some(end) => today >= start && today <= end,
            None => today >= start,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// The free-text `Note` a `SpecialDaysOperation` entry may carry.
    pub note: Option<String>,
}

impl DateRange {
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        active(self.start, self.end, today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WeekPattern {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl WeekPattern {
    pub const NONE: Self = Self {
        monday: false,
        tuesday: false,
        wednesday: false,
        thursday: false,
        friday: false,
        saturday: false,
        sunday: false,
    };

    pub fn monday_to_friday() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            ..Self::NONE
        }
    }

    pub fn monday_to_saturday() -> Self {
        Self {
            saturday: true,
            ..Self::monday_to_friday()
        }
    }

    pub fn monday_to_sunday() -> Self {
        Self {
            saturday: true,
            sunday: true,
            ..Self::monday_to_friday()
        }
    }

    pub fn weekend() -> Self {
        Self {
            saturday: true,
            sunday: true,
            ..Self::NONE
        }
    }

    pub fn not_saturday() -> Self {
        Self {
            saturday: false,
            ..Self::monday_to_sunday()
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            monday: self.monday || other.monday,
            tuesday: self.tuesday || other.tuesday,
            wednesday: self.wednesday || other.wednesday,
            thursday: self.thursday || other.thursday,
            friday: self.friday || other.friday,
            saturday: self.saturday || other.saturday,
            sunday: self.sunday || other.sunday,
        }
    }

    pub fn includes(&self, weekday: chrono::Weekday) -> bool {
        use chrono::Weekday::*;
        match weekday {
            Mon => self.monday,
            Tue => self.tuesday,
            Wed => self.wednesday,
            Thu => self.thursday,
            Fri => self.friday,
            Sat => self.saturday,
            Sun => self.sunday,
        }
    }
}

/// A `ServicedOrganisation` from TransXChange: a named school, college or
/// similar body whose working/holiday days gate a `VehicleJourney`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicedOrganisation {
    pub code: String,
    pub name: Option<String>,
    pub working_days: Vec<DateRange>,
    pub holidays: Vec<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicedOrganisationRef {
    pub code: String,
    /// `true` for `WorkingDays`, `false` for `Holidays`.
    pub working_days: bool,
}

/// A named public holiday (`Christmas`, `BoxingDay`, ...) is carried
/// verbatim as its TransXChange element name; a one-off holiday not among
/// the named set is an `OtherPublicHoliday` with its own description and
/// date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BankHoliday {
    Named(String),
    Other(OtherPublicHoliday),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherPublicHoliday {
    pub description: String,
    pub date: NaiveDate,
}

/// The resolved operating pattern for a `VehicleJourney`: the union of its
/// regular weekly days, minus explicit exceptions, combined with any bank
/// holiday and serviced-organisation rules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingProfile {
    pub regular_days: WeekPattern,
    pub special_days_operation: Vec<DateRange>,
    pub special_days_non_operation: Vec<DateRange>,
    pub bank_holidays_operation: Vec<BankHoliday>,
    pub bank_holidays_non_operation: Vec<BankHoliday>,
    pub serviced_organisation_days_operation: Vec<ServicedOrganisationRef>,
    pub serviced_organisation_days_non_operation: Vec<ServicedOrganisationRef>,
}
