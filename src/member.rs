use crate::time::{self, CYCLE_DAYS, Direction, Time};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub type MemberId = Arc<str>;

/// One day of a member's timetable as delivered by the timetable provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub start_time: Option<Time>,
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub end_time: Option<Time>,
    #[serde(default = "present")]
    pub is_present: bool,
}

fn present() -> bool {
    true
}

impl Timetable {
    pub fn new(start_time: Option<Time>, end_time: Option<Time>) -> Timetable {
        Timetable { start_time, end_time, is_present: true }
    }

    pub fn time(&self, direction: Direction) -> Option<Time> {
        if !self.is_present {
            return None;
        }
        match direction {
            Direction::Schoolbound => self.start_time,
            Direction::Homebound => self.end_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomDayPreference {
    pub ignore_completely: bool,
    pub needs_car: bool,
    pub driving_skip: bool,
    pub skip_morning: bool,
    pub skip_afternoon: bool,
    pub no_waiting_afternoon: bool,
    #[serde(deserialize_with = "time::deserialize_optional")]
    pub custom_start: Option<Time>,
    #[serde(deserialize_with = "time::deserialize_optional")]
    pub custom_end: Option<Time>,
}

impl CustomDayPreference {
    pub fn custom_time(&self, direction: Direction) -> Option<Time> {
        match direction {
            Direction::Schoolbound => self.custom_start,
            Direction::Homebound => self.custom_end,
        }
    }

    pub fn skips(&self, direction: Direction) -> bool {
        match direction {
            Direction::Schoolbound => self.skip_morning,
            Direction::Homebound => self.skip_afternoon,
        }
    }

    fn problems(&self) -> Vec<&'static str> {
        let mut problems = vec![];
        if self.needs_car && self.driving_skip {
            problems.push("needsCar and drivingSkip are mutually exclusive");
        }
        if self.skip_morning && !self.needs_car {
            problems.push("skipMorning requires needsCar to be true");
        }
        if self.skip_afternoon && !self.needs_car {
            problems.push("skipAfternoon requires needsCar to be true");
        }
        if self.no_waiting_afternoon && self.skip_afternoon {
            problems.push("noWaitingAfternoon and skipAfternoon are mutually exclusive");
        }
        problems
    }
}

/// Whether a member may drive in a given pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivingCapability {
    Normal,
    /// Would normally skip driving, but is the only member of the pool.
    Desperate,
    Ineligible,
}

impl DrivingCapability {
    pub fn can_drive(self) -> bool {
        self != DrivingCapability::Ineligible
    }
}

/// Where a member's time for one direction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    pub timetable_time: Option<Time>,
    pub custom_pref_time: Option<Time>,
    pub effective_time: Option<Time>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub initials: MemberId,
    pub first_name: String,
    pub last_name: String,
    #[serde(alias = "numberOfSeats")]
    pub seats: u8,
    #[serde(default)]
    pub is_part_time: bool,
    #[serde(default)]
    pub custom_days: BTreeMap<usize, CustomDayPreference>,
    #[serde(default)]
    pub timetable: BTreeMap<usize, Timetable>,
}

impl Member {
    pub fn custom_day(&self, day: usize) -> Option<&CustomDayPreference> {
        self.custom_days.get(&day)
    }

    fn flag(&self, day: usize, f: impl Fn(&CustomDayPreference) -> bool) -> bool {
        self.custom_day(day).map_or(false, f)
    }

    pub fn needs_car(&self, day: usize) -> bool {
        self.flag(day, |c| c.needs_car)
    }

    pub fn driving_skip(&self, day: usize) -> bool {
        self.flag(day, |c| c.driving_skip)
    }

    pub fn no_waiting_afternoon(&self, day: usize) -> bool {
        self.flag(day, |c| c.no_waiting_afternoon)
    }

    /// A lonely driver takes nobody along in this direction.
    pub fn is_lonely(&self, day: usize, direction: Direction) -> bool {
        self.flag(day, |c| c.skips(direction))
    }

    /// Ignored days: explicitly ignored, or neither a timetable nor custom times exist.
    pub fn is_ignored(&self, day: usize) -> bool {
        let custom = self.custom_day(day);
        if custom.map_or(false, |c| c.ignore_completely) {
            return true;
        }
        let has_timetable = self.timetable.get(&day).map_or(false, |t| t.is_present);
        let has_custom_times =
            custom.map_or(false, |c| c.custom_start.is_some() || c.custom_end.is_some());
        !has_timetable && !has_custom_times
    }

    pub fn timetable_time(&self, day: usize, direction: Direction) -> Option<Time> {
        self.timetable.get(&day).and_then(|t| t.time(direction))
    }

    /// Custom override first, timetable second. Ignores skip preferences.
    pub fn raw_time(&self, day: usize, direction: Direction) -> Option<Time> {
        self.custom_day(day)
            .and_then(|c| c.custom_time(direction))
            .or_else(|| self.timetable_time(day, direction))
    }

    /// The time a member travels in a direction, or `None` if they do not travel.
    pub fn effective_time(&self, day: usize, direction: Direction) -> Option<Time> {
        if self.is_ignored(day) || self.is_lonely(day, direction) {
            return None;
        }
        self.raw_time(day, direction)
    }

    pub fn time_info(&self, day: usize, direction: Direction) -> TimeInfo {
        TimeInfo {
            timetable_time: self.timetable_time(day, direction),
            custom_pref_time: self.custom_day(day).and_then(|c| c.custom_time(direction)),
            effective_time: self.effective_time(day, direction),
        }
    }

    pub fn driving_capability(&self, day: usize, sole_member: bool) -> DrivingCapability {
        if self.is_ignored(day) {
            DrivingCapability::Ineligible
        } else if self.driving_skip(day) {
            if sole_member {
                DrivingCapability::Desperate
            } else {
                DrivingCapability::Ineligible
            }
        } else {
            DrivingCapability::Normal
        }
    }

    pub fn tolerance_for(&self, day: usize, direction: Direction, default_tolerance: u16) -> u16 {
        if direction == Direction::Homebound && self.no_waiting_afternoon(day) {
            0
        } else {
            default_tolerance
        }
    }

    /// Problems with this member's input, formatted for a validation report.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if self.seats == 0 {
            errors.push(format!("{}: numberOfSeats must be at least 1", self.initials));
        }
        for (day, custom) in &self.custom_days {
            if *day >= CYCLE_DAYS {
                errors.push(format!("{}: customDays has day {} outside the cycle", self.initials, day));
            }
            for problem in custom.problems() {
                errors.push(format!("{}: Day {}: {}", self.initials, day, problem));
            }
        }
        for day in self.timetable.keys().filter(|d| **d >= CYCLE_DAYS) {
            errors.push(format!("{}: timetable has day {} outside the cycle", self.initials, day));
        }
        errors
    }
}
