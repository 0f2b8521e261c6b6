use crate::member::{MemberId, TimeInfo};
use crate::time::{CycleDay, Direction, Time};
use serde::Serialize;
use std::collections::BTreeMap;

/// One car on one day in one direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub driver: MemberId,
    pub time: Time,
    pub passengers: Vec<MemberId>,
    pub is_designated_driver: bool,
    pub drives_despite_custom_prefs: bool,
    #[serde(rename = "schoolbound", serialize_with = "Direction::serialize_as_flag")]
    pub direction: Direction,
    pub is_lonely_driver: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_name: Option<String>,
}

impl Party {
    pub fn new(driver: MemberId, direction: Direction, time: Time) -> Party {
        Party {
            driver,
            time,
            passengers: vec![],
            is_designated_driver: false,
            drives_despite_custom_prefs: false,
            direction,
            is_lonely_driver: false,
            pool_name: None,
        }
    }

    pub fn is_schoolbound(&self) -> bool {
        self.direction.is_schoolbound()
    }

    /// Driver first, then passengers.
    pub fn occupants(&self) -> impl Iterator<Item = &MemberId> {
        std::iter::once(&self.driver).chain(self.passengers.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(rename = "dayOfWeekABCombo")]
    pub day_of_week_ab_combo: CycleDay,
    pub parties: Vec<Party>,
    pub schoolbound_times_by_initials: BTreeMap<MemberId, Time>,
    pub homebound_times_by_initials: BTreeMap<MemberId, Time>,
    pub schoolbound_time_info_by_initials: BTreeMap<MemberId, TimeInfo>,
    pub homebound_time_info_by_initials: BTreeMap<MemberId, TimeInfo>,
}

impl DayPlan {
    pub fn parties_in(&self, direction: Direction) -> impl Iterator<Item = &Party> {
        self.parties.iter().filter(move |p| p.direction == direction)
    }

    pub fn party_driven_by(&self, initials: &str, direction: Direction) -> Option<&Party> {
        self.parties_in(direction).find(|p| &*p.driver == initials)
    }

    pub fn party_of(&self, initials: &str, direction: Direction) -> Option<&Party> {
        self.parties_in(direction)
            .find(|p| p.occupants().any(|m| &**m == initials))
    }

    pub fn is_driver(&self, initials: &str) -> bool {
        self.parties.iter().any(|p| &*p.driver == initials)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingPlan {
    pub summary: String,
    /// Keyed by the 1-based day number of the cycle.
    pub day_plans: BTreeMap<u8, DayPlan>,
}

impl DrivingPlan {
    /// Number of days a member drives, counting both directions of a day once.
    pub fn drive_count(&self, initials: &str) -> usize {
        self.day_plans.values().filter(|d| d.is_driver(initials)).count()
    }
}
