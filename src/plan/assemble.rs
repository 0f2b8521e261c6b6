use crate::error::{PlanError, PlanResult};
use crate::member::{MemberId, TimeInfo};
use crate::party::{DayPlan, Party};
use crate::plan::context::AllocationContext;
use crate::time::{CycleDay, Direction, Time, day_name};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{error, warn};

impl AllocationContext {
    fn sorted_parties(&self, day: usize) -> Vec<Party> {
        Direction::ALL
            .iter()
            .flat_map(|d| self.parties(day, *d).iter().cloned())
            .map(|mut party| {
                party.passengers.sort();
                party
            })
            .collect()
    }

    fn times_by_initials(&self, day: usize, parties: &[Party], direction: Direction) -> BTreeMap<MemberId, Time> {
        let mut times = BTreeMap::new();
        for party in parties.iter().filter(|p| p.direction == direction) {
            times.insert(party.driver.clone(), party.time);
            for id in &party.passengers {
                let time = self
                    .member(id)
                    .and_then(|m| m.effective_time(day, direction))
                    .unwrap_or(party.time);
                times.insert(id.clone(), time);
            }
        }
        times
    }

    fn time_info_by_initials(&self, day: usize, direction: Direction) -> BTreeMap<MemberId, TimeInfo> {
        self.members
            .iter()
            .filter(|(_, s)| !s.member.is_ignored(day))
            .map(|(id, s)| (id.clone(), s.member.time_info(day, direction)))
            .collect()
    }

    /// Hard violations of the day's parties. Preference mismatches that are only worth a
    /// warning are logged here instead.
    pub fn day_violations(&self, day: usize, parties: &[Party]) -> Vec<String> {
        let mut violations = vec![];

        let drivers = parties.iter().map(|p| &p.driver).collect::<BTreeSet<_>>();
        let passengers = parties.iter().flat_map(|p| &p.passengers).collect::<BTreeSet<_>>();
        for id in drivers.intersection(&passengers) {
            violations.push(format!("{} is both driver and passenger", id));
        }

        for direction in Direction::ALL {
            let mut seats: BTreeMap<&MemberId, usize> = BTreeMap::new();
            for party in parties.iter().filter(|p| p.direction == direction) {
                for id in party.occupants() {
                    *seats.entry(id).or_default() += 1;
                }
                if party.is_lonely_driver && !party.passengers.is_empty() {
                    violations.push(format!(
                        "{} skips the {} ride but carries {} passengers",
                        party.driver,
                        direction,
                        party.passengers.len()
                    ));
                }
            }
            for (id, count) in seats.iter().filter(|(_, c)| **c > 1) {
                violations.push(format!("{} occupies {} seats {}", id, count, direction));
            }

            for (id, state) in &self.members {
                let member = &state.member;
                let seated = seats.contains_key(id);
                if member.custom_day(day).map_or(false, |c| c.ignore_completely) {
                    if seated {
                        violations.push(format!("{} is ignored but rides {}", id, direction));
                    }
                    continue;
                }
                if member.effective_time(day, direction).is_some() && !seated {
                    violations.push(format!("{} has no seat {}", id, direction));
                }
            }
        }

        for (id, state) in &self.members {
            let member = &state.member;
            if member.needs_car(day) && !member.is_ignored(day) && !drivers.contains(id) {
                violations.push(format!("{} needs their car but does not drive", id));
            }
            if member.no_waiting_afternoon(day) {
                let end = member.effective_time(day, Direction::Homebound);
                let party = parties
                    .iter()
                    .filter(|p| p.direction == Direction::Homebound)
                    .find(|p| p.occupants().any(|m| m == id));
                if let (Some(end), Some(party)) = (end, party) {
                    if party.time != end {
                        warn!(
                            day = %day_name(day),
                            member = %id,
                            end = %end,
                            party_time = %party.time,
                            "member cannot wait but party leaves at a different time"
                        );
                    }
                }
            }
        }
        violations
    }

    /// Freezes the parties of `day` into its output form, checking them on the way.
    pub fn build_day_plan(&self, day: usize) -> PlanResult<DayPlan> {
        let parties = self.sorted_parties(day);
        let violations = self.day_violations(day, &parties);
        if !violations.is_empty() {
            error!(day = %day_name(day), count = violations.len(), "day plan violates invariants");
            return Err(PlanError::InvariantViolation { day: day_name(day), violations });
        }
        Ok(DayPlan {
            day_of_week_ab_combo: CycleDay::new(day),
            schoolbound_times_by_initials: self.times_by_initials(day, &parties, Direction::Schoolbound),
            homebound_times_by_initials: self.times_by_initials(day, &parties, Direction::Homebound),
            schoolbound_time_info_by_initials: self.time_info_by_initials(day, Direction::Schoolbound),
            homebound_time_info_by_initials: self.time_info_by_initials(day, Direction::Homebound),
            parties,
        })
    }
}
