use crate::error::{PlanError, PlanResult};
use crate::member::MemberId;
use crate::plan::context::{AllocationContext, NEAR_MINUTES};
use crate::time::{CYCLE_DAYS, Direction, Time, day_name};
use std::collections::BTreeMap;
use tracing::{debug, error};

impl AllocationContext {
    /// Non-driving travellers of a day and direction, grouped by effective time.
    fn passengers_by_time(&self, day: usize, direction: Direction) -> BTreeMap<Time, Vec<MemberId>> {
        let drivers = self.drivers_on(day);
        let mut groups: BTreeMap<Time, Vec<MemberId>> = BTreeMap::new();
        for (id, state) in &self.members {
            if drivers.contains(id) {
                continue;
            }
            if let Some(time) = state.member.effective_time(day, direction) {
                groups.entry(time).or_default().push(id.clone());
            }
        }
        groups
    }

    /// Index of the party a traveller at `time` should ride with, preferring one leaving at
    /// nearly the same time. Ties go to the party with fewer passengers, then the older one.
    pub fn choose_party(&self, day: usize, direction: Direction, time: Time, tolerance: u16) -> Option<usize> {
        let open = self
            .parties(day, direction)
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_lonely_driver && self.free_seats(p) > 0)
            .collect::<Vec<_>>();
        let least_full_within = |max_minutes: u16| {
            open.iter()
                .filter(|(_, p)| p.time.minutes_between(time) <= max_minutes)
                .min_by_key(|(_, p)| p.passengers.len())
                .map(|(i, _)| *i)
        };
        least_full_within(NEAR_MINUTES - 1).or_else(|| least_full_within(tolerance))
    }

    fn board(&mut self, day: usize, direction: Direction, index: usize, id: MemberId) {
        let times = {
            let party = &self.parties(day, direction)[index];
            party
                .occupants()
                .chain(std::iter::once(&id))
                .filter_map(|m| self.member(m)?.effective_time(day, direction))
                .collect::<Vec<Time>>()
        };
        let party = &mut self.parties[day].get_mut(direction)[index];
        party.passengers.push(id);
        if let Some(time) = times.into_iter().reduce(|a, b| direction.extreme(a, b)) {
            party.time = time;
        }
    }

    /// Seats every non-driving traveller of the cycle in a party of their direction.
    pub fn assign_passengers(&mut self) -> PlanResult<()> {
        for day in 0..CYCLE_DAYS {
            for direction in Direction::ALL {
                for (time, ids) in self.passengers_by_time(day, direction) {
                    for id in ids {
                        let tolerance = self
                            .member(&id)
                            .map_or(self.tolerance(), |m| m.tolerance_for(day, direction, self.tolerance()));
                        let Some(index) = self.choose_party(day, direction, time, tolerance) else {
                            error!(
                                day = %day_name(day),
                                direction = %direction,
                                passenger = %id,
                                time = %time,
                                tolerance,
                                "no party can take passenger"
                            );
                            return Err(PlanError::Allocation {
                                day: day_name(day),
                                direction,
                                passenger: id,
                                time,
                                tolerance,
                            });
                        };
                        debug!(
                            day = %day_name(day),
                            direction = %direction,
                            passenger = %id,
                            driver = %self.parties(day, direction)[index].driver,
                            "assigned passenger"
                        );
                        self.board(day, direction, index, id);
                    }
                }
            }
        }
        Ok(())
    }
}
