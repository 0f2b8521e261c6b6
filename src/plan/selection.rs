use crate::member::{DrivingCapability, MemberId};
use crate::plan::context::{AllocationContext, NEAR_MINUTES, PairOptions};
use crate::plan::pools::DriverPool;
use crate::time::{CYCLE_DAYS, Direction, day_name};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

impl AllocationContext {
    /// Forces a designated party pair for every member who needs their car that day.
    pub fn assign_needs_car_drivers(&mut self, day: usize) {
        let ids = self
            .members
            .iter()
            .filter(|(_, s)| s.member.needs_car(day) && !s.member.is_ignored(day) && !s.is_driving(day))
            .map(|(id, _)| id.clone())
            .collect::<Vec<MemberId>>();
        for id in ids {
            let options = PairOptions { designated: true, ..Default::default() };
            if self.create_party_pair(&id, day, options) {
                info!(day = %day_name(day), driver = %id, "needs car, driving");
            } else {
                warn!(day = %day_name(day), member = %id, "needs car but has no travel times");
            }
        }
    }

    /// Lets members who cannot wait in the afternoon drive themselves when no party leaves
    /// at their exact end time.
    pub fn assign_no_waiting_drivers(&mut self, day: usize) {
        let ids = self
            .members
            .iter()
            .filter(|(_, s)| s.member.no_waiting_afternoon(day) && !s.is_driving(day))
            .map(|(id, _)| id.clone())
            .collect::<Vec<MemberId>>();
        for id in ids {
            let Some(member) = self.member(&id) else { continue };
            let Some(end) = member.effective_time(day, Direction::Homebound) else {
                continue;
            };
            let capability = member.driving_capability(day, false);
            let covered = self
                .parties(day, Direction::Homebound)
                .iter()
                .any(|p| !p.is_lonely_driver && p.time.minutes_between(end) < NEAR_MINUTES);
            if covered {
                debug!(day = %day_name(day), member = %id, end = %end, "no-waiting member covered by existing party");
                continue;
            }
            if capability != DrivingCapability::Normal {
                debug!(day = %day_name(day), member = %id, "no-waiting member cannot drive");
                continue;
            }
            let options = PairOptions { designated: true, ..Default::default() };
            if self.create_party_pair(&id, day, options) {
                info!(day = %day_name(day), driver = %id, end = %end, "cannot wait, driving");
            }
        }
    }

    /// Number of pools on `from_day` or later, other than `current`, in which `id` is the
    /// only candidate.
    fn sole_candidate_pools(&self, pools: &[DriverPool], current: usize, id: &MemberId) -> usize {
        let from_day = pools[current].day();
        pools
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != current && p.day() >= from_day)
            .filter(|(_, p)| p.is_mandatory() && p.candidates[0].0 == *id)
            .count()
    }

    /// Picks the next driver for `pools[current]` among candidates not yet driving that day.
    ///
    /// Members under their drive quota are preferred. Among those the member needed least
    /// elsewhere wins, then the one with the fewest drives, then the one with the most seats.
    pub fn select_best_driver(&self, pools: &[DriverPool], current: usize) -> Option<MemberId> {
        let pool = &pools[current];
        let day = pool.day();
        let available = pool
            .candidates
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !self.is_driving(id, day))
            .collect::<Vec<&MemberId>>();
        let under_quota = available
            .iter()
            .copied()
            .filter(|id| self.members.get(*id).map_or(false, |s| s.is_under_quota()))
            .collect::<Vec<&MemberId>>();
        let candidates = if under_quota.is_empty() { available } else { under_quota };

        candidates
            .into_iter()
            .min_by_key(|id| {
                (
                    self.sole_candidate_pools(pools, current, id),
                    self.drive_count(id),
                    Reverse(self.seats(id)),
                    (*id).clone(),
                )
            })
            .cloned()
    }

    /// Grows each pool's driver capacity until it covers the pool's non-driving members.
    pub fn select_drivers(&mut self, pools: &[DriverPool]) {
        for day in 0..CYCLE_DAYS {
            self.assign_needs_car_drivers(day);
            self.assign_no_waiting_drivers(day);
        }

        for (index, pool) in pools.iter().enumerate() {
            let (day, direction) = (pool.day(), pool.direction());
            let mut remaining = pool
                .members()
                .iter()
                .filter(|id| !self.is_driving(id, day))
                .cloned()
                .collect::<Vec<MemberId>>();
            let mut capacity = self.capacity_near(day, direction, pool.time(), None);

            while remaining.len() > capacity {
                let mandatory = remaining
                    .iter()
                    .find(|id| pool.capability(id).is_some() && self.member(id).map_or(false, |m| m.needs_car(day)))
                    .cloned();
                let Some(driver) = mandatory.or_else(|| self.select_best_driver(pools, index)) else {
                    warn!(
                        pool = %pool.name,
                        remaining = remaining.len(),
                        capacity,
                        "no driver left to cover pool"
                    );
                    break;
                };

                let options = PairOptions {
                    designated: pool.is_mandatory(),
                    despite_custom_prefs: pool.capability(&driver) == Some(DrivingCapability::Desperate),
                    pool: Some((direction, pool.name.clone())),
                };
                if !self.create_party_pair(&driver, day, options) {
                    warn!(pool = %pool.name, driver = %driver, "selected driver has no travel times");
                    break;
                }
                debug!(
                    pool = %pool.name,
                    driver = %driver,
                    drives = self.drive_count(&driver),
                    "selected driver"
                );
                remaining.retain(|id| *id != driver);
                capacity = self.capacity_near(day, direction, pool.time(), None);
            }
        }
        self.assert_invariants();
    }
}
