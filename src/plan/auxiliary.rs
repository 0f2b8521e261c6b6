use crate::member::{DrivingCapability, MemberId};
use crate::plan::context::{AllocationContext, PairOptions};
use crate::plan::pools::{DriverPool, pool_of};
use crate::time::{CYCLE_DAYS, Direction, day_name};
use tracing::info;

/// Spare seats at or below this count mark a pool as near-full.
const NEAR_FULL_SPARE_SEATS: isize = 2;

impl AllocationContext {
    /// Spare seats of the parties serving `pool`, or `None` when no party serves it.
    pub fn spare_seats(&self, pool: &DriverPool) -> Option<isize> {
        let (day, direction) = (pool.day(), pool.direction());
        let serving = self
            .parties(day, direction)
            .iter()
            .any(|p| !p.is_lonely_driver && p.time.is_within(pool.time(), self.tolerance()));
        if !serving {
            return None;
        }
        let capacity = self.capacity_near(day, direction, pool.time(), None) as isize;
        let required = pool
            .members()
            .iter()
            .filter(|id| !self.is_driving(id, day))
            .count() as isize;
        Some(capacity - required)
    }

    fn first_near_full_day(&self, pools: &[DriverPool], id: &MemberId) -> Option<(usize, Direction, String)> {
        let member = self.member(id)?;
        (0..CYCLE_DAYS)
            .filter(|day| !self.is_driving(id, *day))
            .filter(|day| member.driving_capability(*day, false) == DrivingCapability::Normal)
            .flat_map(|day| Direction::ALL.into_iter().map(move |direction| (day, direction)))
            .find_map(|(day, direction)| {
                let pool = pool_of(pools, day, direction, id)?;
                let spare = self.spare_seats(pool)?;
                (0..=NEAR_FULL_SPARE_SEATS)
                    .contains(&spare)
                    .then(|| (day, direction, pool.name.clone()))
            })
    }

    /// Gives every member under quota at most one extra drive on a day whose pool is nearly full.
    pub fn inject_auxiliary_drivers(&mut self, pools: &[DriverPool]) {
        let ids = self
            .members
            .iter()
            .filter(|(_, s)| s.is_under_quota())
            .map(|(id, _)| id.clone())
            .collect::<Vec<MemberId>>();
        for id in ids {
            let Some((day, direction, name)) = self.first_near_full_day(pools, &id) else {
                continue;
            };
            let options = PairOptions { pool: Some((direction, name.clone())), ..Default::default() };
            if self.create_party_pair(&id, day, options) {
                info!(day = %day_name(day), driver = %id, pool = %name, "injected auxiliary driver");
            }
        }
        self.assert_invariants();
    }
}
