use crate::member::MemberId;
use crate::plan::context::{AllocationContext, PairOptions};
use crate::plan::pools::{DriverPool, pool_of};
use crate::time::{Direction, day_name};
use std::cmp::Reverse;
use tracing::{debug, info};

impl AllocationContext {
    /// Members over their drive quota who drive at least one non-designated party.
    pub fn problematic_drivers(&self) -> Vec<MemberId> {
        self.members
            .iter()
            .filter(|(_, s)| s.drive_count() > s.max_drives)
            .filter(|(id, s)| {
                s.driving_days.iter().any(|day| {
                    Direction::ALL.iter().any(|d| {
                        self.parties(*day, *d)
                            .iter()
                            .any(|p| p.driver == **id && !p.is_designated_driver)
                    })
                })
            })
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn best_savior(&self, pool: &DriverPool, day: usize) -> Option<MemberId> {
        pool.candidates
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !self.is_driving(id, day))
            .filter(|id| self.members.get(*id).map_or(false, |s| s.is_under_quota()))
            .min_by_key(|id| (self.drive_count(id), Reverse(self.seats(id)), (*id).clone()))
            .cloned()
    }

    /// Whether both directions of `day` still seat everybody once `savior` drives instead of `driver`.
    pub fn swap_fits(&self, pools: &[DriverPool], driver: &MemberId, savior: &MemberId, day: usize) -> bool {
        for direction in Direction::ALL {
            let Some(pool) = pool_of(pools, day, direction, driver) else {
                continue;
            };
            if !pool.contains(savior) {
                return false;
            }
            let savior_lonely = self.member(savior).map_or(true, |m| m.is_lonely(day, direction));
            let savior_seats = if savior_lonely { 0 } else { self.seats(savior).saturating_sub(1) };
            let capacity = self.capacity_near(day, direction, pool.time(), Some(driver)) + savior_seats;
            let required = pool
                .members()
                .iter()
                .filter(|id| *id != savior && (*id == driver || !self.is_driving(id, day)))
                .count();
            if capacity < required {
                debug!(
                    day = %day_name(day),
                    direction = %direction,
                    driver = %driver,
                    savior = %savior,
                    capacity,
                    required,
                    "swap rejected"
                );
                return false;
            }
        }
        true
    }

    /// Hands one non-designated drive of every over-quota driver to an under-used pool mate.
    pub fn rebalance(&mut self, pools: &[DriverPool]) {
        for driver in self.problematic_drivers() {
            let days = self
                .members
                .get(&driver)
                .map(|s| s.driving_days.iter().copied().collect::<Vec<usize>>())
                .unwrap_or_default();
            'days: for day in days {
                for direction in Direction::ALL {
                    let has_free_party = self
                        .parties(day, direction)
                        .iter()
                        .any(|p| p.driver == driver && !p.is_designated_driver);
                    if !has_free_party {
                        continue;
                    }
                    let Some(pool) = pool_of(pools, day, direction, &driver) else {
                        continue;
                    };
                    let Some(savior) = self.best_savior(pool, day) else {
                        continue;
                    };
                    if !self.swap_fits(pools, &driver, &savior, day) {
                        continue;
                    }

                    let options = PairOptions {
                        pool: Some((direction, pool.name.clone())),
                        ..Default::default()
                    };
                    // the driver keeps the day unless the savior actually got parties
                    if self.create_party_pair(&savior, day, options) {
                        self.remove_party_pair(&driver, day);
                        info!(day = %day_name(day), from = %driver, to = %savior, "rebalanced drive");
                        break 'days;
                    }
                }
            }
        }
        self.assert_invariants();
    }
}
