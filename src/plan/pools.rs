use crate::member::{DrivingCapability, MemberId};
use crate::plan::context::AllocationContext;
use crate::plan::grouping::TimeSlot;
use crate::time::{CYCLE_DAYS, Direction, Time, day_tag};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DriverPool {
    pub slot: TimeSlot,
    /// Members able to drive in this pool, in initials order.
    pub candidates: Vec<(MemberId, DrivingCapability)>,
    pub name: String,
}

impl DriverPool {
    pub fn day(&self) -> usize {
        self.slot.day
    }

    pub fn direction(&self) -> Direction {
        self.slot.direction
    }

    pub fn time(&self) -> Time {
        self.slot.time
    }

    pub fn members(&self) -> &[MemberId] {
        &self.slot.members
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.slot.members.contains(id)
    }

    /// A pool with a single candidate leaves no choice of driver.
    pub fn is_mandatory(&self) -> bool {
        self.candidates.len() == 1
    }

    pub fn capability(&self, id: &MemberId) -> Option<DrivingCapability> {
        self.candidates.iter().find(|(c, _)| c == id).map(|(_, cap)| *cap)
    }
}

pub(crate) fn pool_name(slot: &TimeSlot, tolerance: u16) -> String {
    format!(
        "pool-{}-{}-{:04}-tol{}",
        day_tag(slot.day),
        slot.direction,
        slot.time.hhmm(),
        tolerance
    )
}

/// Finds the pool of a day and direction that `id` travels in.
pub(crate) fn pool_of<'a>(
    pools: &'a [DriverPool],
    day: usize,
    direction: Direction,
    id: &MemberId,
) -> Option<&'a DriverPool> {
    pools
        .iter()
        .find(|p| p.day() == day && p.direction() == direction && p.contains(id))
}

impl AllocationContext {
    pub fn driver_pool(&self, slot: TimeSlot) -> Option<DriverPool> {
        let sole_member = slot.members.len() == 1;
        let candidates = slot
            .members
            .iter()
            .filter_map(|id| {
                let capability = self.member(id)?.driving_capability(slot.day, sole_member);
                capability.can_drive().then(|| (id.clone(), capability))
            })
            .collect::<Vec<_>>();
        let name = pool_name(&slot, self.tolerance());
        if candidates.is_empty() {
            debug!(pool = %name, members = slot.members.len(), "dropping pool without candidates");
            return None;
        }
        Some(DriverPool { slot, candidates, name })
    }

    /// Every pool of the cycle, smallest first.
    pub fn create_all_pools(&self) -> Vec<DriverPool> {
        let mut pools = (0..CYCLE_DAYS)
            .flat_map(|day| Direction::ALL.into_iter().map(move |direction| (day, direction)))
            .flat_map(|(day, direction)| self.group_members_by_time(day, direction))
            .filter_map(|slot| self.driver_pool(slot))
            .collect::<Vec<DriverPool>>();
        pools.sort_by_key(|p| p.members().len());
        pools
    }
}
