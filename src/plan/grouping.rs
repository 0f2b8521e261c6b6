use crate::member::MemberId;
use crate::plan::context::AllocationContext;
use crate::time::{Direction, Time};

/// Members of one day and direction travelling at compatible times.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimeSlot {
    pub day: usize,
    pub direction: Direction,
    /// Effective time of the member that opened the slot.
    pub time: Time,
    /// In initials order.
    pub members: Vec<MemberId>,
}

impl AllocationContext {
    /// Clusters the travelling members of `day` into tolerance buckets.
    ///
    /// Each member joins the first slot whose anchor time is within tolerance of its own
    /// effective time. Matching is against the anchor only, so two members of one slot
    /// may be up to twice the tolerance apart.
    pub fn group_members_by_time(&self, day: usize, direction: Direction) -> Vec<TimeSlot> {
        let mut slots: Vec<TimeSlot> = vec![];
        for (id, state) in &self.members {
            let Some(time) = state.member.effective_time(day, direction) else {
                continue;
            };
            match slots
                .iter_mut()
                .find(|slot| slot.time.is_within(time, self.tolerance()))
            {
                Some(slot) => slot.members.push(id.clone()),
                None => slots.push(TimeSlot {
                    day,
                    direction,
                    time,
                    members: vec![id.clone()],
                }),
            }
        }
        slots
    }
}
