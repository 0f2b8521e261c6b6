use crate::config::PlanConfig;
use crate::member::{Member, MemberId};
use crate::party::Party;
use crate::time::{CYCLE_DAYS, Direction, Time, day_name};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Two times closer than this count as "the same time".
pub(crate) const NEAR_MINUTES: u16 = 5;

pub(crate) struct MemberState {
    pub member: Member,
    pub max_drives: usize,
    pub driving_days: BTreeSet<usize>,
}

impl MemberState {
    pub fn drive_count(&self) -> usize {
        self.driving_days.len()
    }

    pub fn is_under_quota(&self) -> bool {
        self.drive_count() < self.max_drives
    }

    pub fn is_driving(&self, day: usize) -> bool {
        self.driving_days.contains(&day)
    }
}

#[derive(Default)]
pub(crate) struct DayParties {
    pub schoolbound: Vec<Party>,
    pub homebound: Vec<Party>,
}

impl DayParties {
    pub fn get(&self, direction: Direction) -> &Vec<Party> {
        match direction {
            Direction::Schoolbound => &self.schoolbound,
            Direction::Homebound => &self.homebound,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut Vec<Party> {
        match direction {
            Direction::Schoolbound => &mut self.schoolbound,
            Direction::Homebound => &mut self.homebound,
        }
    }
}

/// How a party pair is flagged when it is created.
#[derive(Default, Clone)]
pub(crate) struct PairOptions {
    pub designated: bool,
    pub despite_custom_prefs: bool,
    /// Pool the pair was created for, tagged onto the party of that direction.
    pub pool: Option<(Direction, String)>,
}

/// All mutable state of one planning run.
pub(crate) struct AllocationContext {
    pub config: PlanConfig,
    pub members: BTreeMap<MemberId, MemberState>,
    pub parties: Vec<DayParties>,
}

impl AllocationContext {
    pub fn new(members: Vec<Member>, config: PlanConfig) -> AllocationContext {
        let members = members
            .into_iter()
            .map(|member| {
                let max_drives = config.max_drives(&member);
                (
                    member.initials.clone(),
                    MemberState { member, max_drives, driving_days: BTreeSet::new() },
                )
            })
            .collect();
        AllocationContext {
            config,
            members,
            parties: (0..CYCLE_DAYS).map(|_| DayParties::default()).collect(),
        }
    }

    pub fn tolerance(&self) -> u16 {
        self.config.tolerance_minutes
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id).map(|s| &s.member)
    }

    pub fn is_driving(&self, id: &MemberId, day: usize) -> bool {
        self.members.get(id).map_or(false, |s| s.is_driving(day))
    }

    pub fn drive_count(&self, id: &MemberId) -> usize {
        self.members.get(id).map_or(0, |s| s.drive_count())
    }

    pub fn total_drives(&self) -> usize {
        self.members.values().map(|s| s.drive_count()).sum()
    }

    pub fn seats(&self, id: &MemberId) -> usize {
        self.member(id).map_or(0, |m| m.seats as usize)
    }

    pub fn parties(&self, day: usize, direction: Direction) -> &Vec<Party> {
        self.parties[day].get(direction)
    }

    pub fn drivers_on(&self, day: usize) -> BTreeSet<MemberId> {
        Direction::ALL
            .iter()
            .flat_map(|d| self.parties(day, *d).iter().map(|p| p.driver.clone()))
            .collect()
    }

    pub fn free_seats(&self, party: &Party) -> usize {
        self.seats(&party.driver)
            .saturating_sub(1)
            .saturating_sub(party.passengers.len())
    }

    /// Free seats of the non-lonely parties whose time is within tolerance of `time`.
    pub fn capacity_near(
        &self,
        day: usize,
        direction: Direction,
        time: Time,
        excluding: Option<&MemberId>,
    ) -> usize {
        self.parties(day, direction)
            .iter()
            .filter(|p| !p.is_lonely_driver)
            .filter(|p| excluding.map_or(true, |id| p.driver != *id))
            .filter(|p| p.time.is_within(time, self.tolerance()))
            .map(|p| self.free_seats(p))
            .sum()
    }

    /// Time a driver's party leaves at: the raw time when lonely, the effective time otherwise.
    pub fn party_time(&self, id: &MemberId, day: usize, direction: Direction) -> Option<Time> {
        let member = self.member(id)?;
        if member.is_lonely(day, direction) {
            member.raw_time(day, direction)
        } else {
            member.effective_time(day, direction)
        }
    }

    /// Creates the schoolbound and homebound parties of `id` on `day` and books the drive.
    ///
    /// A direction without any time gets no party. Returns `false` if no party could be
    /// created at all, in which case the member is not counted as driving.
    pub fn create_party_pair(&mut self, id: &MemberId, day: usize, options: PairOptions) -> bool {
        let Some(member) = self.member(id) else {
            return false;
        };
        let parties = Direction::ALL
            .iter()
            .filter_map(|direction| {
                let time = self.party_time(id, day, *direction)?;
                let mut party = Party::new(id.clone(), *direction, time);
                party.is_designated_driver = options.designated;
                party.drives_despite_custom_prefs = options.despite_custom_prefs;
                party.is_lonely_driver = member.is_lonely(day, *direction);
                party.pool_name = options
                    .pool
                    .as_ref()
                    .filter(|(d, _)| d == direction)
                    .map(|(_, name)| name.clone());
                Some(party)
            })
            .collect::<Vec<Party>>();

        if parties.is_empty() {
            return false;
        }
        for party in parties {
            debug!(
                day = %day_name(day),
                driver = %party.driver,
                direction = %party.direction,
                time = %party.time,
                designated = party.is_designated_driver,
                lonely = party.is_lonely_driver,
                "created party"
            );
            self.parties[day].get_mut(party.direction).push(party);
        }
        if let Some(state) = self.members.get_mut(id) {
            state.driving_days.insert(day);
        }
        true
    }

    /// Drops every party `id` drives on `day` and releases the drive.
    pub fn remove_party_pair(&mut self, id: &MemberId, day: usize) {
        for direction in Direction::ALL {
            self.parties[day].get_mut(direction).retain(|p| p.driver != *id);
        }
        if let Some(state) = self.members.get_mut(id) {
            state.driving_days.remove(&day);
        }
    }

    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        for (id, state) in &self.members {
            for day in 0..CYCLE_DAYS {
                let drives = Direction::ALL
                    .iter()
                    .any(|d| self.parties(day, *d).iter().any(|p| p.driver == *id));
                debug_assert_eq!(
                    drives,
                    state.is_driving(day),
                    "driving day ledger of {} out of sync on {}",
                    id,
                    day_name(day)
                );
            }
        }
        for day_parties in &self.parties {
            for direction in Direction::ALL {
                let parties = day_parties.get(direction);
                let drivers: BTreeSet<&MemberId> = parties.iter().map(|p| &p.driver).collect();
                debug_assert_eq!(drivers.len(), parties.len(), "driver with two parties in one direction");
            }
        }
    }

    #[cfg(not(debug_assertions))]
    pub fn assert_invariants(&self) {}
}
