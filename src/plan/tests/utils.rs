use crate::config::PlanConfig;
use crate::member::{CustomDayPreference, Member, MemberId, Timetable};
use crate::plan::context::AllocationContext;
use crate::time::{CYCLE_DAYS, Time};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn id(s: &str) -> MemberId {
    Arc::from(s)
}

pub fn t(hhmm: u16) -> Time {
    Time::from_hhmm(hhmm).unwrap()
}

pub fn add_member(
    members: &mut Vec<Member>,
    initials: &str,
    seats: u8,
    days: &[usize],
    start: u16,
    end: u16,
) {
    members.push(Member {
        initials: id(initials),
        first_name: format!("{}-first", initials),
        last_name: format!("{}-last", initials),
        seats,
        is_part_time: false,
        custom_days: BTreeMap::new(),
        timetable: days
            .iter()
            .map(|day| (*day, Timetable::new(Some(t(start)), Some(t(end)))))
            .collect(),
    });
}

pub fn set_custom(members: &mut [Member], initials: &str, day: usize, pref: CustomDayPreference) {
    let member = members
        .iter_mut()
        .find(|m| &*m.initials == initials)
        .unwrap();
    member.custom_days.insert(day, pref);
}

pub fn context(members: Vec<Member>) -> AllocationContext {
    AllocationContext::new(members, PlanConfig::default())
}

pub fn all_days() -> Vec<usize> {
    (0..CYCLE_DAYS).collect()
}

pub fn arb_preference() -> impl Strategy<Value = Option<CustomDayPreference>> {
    prop_oneof![
        4 => Just(None),
        1 => Just(Some(CustomDayPreference { needs_car: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { needs_car: true, skip_morning: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { needs_car: true, skip_afternoon: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { driving_skip: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { no_waiting_afternoon: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { ignore_completely: true, ..Default::default() })),
    ]
}

pub fn arb_timetable() -> impl Strategy<Value = Option<Timetable>> {
    prop_oneof![
        1 => Just(None),
        4 => (0..8u16, 0..12u16).prop_map(|(start, end)| {
            Some(Timetable::new(Some(Time(7 * 60 + start * 10)), Some(Time(12 * 60 + end * 20))))
        }),
    ]
}

pub fn arb_member(index: usize) -> impl Strategy<Value = Member> {
    (
        1..6u8,
        any::<bool>(),
        prop::collection::vec(arb_timetable(), CYCLE_DAYS),
        prop::collection::vec(arb_preference(), CYCLE_DAYS),
    )
        .prop_map(move |(seats, is_part_time, timetables, preferences)| Member {
            initials: Arc::from(format!("M{}", index)),
            first_name: format!("First{}", index),
            last_name: format!("Last{}", index),
            seats,
            is_part_time,
            custom_days: preferences
                .into_iter()
                .enumerate()
                .filter_map(|(day, pref)| pref.map(|p| (day, p)))
                .collect(),
            timetable: timetables
                .into_iter()
                .enumerate()
                .filter_map(|(day, tt)| tt.map(|t| (day, t)))
                .collect(),
        })
}

pub fn arb_roster() -> impl Strategy<Value = Vec<Member>> {
    (1..8usize).prop_flat_map(|count| (0..count).map(arb_member).collect::<Vec<_>>())
}

/// Mostly plain days, so most generated rosters can be planned.
pub fn arb_sparse_preference() -> impl Strategy<Value = Option<CustomDayPreference>> {
    prop_oneof![
        16 => Just(None),
        1 => Just(Some(CustomDayPreference { needs_car: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { needs_car: true, skip_afternoon: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { driving_skip: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { no_waiting_afternoon: true, ..Default::default() })),
        1 => Just(Some(CustomDayPreference { ignore_completely: true, ..Default::default() })),
    ]
}

pub fn arb_plannable_member(index: usize) -> impl Strategy<Value = Member> {
    (
        3..6u8,
        any::<bool>(),
        prop::collection::vec((0..4u16, 0..4u16), CYCLE_DAYS),
        prop::collection::vec(arb_sparse_preference(), CYCLE_DAYS),
    )
        .prop_map(move |(seats, is_part_time, times, preferences)| Member {
            initials: Arc::from(format!("M{}", index)),
            first_name: format!("First{}", index),
            last_name: format!("Last{}", index),
            seats,
            is_part_time,
            custom_days: preferences
                .into_iter()
                .enumerate()
                .filter_map(|(day, pref)| pref.map(|p| (day, p)))
                .collect(),
            timetable: times
                .into_iter()
                .enumerate()
                .map(|(day, (start, end))| {
                    (day, Timetable::new(Some(Time(7 * 60 + start * 5)), Some(Time(13 * 60 + end * 10))))
                })
                .collect(),
        })
}

/// Rosters of three or more members with roomy cars and a full timetable.
pub fn arb_plannable_roster() -> impl Strategy<Value = Vec<Member>> {
    (3..8usize).prop_flat_map(|count| (0..count).map(arb_plannable_member).collect::<Vec<_>>())
}
