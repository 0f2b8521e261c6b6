use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::member::Member;
use crate::plan::calculate_driving_plan;
use crate::plan::tests::utils::{arb_plannable_roster, arb_roster};
use crate::time::{CYCLE_DAYS, Direction};
use proptest::prelude::*;
use proptest::proptest;
use proptest::strategy::ValueTree;
use proptest::test_runner::{TestCaseError, TestRunner};

/// Checks a finished plan against the roster. Only a shortage of drivers may stop a run.
fn check_plan(members: &[Member], config: PlanConfig) -> Result<(), TestCaseError> {
    let plan = match calculate_driving_plan(members.to_vec(), config) {
        Ok(plan) => plan,
        Err(err) => {
            prop_assert!(matches!(err, PlanError::Allocation { .. }), "{}", err);
            return Ok(());
        }
    };

    for day in 0..CYCLE_DAYS {
        let day_plan = &plan.day_plans[&((day + 1) as u8)];
        for member in members {
            let initials = &*member.initials;
            let pref = member.custom_day(day);

            for direction in Direction::ALL {
                let seats = day_plan
                    .parties_in(direction)
                    .flat_map(|p| p.occupants())
                    .filter(|m| &***m == initials)
                    .count();
                let expected = usize::from(member.effective_time(day, direction).is_some());
                prop_assert!(
                    seats == expected || (seats == 1 && day_plan.is_driver(initials)),
                    "\n{} has {} seats {} on day {}", initials, seats, direction, day
                );
            }

            if pref.map_or(false, |c| c.ignore_completely) {
                prop_assert!(day_plan.party_of(initials, Direction::Schoolbound).is_none());
                prop_assert!(day_plan.party_of(initials, Direction::Homebound).is_none());
            }
            if member.needs_car(day) && !member.is_ignored(day) {
                let party = day_plan.parties.iter().find(|p| &*p.driver == initials);
                prop_assert!(party.map_or(false, |p| p.is_designated_driver), "\n{} needs car on day {}", initials, day);
            }
            if pref.map_or(false, |c| c.skip_morning) {
                if let Some(party) = day_plan.party_driven_by(initials, Direction::Schoolbound) {
                    prop_assert!(party.passengers.is_empty());
                }
            }
            if pref.map_or(false, |c| c.driving_skip) {
                let sole = day_plan.parties.iter().any(|p| &*p.driver == initials && p.drives_despite_custom_prefs);
                prop_assert!(!day_plan.is_driver(initials) || sole);
            }
        }

        for party in &day_plan.parties {
            let seats = members.iter().find(|m| m.initials == party.driver).map(|m| m.seats as usize).unwrap();
            prop_assert!(party.passengers.len() < seats.max(1), "\noverfull party of {}", party.driver);
        }
    }
    Ok(())
}

#[test]
fn test_roomy_rosters_mostly_plan() {
    let mut runner = TestRunner::deterministic();
    let strategy = arb_plannable_roster();
    let total = 200;
    let planned = (0..total)
        .filter(|_| {
            let members = strategy.new_tree(&mut runner).unwrap().current();
            match calculate_driving_plan(members, PlanConfig::default()) {
                Ok(_) => true,
                Err(PlanError::Allocation { .. }) => false,
                Err(err) => panic!("{}", err),
            }
        })
        .count();
    assert!(planned * 3 >= total * 2, "only {} of {} rosters planned", planned, total);
}

proptest! {
    #[test]
    fn test_plan_invariants(members in arb_roster(), tolerance in 10..45u16) {
        let config = PlanConfig { tolerance_minutes: tolerance, ..PlanConfig::default() };
        check_plan(&members, config)?;
    }

    #[test]
    fn test_plan_invariants_on_roomy_rosters(members in arb_plannable_roster(), tolerance in 15..45u16) {
        let config = PlanConfig { tolerance_minutes: tolerance, ..PlanConfig::default() };
        check_plan(&members, config)?;
    }

    #[test]
    fn test_plan_is_deterministic(members in arb_roster()) {
        let first = calculate_driving_plan(members.clone(), PlanConfig::default());
        let second = calculate_driving_plan(members, PlanConfig::default());
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "runs disagree on success"),
        }
    }
}
