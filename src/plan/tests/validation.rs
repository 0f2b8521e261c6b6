use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::member::CustomDayPreference;
use crate::plan::context::PairOptions;
use crate::plan::tests::utils::{add_member, context, id, set_custom};
use crate::plan::{calculate_driving_plan, validate_members};
use crate::time::Direction::Schoolbound;

#[test]
fn test_validation_collects_every_problem() {
    let mut members = vec![];
    add_member(&mut members, "A", 3, &[0], 800, 1500);
    add_member(&mut members, "B", 0, &[0], 800, 1500);
    add_member(&mut members, "A", 2, &[1], 800, 1500);
    set_custom(
        &mut members,
        "B",
        2,
        CustomDayPreference { needs_car: true, driving_skip: true, ..Default::default() },
    );

    assert_eq!(
        validate_members(&members),
        vec![
            "B: numberOfSeats must be at least 1",
            "B: Day 2: needsCar and drivingSkip are mutually exclusive",
            "A: duplicate initials",
        ]
    );
    let err = calculate_driving_plan(members, PlanConfig::default()).unwrap_err();
    match err {
        PlanError::Validation(errors) => assert_eq!(errors.len(), 3),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unseated_members_violate_day_plan() {
    let mut members = vec![];
    add_member(&mut members, "A", 3, &[0], 800, 1500);
    add_member(&mut members, "B", 3, &[0], 800, 1500);
    let mut ctx = context(members);
    ctx.create_party_pair(&id("A"), 0, PairOptions::default());

    match ctx.build_day_plan(0).unwrap_err() {
        PlanError::InvariantViolation { day, violations } => {
            assert_eq!(day, "Monday (A)");
            assert_eq!(violations, vec!["B has no seat schoolbound", "B has no seat homebound"]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_corrupted_parties_violate_day_plan() {
    let mut members = vec![];
    add_member(&mut members, "A", 3, &[0], 800, 1500);
    add_member(&mut members, "B", 3, &[0], 800, 1500);
    add_member(&mut members, "I", 3, &[0], 800, 1500);
    add_member(&mut members, "Z", 3, &[0], 800, 1500);
    set_custom(&mut members, "I", 0, CustomDayPreference { ignore_completely: true, ..Default::default() });
    set_custom(
        &mut members,
        "Z",
        0,
        CustomDayPreference { needs_car: true, skip_morning: true, ..Default::default() },
    );
    let mut ctx = context(members);
    ctx.create_party_pair(&id("A"), 0, PairOptions::default());
    ctx.create_party_pair(&id("B"), 0, PairOptions::default());
    ctx.create_party_pair(&id("Z"), 0, PairOptions::default());
    ctx.parties[0].schoolbound[0].passengers.push(id("B"));
    ctx.parties[0].schoolbound[0].passengers.push(id("I"));
    ctx.parties[0].schoolbound[2].passengers.push(id("A"));

    let PlanError::InvariantViolation { violations, .. } = ctx.build_day_plan(0).unwrap_err() else {
        panic!("expected an invariant violation");
    };
    assert!(violations.contains(&"A is both driver and passenger".to_string()));
    assert!(violations.contains(&"B is both driver and passenger".to_string()));
    assert!(violations.contains(&"A occupies 2 seats schoolbound".to_string()));
    assert!(violations.contains(&"I is ignored but rides schoolbound".to_string()));
    assert!(violations.contains(&"Z skips the schoolbound ride but carries 1 passengers".to_string()));
}

#[test]
fn test_needs_car_member_must_drive() {
    let mut members = vec![];
    add_member(&mut members, "A", 3, &[0], 800, 1500);
    add_member(&mut members, "Z", 3, &[0], 800, 1500);
    set_custom(&mut members, "Z", 0, CustomDayPreference { needs_car: true, ..Default::default() });
    let mut ctx = context(members);
    ctx.create_party_pair(&id("A"), 0, PairOptions::default());
    ctx.parties[0].schoolbound[0].passengers.push(id("Z"));
    ctx.parties[0].homebound[0].passengers.push(id("Z"));

    let PlanError::InvariantViolation { violations, .. } = ctx.build_day_plan(0).unwrap_err() else {
        panic!("expected an invariant violation");
    };
    assert_eq!(violations, vec!["Z needs their car but does not drive"]);
}

#[test]
fn test_valid_day_plan_builds() {
    let mut members = vec![];
    add_member(&mut members, "A", 3, &[0], 800, 1500);
    add_member(&mut members, "B", 3, &[0], 800, 1500);
    let mut ctx = context(members);
    ctx.create_party_pair(&id("A"), 0, PairOptions::default());
    ctx.assign_passengers().unwrap();

    let day = ctx.build_day_plan(0).unwrap();
    assert_eq!(day.day_of_week_ab_combo.unique_number, 1);
    assert_eq!(day.parties.len(), 2);
    assert!(day.parties[0].is_schoolbound());
    assert_eq!(day.party_driven_by("A", Schoolbound).unwrap().passengers, vec![id("B")]);
    assert!(day.schoolbound_time_info_by_initials.contains_key(&id("B")));
    // other days have nobody travelling
    assert!(ctx.build_day_plan(1).unwrap().parties.is_empty());
}
