use crate::config::PlanConfig;
use crate::error::{PlanError, PlanResult};
use crate::member::Member;
use crate::party::DrivingPlan;
use crate::time::CYCLE_DAYS;
use context::AllocationContext;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{error, info};

mod assemble;
mod auxiliary;
mod context;
mod grouping;
mod passengers;
mod pools;
mod rebalance;
mod selection;
mod summary;


/// Every problem of the roster, or an empty list if it can be planned.
pub fn validate_members(members: &[Member]) -> Vec<String> {
    let mut errors = members.iter().flat_map(Member::validate).collect::<Vec<String>>();
    let mut seen = BTreeSet::new();
    for member in members {
        if !seen.insert(&member.initials) {
            errors.push(format!("{}: duplicate initials", member.initials));
        }
    }
    errors
}

/// Computes the driving plan of one cycle.
///
/// Runs the allocation phases in order on a fresh context: time slot grouping and driver
/// pools, driver selection, rebalancing, auxiliary drivers and passenger assignment. Each
/// day is checked before it is returned; any failure aborts the whole run.
pub fn calculate_driving_plan(members: Vec<Member>, config: PlanConfig) -> PlanResult<DrivingPlan> {
    let errors = validate_members(&members);
    if !errors.is_empty() {
        error!(count = errors.len(), "roster failed validation");
        return Err(PlanError::Validation(errors));
    }

    let mut ctx = AllocationContext::new(members, config);
    info!(
        members = ctx.members.len(),
        tolerance = config.tolerance_minutes,
        max_drives_full_time = config.max_drives_full_time,
        max_drives_part_time = config.max_drives_part_time,
        "planning cycle"
    );

    let pools = ctx.create_all_pools();
    info!(pools = pools.len(), "phase 1: grouped members into driver pools");

    ctx.select_drivers(&pools);
    info!(drives = ctx.total_drives(), "phase 2: selected drivers");

    ctx.rebalance(&pools);
    info!("phase 3: rebalanced over-quota drivers");

    ctx.inject_auxiliary_drivers(&pools);
    info!(drives = ctx.total_drives(), "phase 4: injected auxiliary drivers");

    ctx.assign_passengers()?;
    info!("phase 5: assigned passengers");

    let day_plans = (0..CYCLE_DAYS)
        .map(|day| Ok(((day + 1) as u8, ctx.build_day_plan(day)?)))
        .collect::<PlanResult<BTreeMap<u8, _>>>()?;

    Ok(DrivingPlan { summary: ctx.summary(), day_plans })
}
