use crate::member::MemberId;
use crate::time::{Direction, Time};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    /// Malformed roster, found before any allocation happens.
    #[error("input validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error(
        "no party on {day} ({direction}) can take passenger {passenger} at {time} \
         (tolerance {tolerance} min); drivers were under-provisioned"
    )]
    Allocation {
        day: String,
        direction: Direction,
        passenger: MemberId,
        time: Time,
        tolerance: u16,
    },

    #[error("plan for {day} violates invariants:\n{}", .violations.join("\n"))]
    InvariantViolation { day: String, violations: Vec<String> },
}

pub type PlanResult<T> = Result<T, PlanError>;
