//! Carpool driving plans for a two-week A/B school cycle.
//!
//! [`calculate_driving_plan`] takes the roster of a carpool with each member's timetable
//! and day preferences and decides who drives whom on each of the ten school days.

pub mod config;
pub mod error;
pub mod member;
pub mod party;
pub mod plan;
pub mod roster;
pub mod time;

pub use config::PlanConfig;
pub use error::{PlanError, PlanResult};
pub use member::{CustomDayPreference, Member, MemberId, Timetable};
pub use party::{DayPlan, DrivingPlan, Party};
pub use plan::{calculate_driving_plan, validate_members};
pub use roster::Roster;
pub use time::{Direction, Time};
