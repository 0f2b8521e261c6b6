use crate::config::PlanConfig;
use crate::member::Member;
use serde::Deserialize;
use std::io;
use std::path::Path;

/// A decoded planning request: the carpool members and optional settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub config: PlanConfig,
    #[serde(alias = "members")]
    pub persons: Vec<Member>,
}

impl Roster {
    pub fn load_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let roster: Roster = serde_json::from_str(&data)?;
        Ok(roster)
    }
}
