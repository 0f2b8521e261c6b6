use crate::member::Member;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanConfig {
    /// Maximum minute deviation for two times to count as compatible.
    pub tolerance_minutes: u16,
    #[serde(alias = "maxDrivesFulltime")]
    pub max_drives_full_time: usize,
    pub max_drives_part_time: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        PlanConfig {
            tolerance_minutes: 30,
            max_drives_full_time: 4,
            max_drives_part_time: 2,
        }
    }
}

impl PlanConfig {
    pub fn max_drives(&self, member: &Member) -> usize {
        if member.is_part_time {
            self.max_drives_part_time
        } else {
            self.max_drives_full_time
        }
    }
}
