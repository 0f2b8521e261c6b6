use crate::plan::context::AllocationContext;
use std::cmp::Reverse;

impl AllocationContext {
    /// One `- First (XY): n` line per member, busiest drivers first.
    pub fn summary(&self) -> String {
        let mut states = self.members.values().collect::<Vec<_>>();
        states.sort_by(|a, b| {
            (Reverse(a.drive_count()), &a.member.last_name, &a.member.first_name).cmp(&(
                Reverse(b.drive_count()),
                &b.member.last_name,
                &b.member.first_name,
            ))
        });
        states
            .iter()
            .map(|s| format!("- {} ({}): {}\n", s.member.first_name, s.member.initials, s.drive_count()))
            .collect()
    }
}
