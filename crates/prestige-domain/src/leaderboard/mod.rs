use serde::{Deserialize, Serialize};

use crate::shared::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub points: u64,
}

/// Order by points (ties by username) and assign standard competition
/// ranks: equal points share a rank and the following rank is skipped.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.username.cmp(&b.username))
    });

    let mut previous_points: Option<u64> = None;
    let mut current_rank = 0u32;

    for (index, entry) in entries.iter_mut().enumerate() {
        if previous_points != Some(entry.points) {
            current_rank = index as u32 + 1;
            previous_points = Some(entry.points);
        }
        entry.rank = current_rank;
    }

    entries
}
