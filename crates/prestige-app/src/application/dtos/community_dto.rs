use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRowDto {
    pub rank: u32,
    pub user_id: String,
    pub username: String,
    pub points: u64,
    pub is_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardDto {
    pub entries: Vec<LeaderboardRowDto>,
    /// Rank of the signed-in user, when they made the cut
    pub current_user_rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralDto {
    pub code: String,
    pub link: String,
    pub referred_count: u32,
    pub points_earned: u64,
}
