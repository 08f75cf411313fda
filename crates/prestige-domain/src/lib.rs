// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod account;
pub mod competition;
pub mod daily_reward;
pub mod gateway;
pub mod leaderboard;
pub mod points;
pub mod referral;
pub mod session;
pub mod shared;

// Re-exports for convenience
pub use gateway::RewardsGateway;
pub use shared::{Clock, CompetitionId, DomainError, SystemClock, UserId};
