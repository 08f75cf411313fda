mod auth_service;
mod community_service;
mod competition_service;
mod points_service;
mod reward_service;

#[cfg(test)]
mod test_support;

pub use auth_service::AuthService;
pub use community_service::CommunityService;
pub use competition_service::CompetitionService;
pub use points_service::PointsService;
pub use reward_service::RewardService;

use log::warn;

use prestige_domain::account::UserProfile;
use prestige_domain::session::Session;
use prestige_domain::shared::DomainError;
use prestige_domain::RewardsGateway;

use super::AppStore;

/// Re-read the profile after a balance-changing call and publish it
async fn refresh_profile(
    gateway: &dyn RewardsGateway,
    store: &AppStore,
    session: &Session,
) -> Result<UserProfile, DomainError> {
    let user = gateway.current_user(session).await?;
    store.replace_profile(user.clone());
    Ok(user)
}

/// Like `refresh_profile`, but the mutation already succeeded: a failed
/// re-read leaves the stale profile in place instead of failing the call.
async fn refresh_profile_after(
    operation: &str,
    gateway: &dyn RewardsGateway,
    store: &AppStore,
    session: &Session,
) -> UserProfile {
    match refresh_profile(gateway, store, session).await {
        Ok(user) => user,
        Err(e) => {
            warn!("[{}] profile refresh failed, balances may be stale: {}", operation, e);
            session.user().clone()
        }
    }
}
