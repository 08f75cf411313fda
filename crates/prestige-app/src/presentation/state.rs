use std::sync::Arc;

use prestige_domain::shared::Clock;
use prestige_domain::RewardsGateway;
use prestige_infrastructure::config::AppConfig;

use crate::application::services::{
    AuthService, CommunityService, CompetitionService, PointsService, RewardService,
};
use crate::application::AppStore;

pub struct Services {
    pub auth: Arc<AuthService>,
    pub competitions: Arc<CompetitionService>,
    pub rewards: Arc<RewardService>,
    pub community: Arc<CommunityService>,
    pub points: Arc<PointsService>,
}

/// Everything a command needs, wired once at startup
pub struct AppContext {
    pub store: Arc<AppStore>,
    pub services: Services,
}

impl AppContext {
    pub fn new(config: &AppConfig, gateway: Arc<dyn RewardsGateway>, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(AppStore::new());

        let services = Services {
            auth: Arc::new(AuthService::new(
                gateway.clone(),
                store.clone(),
                clock.clone(),
            )),
            competitions: Arc::new(CompetitionService::new(
                gateway.clone(),
                store.clone(),
                clock.clone(),
            )),
            rewards: Arc::new(RewardService::new(
                gateway.clone(),
                store.clone(),
                clock.clone(),
                config.reward_cycle_days,
            )),
            community: Arc::new(CommunityService::new(
                gateway.clone(),
                store.clone(),
                clock.clone(),
                config.api.signup_url.clone(),
                config.leaderboard_limit,
            )),
            points: Arc::new(PointsService::new(gateway, store.clone(), clock)),
        };

        Self { store, services }
    }
}
