use log::info;
use std::sync::Arc;

use prestige_domain::points::PointsConversion;
use prestige_domain::shared::{Clock, DomainError};
use prestige_domain::RewardsGateway;

use crate::application::dtos::ConversionDto;
use crate::application::AppStore;

pub struct PointsService {
    gateway: Arc<dyn RewardsGateway>,
    store: Arc<AppStore>,
    clock: Arc<dyn Clock>,
}

impl PointsService {
    pub fn new(
        gateway: Arc<dyn RewardsGateway>,
        store: Arc<AppStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            store,
            clock,
        }
    }

    /// Validated against the balance in the store; the server's balances
    /// are written back on success.
    pub async fn convert(&self, points: u64) -> Result<ConversionDto, DomainError> {
        let session = self.store.authenticated_session(self.clock.now())?;
        let conversion = PointsConversion::new(points, session.user().points)?;

        let outcome = self.gateway.convert_points(&session, conversion).await?;

        let updated = session
            .user()
            .clone()
            .with_balances(outcome.points, outcome.prestige_tickets);
        self.store.replace_profile(updated);

        info!(
            "[points] converted {} points: {} points / {} tickets left",
            points, outcome.points, outcome.prestige_tickets
        );

        Ok(ConversionDto {
            converted_points: points,
            points: outcome.points,
            prestige_tickets: outcome.prestige_tickets,
        })
    }
}
