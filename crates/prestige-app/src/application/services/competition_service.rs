use log::{debug, info};
use std::sync::Arc;

use prestige_domain::competition::{sort_for_display, CompetitionFilter};
use prestige_domain::shared::{Clock, CompetitionId, DomainError};
use prestige_domain::RewardsGateway;

use super::refresh_profile_after;
use crate::application::dtos::{CompetitionCardDto, EntryResultDto};
use crate::application::AppStore;

pub struct CompetitionService {
    gateway: Arc<dyn RewardsGateway>,
    store: Arc<AppStore>,
    clock: Arc<dyn Clock>,
}

impl CompetitionService {
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

    /// Cards in display order, phases evaluated once at a single instant
    pub async fn list_cards(
        &self,
        filter: CompetitionFilter,
    ) -> Result<Vec<CompetitionCardDto>, DomainError> {
        let now = self.clock.now();
        let session = self.store.authenticated_session(now)?;

        let mut competitions = self.gateway.list_competitions(&session).await?;
        competitions.retain(|c| filter.matches(c.phase_at(now)));
        sort_for_display(&mut competitions, now);

        debug!(
            "[competition] {} cards for filter {:?}",
            competitions.len(),
            filter
        );

        let tickets = session.user().prestige_tickets;
        Ok(competitions
            .iter()
            .map(|c| CompetitionCardDto::build(c, tickets, now))
            .collect())
    }

    pub async fn card(&self, id: &str) -> Result<CompetitionCardDto, DomainError> {
        let now = self.clock.now();
        let session = self.store.authenticated_session(now)?;

        let competition = self
            .gateway
            .get_competition(&session, &CompetitionId::from_string(id))
            .await?;

        Ok(CompetitionCardDto::build(
            &competition,
            session.user().prestige_tickets,
            now,
        ))
    }

    /// Precheck against a fresh copy of the competition, post the entry,
    /// then pull the new ticket balance into the store.
    pub async fn enter(&self, id: &str) -> Result<EntryResultDto, DomainError> {
        let now = self.clock.now();
        let session = self.store.authenticated_session(now)?;
        let competition_id = CompetitionId::from_string(id);

        let competition = self
            .gateway
            .get_competition(&session, &competition_id)
            .await?;
        competition.check_entry(session.user().prestige_tickets, now)?;

        let receipt = self
            .gateway
            .enter_competition(&session, &competition_id)
            .await?;

        let user =
            refresh_profile_after("competition", self.gateway.as_ref(), &self.store, &session)
                .await;

        info!(
            "[competition] {} entered '{}', {} tickets left",
            user.username, competition.title, user.prestige_tickets
        );

        Ok(EntryResultDto {
            competition_id: competition_id.as_str().to_string(),
            message: receipt.message,
            prestige_tickets: user.prestige_tickets,
        })
    }
}
