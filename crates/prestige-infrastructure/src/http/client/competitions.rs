use anyhow::Result;
use log::{debug, info};

use prestige_domain::competition::Competition;
use prestige_domain::gateway::EntryReceipt;
use prestige_domain::session::Session;
use prestige_domain::shared::CompetitionId;

use super::ApiClient;
use crate::http::dto::{normalize_each, CompetitionPayload, EntryPayload, ListEnvelope};

impl ApiClient {
    pub(super) async fn fetch_competitions(&self, session: &Session) -> Result<Vec<Competition>> {
        let url = self.endpoint(&["competitions"])?;
        let envelope: ListEnvelope = self
            .get_json("List competitions", url, session.token())
            .await?;

        let items = envelope.into_items();
        let total = items.len();
        let competitions = normalize_each::<CompetitionPayload, Competition>("competition", items);

        debug!(
            "[competition] listed {} of {} records",
            competitions.len(),
            total
        );
        Ok(competitions)
    }

    pub(super) async fn fetch_competition(
        &self,
        session: &Session,
        id: &CompetitionId,
    ) -> Result<Competition> {
        let url = self.endpoint(&["competitions", id.as_str()])?;
        let payload: CompetitionPayload = self
            .get_json("Get competition", url, session.token())
            .await?;

        Ok(Competition::try_from(payload)?)
    }

    pub(super) async fn post_entry(
        &self,
        session: &Session,
        id: &CompetitionId,
    ) -> Result<EntryReceipt> {
        let url = self.endpoint(&["competitions", id.as_str(), "enter"])?;
        let payload: EntryPayload = self
            .post_json(
                "Enter competition",
                url,
                Some(session.token()),
                &serde_json::json!({}),
            )
            .await?;

        let receipt = EntryReceipt::try_from(payload)?;
        info!("[competition] entered {}", id);
        Ok(receipt)
    }
}
