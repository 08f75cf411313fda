use anyhow::Result;

use prestige_domain::leaderboard::{rank_entries, LeaderboardEntry};
use prestige_domain::referral::ReferralSummary;
use prestige_domain::session::Session;

use super::ApiClient;
use crate::http::dto::{normalize_each, LeaderboardEntryPayload, ListEnvelope, ReferralPayload};

impl ApiClient {
    /// Server-side ranks are ignored and recomputed from points
    pub(super) async fn fetch_leaderboard(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut url = self.endpoint(&["leaderboard"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let envelope: ListEnvelope = self
            .get_json("Get leaderboard", url, session.token())
            .await?;

        let entries = normalize_each::<LeaderboardEntryPayload, LeaderboardEntry>(
            "leaderboard",
            envelope.into_items(),
        );

        Ok(rank_entries(entries))
    }

    pub(super) async fn fetch_referrals(&self, session: &Session) -> Result<ReferralSummary> {
        let url = self.endpoint(&["referrals", "me"])?;
        let payload: ReferralPayload = self
            .get_json("Get referrals", url, session.token())
            .await?;

        Ok(ReferralSummary::try_from(payload)?)
    }
}
