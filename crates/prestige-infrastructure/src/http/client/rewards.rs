use anyhow::Result;
use log::info;

use prestige_domain::daily_reward::LoginStreakState;
use prestige_domain::gateway::ClaimReceipt;
use prestige_domain::points::{ConversionOutcome, PointsConversion};
use prestige_domain::session::Session;

use super::ApiClient;
use crate::http::dto::{ClaimPayload, ConversionPayload, ConvertBody, DailyStatusPayload};

impl ApiClient {
    pub(super) async fn fetch_daily_status(&self, session: &Session) -> Result<LoginStreakState> {
        let url = self.endpoint(&["rewards", "daily"])?;
        let payload: DailyStatusPayload = self
            .get_json("Get daily reward", url, session.token())
            .await?;

        Ok(LoginStreakState::from(payload))
    }

    pub(super) async fn post_daily_claim(&self, session: &Session) -> Result<ClaimReceipt> {
        let url = self.endpoint(&["rewards", "daily", "claim"])?;
        let payload: ClaimPayload = self
            .post_json(
                "Claim daily reward",
                url,
                Some(session.token()),
                &serde_json::json!({}),
            )
            .await?;

        let receipt = ClaimReceipt::try_from(payload)?;
        info!(
            "[reward] claimed daily reward: +{} points, +{} tickets",
            receipt.points_awarded, receipt.tickets_awarded
        );
        Ok(receipt)
    }

    pub(super) async fn post_conversion(
        &self,
        session: &Session,
        conversion: PointsConversion,
    ) -> Result<ConversionOutcome> {
        let url = self.endpoint(&["points", "convert"])?;
        let body = ConvertBody {
            points: conversion.points(),
        };

        let payload: ConversionPayload = self
            .post_json("Convert points", url, Some(session.token()), &body)
            .await?;

        let outcome = ConversionOutcome::from(payload);
        info!(
            "[points] converted {} points, balance now {} points / {} tickets",
            conversion.points(),
            outcome.points,
            outcome.prestige_tickets
        );
        Ok(outcome)
    }
}
