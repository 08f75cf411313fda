use async_trait::async_trait;
use log::warn;
use reqwest::StatusCode;

use prestige_domain::account::{Credentials, SignupRequest, UserProfile};
use prestige_domain::competition::Competition;
use prestige_domain::daily_reward::LoginStreakState;
use prestige_domain::gateway::{ClaimReceipt, EntryReceipt, RewardsGateway};
use prestige_domain::leaderboard::LeaderboardEntry;
use prestige_domain::points::{ConversionOutcome, PointsConversion};
use prestige_domain::referral::ReferralSummary;
use prestige_domain::session::Session;
use prestige_domain::shared::{CompetitionId, DomainError};

use super::ApiClient;
use crate::http::{to_domain_error, ApiError, CallKind};

fn authenticated(err: anyhow::Error) -> DomainError {
    to_domain_error(err, CallKind::Authenticated)
}

/// HTTP status carried by an error chain, if any
fn status_of(err: &anyhow::Error) -> Option<StatusCode> {
    err.downcast_ref::<ApiError>().and_then(ApiError::status)
}

#[async_trait]
impl RewardsGateway for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, DomainError> {
        self.post_login(credentials).await.map_err(|e| {
            warn!("[auth] login failed: {:#}", e);
            to_domain_error(e, CallKind::Credentials)
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session, DomainError> {
        self.post_signup(request).await.map_err(|e| {
            warn!("[auth] signup failed: {:#}", e);
            match status_of(&e) {
                Some(StatusCode::CONFLICT) => DomainError::Conflict(format!(
                    "an account for {} already exists",
                    request.email()
                )),
                _ => to_domain_error(e, CallKind::Credentials),
            }
        })
    }

    async fn current_user(&self, session: &Session) -> Result<UserProfile, DomainError> {
        self.fetch_user(session).await.map_err(authenticated)
    }

    async fn list_competitions(&self, session: &Session) -> Result<Vec<Competition>, DomainError> {
        self.fetch_competitions(session).await.map_err(authenticated)
    }

    async fn get_competition(
        &self,
        session: &Session,
        id: &CompetitionId,
    ) -> Result<Competition, DomainError> {
        self.fetch_competition(session, id)
            .await
            .map_err(|e| match status_of(&e) {
                Some(StatusCode::NOT_FOUND) => {
                    DomainError::CompetitionNotFound(format!("competition {} not found", id))
                }
                _ => authenticated(e),
            })
    }

    async fn enter_competition(
        &self,
        session: &Session,
        id: &CompetitionId,
    ) -> Result<EntryReceipt, DomainError> {
        self.post_entry(session, id).await.map_err(|e| {
            warn!("[competition] entry into {} failed: {:#}", id, e);
            match status_of(&e) {
                Some(StatusCode::NOT_FOUND) => {
                    DomainError::CompetitionNotFound(format!("competition {} not found", id))
                }
                Some(StatusCode::CONFLICT) => {
                    DomainError::AlreadyEntered(format!("already entered competition {}", id))
                }
                _ => authenticated(e),
            }
        })
    }

    async fn daily_reward_status(
        &self,
        session: &Session,
    ) -> Result<LoginStreakState, DomainError> {
        self.fetch_daily_status(session).await.map_err(authenticated)
    }

    async fn claim_daily_reward(&self, session: &Session) -> Result<ClaimReceipt, DomainError> {
        self.post_daily_claim(session).await.map_err(|e| {
            warn!("[reward] claim failed: {:#}", e);
            match status_of(&e) {
                Some(StatusCode::CONFLICT) => {
                    DomainError::AlreadyClaimed("daily reward already claimed today".to_string())
                }
                _ => authenticated(e),
            }
        })
    }

    async fn leaderboard(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, DomainError> {
        self.fetch_leaderboard(session, limit)
            .await
            .map_err(authenticated)
    }

    async fn referral_summary(&self, session: &Session) -> Result<ReferralSummary, DomainError> {
        self.fetch_referrals(session).await.map_err(authenticated)
    }

    async fn convert_points(
        &self,
        session: &Session,
        conversion: PointsConversion,
    ) -> Result<ConversionOutcome, DomainError> {
        self.post_conversion(session, conversion)
            .await
            .map_err(|e| {
                warn!("[points] conversion failed: {:#}", e);
                match status_of(&e) {
                    Some(StatusCode::CONFLICT) | Some(StatusCode::PAYMENT_REQUIRED) => {
                        DomainError::InsufficientPoints(format!(
                            "server refused to convert {} points",
                            conversion.points()
                        ))
                    }
                    _ => authenticated(e),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_server::{reply, TestServer};
    use super::*;
    use crate::config::TimeoutConfig;
    use crate::http::RetryConfig;

    fn session() -> Session {
        let user = UserProfile {
            id: prestige_domain::shared::UserId::from_string("u1"),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            points: 100,
            prestige_tickets: 2,
            referral_code: None,
            is_admin: false,
        };
        Session::new("tok".to_string(), None, user).unwrap()
    }

    async fn gateway(replies: Vec<super::super::test_server::Reply>) -> (TestServer, ApiClient) {
        let server = TestServer::start(replies).await;
        let client = ApiClient::with_settings(
            &server.base_url(),
            &TimeoutConfig::default(),
            RetryConfig::disabled(),
        )
        .unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn test_login_maps_unauthorized_to_invalid_credentials() {
        let (_server, client) = gateway(vec![reply(401, r#"{"message":"Wrong password"}"#)]).await;
        let credentials = Credentials::new("ana@example.com", "hunter22").unwrap();

        let err = client.login(&credentials).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials(m) if m == "Wrong password"));
    }

    #[tokio::test]
    async fn test_login_sends_credentials_and_builds_session() {
        let (server, client) = gateway(vec![reply(
            200,
            r#"{"token":"t-9","user":{"_id":"u1","username":"ana","points":12,"prestigeTickets":1}}"#,
        )])
        .await;
        let credentials = Credentials::new("ana@example.com", "hunter22").unwrap();

        let session = client.login(&credentials).await.unwrap();

        assert_eq!(session.token(), "t-9");
        assert_eq!(session.user().points, 12);
        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /api/auth/login"));
        assert!(requests[0].contains(r#""email":"ana@example.com""#));
    }

    #[tokio::test]
    async fn test_authenticated_unauthorized_is_expired_session() {
        let (_server, client) = gateway(vec![reply(401, r#"{"error":"jwt expired"}"#)]).await;

        let err = client.current_user(&session()).await.unwrap_err();
        assert!(matches!(err, DomainError::ExpiredSession(_)));
    }

    #[tokio::test]
    async fn test_list_skips_malformed_competitions() {
        let (_server, client) = gateway(vec![reply(
            200,
            r#"{"competitions":[
                {"id":"a","title":"A","endsAt":"2030-01-01T00:00:00Z"},
                {"id":"b","title":"B","endsAt":"soon"},
                {"id":"c","title":"C","startsAt":1704067200000,"endsAt":1893456000000}
            ]}"#,
        )])
        .await;

        let competitions = client.list_competitions(&session()).await.unwrap();
        let ids: Vec<&str> = competitions.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_missing_competition() {
        let (_server, client) = gateway(vec![reply(404, "")]).await;

        let err = client
            .get_competition(&session(), &CompetitionId::from_string("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CompetitionNotFound(_)));
    }

    #[tokio::test]
    async fn test_enter_conflict_is_already_entered() {
        let (server, client) = gateway(vec![reply(409, r#"{"message":"duplicate"}"#)]).await;

        let err = client
            .enter_competition(&session(), &CompetitionId::from_string("c1"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AlreadyEntered(_)));
        assert!(server.requests().await[0].starts_with("POST /api/competitions/c1/enter"));
    }

    #[tokio::test]
    async fn test_claim_conflict_is_already_claimed() {
        let (_server, client) = gateway(vec![reply(409, "")]).await;

        let err = client.claim_daily_reward(&session()).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyClaimed(_)));
    }

    #[tokio::test]
    async fn test_leaderboard_sends_limit_and_reranks() {
        let (server, client) = gateway(vec![reply(
            200,
            r#"[
                {"userId":"1","username":"a","points":50,"rank":9},
                {"userId":"2","username":"b","points":80},
                {"userId":"3","username":"c","points":80},
                {"userId":"4","username":"d","points":10}
            ]"#,
        )])
        .await;

        let entries = client.leaderboard(&session(), 4).await.unwrap();

        let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);
        assert!(server.requests().await[0].starts_with("GET /api/leaderboard?limit=4"));
    }

    #[tokio::test]
    async fn test_server_error_is_external_service() {
        let (_server, client) = gateway(vec![reply(502, "<html>bad gateway</html>")]).await;

        let err = client.daily_reward_status(&session()).await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
        assert!(err.is_recoverable());
    }
}
