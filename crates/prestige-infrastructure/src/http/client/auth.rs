use anyhow::Result;
use log::info;

use prestige_domain::account::{Credentials, SignupRequest, UserProfile};
use prestige_domain::session::Session;

use super::ApiClient;
use crate::http::dto::{AuthPayload, LoginBody, SignupBody, UserEnvelope};

impl ApiClient {
    pub(super) async fn post_login(&self, credentials: &Credentials) -> Result<Session> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = LoginBody {
            email: credentials.email(),
            password: credentials.password(),
        };

        let payload: AuthPayload = self.post_json("Login", url, None, &body).await?;
        let session = Session::try_from(payload)?;

        info!("[auth] logged in as {}", session.user().username);
        Ok(session)
    }

    pub(super) async fn post_signup(&self, request: &SignupRequest) -> Result<Session> {
        let url = self.endpoint(&["auth", "signup"])?;
        let body = SignupBody {
            username: request.username(),
            email: request.email(),
            password: request.password(),
            referral_code: request.referral_code(),
        };

        let payload: AuthPayload = self.post_json("Signup", url, None, &body).await?;
        let session = Session::try_from(payload)?;

        info!("[auth] signed up {}", session.user().username);
        Ok(session)
    }

    pub(super) async fn fetch_user(&self, session: &Session) -> Result<UserProfile> {
        let url = self.endpoint(&["users", "me"])?;
        let envelope: UserEnvelope = self
            .get_json("Get current user", url, session.token())
            .await?;

        Ok(UserProfile::try_from(envelope.into_payload())?)
    }
}
