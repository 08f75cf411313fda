use log::info;
use std::sync::Arc;

use prestige_domain::account::{Credentials, SignupRequest};
use prestige_domain::session::Session;
use prestige_domain::shared::{Clock, DomainError};
use prestige_domain::RewardsGateway;

use super::refresh_profile;
use crate::application::dtos::ProfileDto;
use crate::application::AppStore;

pub struct AuthService {
    gateway: Arc<dyn RewardsGateway>,
    store: Arc<AppStore>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
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

    pub async fn login(&self, email: &str, password: &str) -> Result<ProfileDto, DomainError> {
        let credentials = Credentials::new(email, password)?;
        let session = self.gateway.login(&credentials).await?;
        Ok(self.start_session(session))
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        referral_code: Option<&str>,
    ) -> Result<ProfileDto, DomainError> {
        let request = SignupRequest::new(username, email, password, referral_code)?;
        let session = self.gateway.signup(&request).await?;
        Ok(self.start_session(session))
    }

    /// Adopt an existing bearer token; the profile is fetched to prove it works
    pub async fn resume(&self, token: &str) -> Result<ProfileDto, DomainError> {
        let probe = Session::from_token(token.trim().to_string())?;
        let user = self.gateway.current_user(&probe).await?;

        let mut session = probe;
        session.replace_user(user);
        Ok(self.start_session(session))
    }

    pub fn logout(&self) {
        if self.store.clear_session() {
            info!("[auth] logged out");
        }
    }

    pub async fn refresh_profile(&self) -> Result<ProfileDto, DomainError> {
        let now = self.clock.now();
        let session = self.store.authenticated_session(now)?;
        refresh_profile(self.gateway.as_ref(), &self.store, &session).await?;

        let session = self.store.authenticated_session(now)?;
        Ok(ProfileDto::from_session(&session, now))
    }

    fn start_session(&self, session: Session) -> ProfileDto {
        let profile = ProfileDto::from_session(&session, self.clock.now());
        info!("[auth] session started for {}", profile.username);
        self.store.set_session(session);
        profile
    }
}
