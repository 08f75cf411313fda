use chrono::{DateTime, Utc};
use tokio::sync::watch;

use prestige_domain::account::UserProfile;
use prestige_domain::daily_reward::LoginStreakState;
use prestige_domain::session::Session;
use prestige_domain::shared::DomainError;

/// Everything the client knows about the signed-in user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: Option<Session>,
    /// Last daily-reward status read from the server
    pub daily_status: Option<LoginStreakState>,
}

/// Explicit, observable holder of the client state.
///
/// Services receive the store instead of reaching for ambient globals;
/// observers get a `watch::Receiver` and are woken only by real changes.
pub struct AppStore {
    tx: watch::Sender<AppState>,
}

impl AppStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AppState::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    /// Current session, or the error an authenticated call should fail with
    pub fn authenticated_session(&self, now: DateTime<Utc>) -> Result<Session, DomainError> {
        let session = self.session().ok_or_else(|| {
            DomainError::Unauthenticated("log in or pass a session token first".to_string())
        })?;
        session.ensure_valid(now)?;
        Ok(session)
    }

    /// Apply `mutate`; subscribers are notified only if the state changed.
    /// Returns whether it did.
    pub fn update<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut AppState),
    {
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            mutate(state);
            *state != before
        })
    }

    pub fn set_session(&self, session: Session) -> bool {
        self.update(|state| {
            state.session = Some(session);
            state.daily_status = None;
        })
    }

    pub fn clear_session(&self) -> bool {
        self.update(|state| *state = AppState::default())
    }

    /// Swap in a fresh profile; ignored when nobody is signed in
    pub fn replace_profile(&self, user: UserProfile) -> bool {
        self.update(|state| {
            if let Some(session) = state.session.as_mut() {
                session.replace_user(user);
            }
        })
    }

    pub fn set_daily_status(&self, status: LoginStreakState) -> bool {
        self.update(|state| state.daily_status = Some(status))
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
