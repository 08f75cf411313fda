use chrono::{Duration, Utc};

use prestige_domain::account::UserProfile;
use prestige_domain::daily_reward::LoginStreakState;
use prestige_domain::session::Session;
use prestige_domain::shared::{DomainError, UserId};

use super::store::{AppState, AppStore};

fn profile(points: u64) -> UserProfile {
    UserProfile {
        id: UserId::from_string("u-1"),
        username: "ana".to_string(),
        email: "ana@example.com".to_string(),
        points,
        prestige_tickets: 1,
        referral_code: None,
        is_admin: false,
    }
}

fn session(points: u64) -> Session {
    Session::new("tok".to_string(), None, profile(points)).unwrap()
}

#[test]
fn test_starts_signed_out() {
    let store = AppStore::new();
    assert_eq!(store.snapshot(), AppState::default());
    assert!(matches!(
        store.authenticated_session(Utc::now()),
        Err(DomainError::Unauthenticated(_))
    ));
}

#[test]
fn test_expired_session_is_refused() {
    let store = AppStore::new();
    let now = Utc::now();
    let expired =
        Session::new("tok".to_string(), Some(now - Duration::minutes(1)), profile(0)).unwrap();
    store.set_session(expired);

    assert!(matches!(
        store.authenticated_session(now),
        Err(DomainError::ExpiredSession(_))
    ));
}

#[tokio::test]
async fn test_subscribers_see_only_real_changes() {
    let store = AppStore::new();
    let mut rx = store.subscribe();

    assert!(store.set_session(session(10)));
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    // Same profile again: no notification
    assert!(!store.replace_profile(profile(10)));
    assert!(!rx.has_changed().unwrap());

    assert!(store.replace_profile(profile(25)));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().session.as_ref().unwrap().user().points, 25);
}

#[test]
fn test_replace_profile_without_session_is_noop() {
    let store = AppStore::new();
    assert!(!store.replace_profile(profile(5)));
    assert!(store.session().is_none());
}

#[test]
fn test_clear_session_drops_cached_status() {
    let store = AppStore::new();
    store.set_session(session(1));
    store.set_daily_status(LoginStreakState::new(3, None, true));

    assert!(store.clear_session());
    assert_eq!(store.snapshot(), AppState::default());
    assert!(!store.clear_session());
}
