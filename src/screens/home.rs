use crate::auth::AuthUser;
use crate::profile::{save_user_profile, UserProfile};

use super::ScreenContext;

/// Greeting name when the user has no recorded first name
const GREETING_FALLBACK: &str = "friend";

/// Landing screen controller.
pub struct HomeScreen;

impl HomeScreen {
    /// Opportunistic profile sync for the signed-in user.
    ///
    /// Runs on every visit with a user present. The upsert is write-once and
    /// swallows its own failures, so calling this repeatedly is harmless; it
    /// exists to catch users whose profile write was missed during sign-up.
    pub async fn on_user_available(ctx: &ScreenContext, user: &AuthUser) {
        save_user_profile(ctx.profiles.as_ref(), &UserProfile::from_user(user)).await;
    }

    pub fn greeting(user: Option<&AuthUser>) -> String {
        let name = user
            .and_then(|u| u.first_name.as_deref())
            .unwrap_or(GREETING_FALLBACK);
        format!("Welcome back, {}!", name)
    }

    /// Sign out. The session manager handles revocation and cleanup; the
    /// session gate takes care of getting the user back to sign-in.
    pub async fn sign_out(ctx: &ScreenContext) {
        ctx.sessions.sign_out().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::router::Router;
    use crate::nav::{Route, SessionGate};
    use crate::screens::testing::harness;

    fn user(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            email_address: Some("ada@example.com".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
        }
    }

    #[tokio::test]
    async fn test_repeat_visits_write_the_profile_once() {
        let h = harness(Route::Home);
        let user = user("user_1");

        HomeScreen::on_user_available(&h.ctx, &user).await;
        HomeScreen::on_user_available(&h.ctx, &user).await;
        HomeScreen::on_user_available(&h.ctx, &user).await;

        assert_eq!(h.profiles.creates(), 1);
        assert_eq!(h.profiles.fetches(), 3);
    }

    #[tokio::test]
    async fn test_profile_carries_the_user_fields() {
        let h = harness(Route::Home);
        HomeScreen::on_user_available(&h.ctx, &user("user_1")).await;

        let records = h.profiles.records.lock().unwrap();
        let record = records.get("user_1").unwrap();
        assert_eq!(record.email.as_deref(), Some("ada@example.com"));
        assert_eq!(record.first_name.as_deref(), Some("Ada"));
        assert_eq!(record.last_name.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn test_greeting_prefers_first_name() {
        assert_eq!(HomeScreen::greeting(Some(&user("u"))), "Welcome back, Ada!");
        assert_eq!(HomeScreen::greeting(None), "Welcome back, friend!");
    }

    #[tokio::test]
    async fn test_sign_out_hands_control_to_the_gate() {
        let h = harness(Route::Home);
        h.provider.add_activation("sess_1", "tok_123", user("user_1"));
        h.sessions.initialize().await;
        h.sessions.activate("sess_1").await.unwrap();

        HomeScreen::sign_out(&h.ctx).await;
        assert!(!h.sessions.snapshot().is_signed_in);

        let gate = SessionGate::new(h.router.clone());
        assert!(gate.evaluate(&h.sessions.snapshot()).is_some());
        assert!(h.router.current().is_route(Route::SignIn));
        assert_eq!(h.router.replaces(), 1);
    }
}
