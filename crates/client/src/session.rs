//! Durable auth session state.
//!
//! Single source of truth for "is a merchant logged in". The token pair
//! and user record are persisted under the `token`, `refreshToken`, and
//! `user` keys and restored on startup; a corrupt stored user purges all
//! three keys rather than producing a half-authenticated session.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{instrument, warn};

use crate::models::User;
use crate::services::AuthService;
use crate::storage::{KeyValueStore, keys};

/// An authenticated session: token pair plus the user record.
///
/// Invariant: a session exists if and only if both a token and a user are
/// present - there is no reachable state with one but not the other.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Holds the authenticated identity, durable across restarts.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<Option<AuthSession>>,
}

impl SessionStore {
    /// Create a logged-out session store. Call [`Self::restore`] to adopt
    /// a persisted session.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            state: Mutex::new(None),
        }
    }

    /// Bootstrap from storage: adopt the persisted session when both the
    /// token and a parseable user record are present.
    ///
    /// A user record that fails to parse is treated as corruption - every
    /// auth key is purged and the store stays logged out. Returns whether
    /// a session was adopted.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> bool {
        let token = self.read_key(keys::TOKEN).await;
        let user_raw = self.read_key(keys::USER).await;

        let (Some(token), Some(user_raw)) = (token, user_raw) else {
            return false;
        };

        match serde_json::from_str::<User>(&user_raw) {
            Ok(user) => {
                let refresh_token = self.read_key(keys::REFRESH_TOKEN).await;
                *self.state.lock().await = Some(AuthSession {
                    token,
                    refresh_token,
                    user,
                });
                true
            }
            Err(e) => {
                warn!("purging corrupt persisted session: {e}");
                self.purge_keys().await;
                false
            }
        }
    }

    /// Establish a session: persist the token (always), the refresh token
    /// (only when provided), and the user record, then update memory.
    ///
    /// Persistence failures are logged; the in-memory session is
    /// authoritative either way.
    #[instrument(skip_all)]
    pub async fn login(&self, token: String, refresh_token: Option<String>, user: User) {
        self.write_key(keys::TOKEN, &token).await;

        if let Some(refresh) = refresh_token.as_deref() {
            self.write_key(keys::REFRESH_TOKEN, refresh).await;
        }

        match serde_json::to_string(&user) {
            Ok(raw) => self.write_key(keys::USER, &raw).await,
            Err(e) => warn!("failed to serialize user record: {e}"),
        }

        *self.state.lock().await = Some(AuthSession {
            token,
            refresh_token,
            user,
        });
    }

    /// End the session.
    ///
    /// The remote logout call is best-effort: its failure is logged and
    /// local cleanup - purging the persisted keys and resetting memory -
    /// proceeds regardless.
    #[instrument(skip_all)]
    pub async fn logout(&self, auth: &AuthService) {
        if let Err(e) = auth.logout().await {
            warn!("remote logout failed, clearing local session anyway: {e}");
        }

        self.purge_keys().await;
        *self.state.lock().await = None;
    }

    /// Whether a session is established.
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// The authenticated user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.state.lock().await.as_ref().map(|s| s.user.clone())
    }

    /// The session token, if any.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.as_ref().map(|s| s.token.clone())
    }

    // =========================================================================
    // Remember-me
    // =========================================================================

    /// Remember a login email for pre-filling the form.
    pub async fn remember_email(&self, email: &str) {
        self.write_key(keys::REMEMBER_ME, "true").await;
        self.write_key(keys::REMEMBERED_EMAIL, email).await;
    }

    /// The remembered login email, when the opt-in flag is set.
    pub async fn remembered_email(&self) -> Option<String> {
        match self.read_key(keys::REMEMBER_ME).await.as_deref() {
            Some("true") => self.read_key(keys::REMEMBERED_EMAIL).await,
            _ => None,
        }
    }

    /// Drop the remembered email and the opt-in flag.
    pub async fn forget_email(&self) {
        self.remove_key(keys::REMEMBER_ME).await;
        self.remove_key(keys::REMEMBERED_EMAIL).await;
    }

    // =========================================================================
    // Storage helpers (failures logged, never raised)
    // =========================================================================

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("failed to read {key} from storage: {e}");
                None
            }
        }
    }

    async fn write_key(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value).await {
            warn!("failed to persist {key}: {e}");
        }
    }

    async fn remove_key(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            warn!("failed to remove {key}: {e}");
        }
    }

    async fn purge_keys(&self) {
        self.remove_key(keys::TOKEN).await;
        self.remove_key(keys::REFRESH_TOKEN).await;
        self.remove_key(keys::USER).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use vitrine_core::UserId;

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Maria".to_owned(),
            email: "maria@example.com".to_owned(),
            tax_id: "52998224725".to_owned(),
            store: None,
        }
    }

    fn store_pair() -> (Arc<dyn KeyValueStore>, SessionStore) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&storage));
        (storage, session)
    }

    #[tokio::test]
    async fn test_login_persists_and_authenticates() {
        let (storage, session) = store_pair();

        session
            .login("tok".to_owned(), Some("ref".to_owned()), user())
            .await;

        assert!(session.is_authenticated().await);
        assert_eq!(session.token().await.as_deref(), Some("tok"));
        assert_eq!(storage.get("token").await.unwrap().as_deref(), Some("tok"));
        assert_eq!(
            storage.get("refreshToken").await.unwrap().as_deref(),
            Some("ref")
        );
        assert!(storage.get("user").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_without_refresh_token_writes_no_refresh_key() {
        let (storage, session) = store_pair();

        session.login("tok".to_owned(), None, user()).await;

        assert!(storage.get("refreshToken").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_adopts_persisted_session() {
        let (storage, session) = store_pair();
        session
            .login("tok".to_owned(), None, user())
            .await;

        // Simulate a restart: fresh store over the same storage
        let reloaded = SessionStore::new(Arc::clone(&storage));
        assert!(!reloaded.is_authenticated().await);

        assert!(reloaded.restore().await);
        assert!(reloaded.is_authenticated().await);
        assert_eq!(
            reloaded.current_user().await.unwrap().email,
            "maria@example.com"
        );
    }

    #[tokio::test]
    async fn test_restore_with_missing_user_stays_logged_out() {
        let (storage, _) = store_pair();
        storage.set("token", "tok").await.unwrap();

        let session = SessionStore::new(Arc::clone(&storage));
        assert!(!session.restore().await);
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_restore_purges_corrupt_user() {
        let (storage, _) = store_pair();
        storage.set("token", "tok").await.unwrap();
        storage.set("refreshToken", "ref").await.unwrap();
        storage.set("user", "{definitely not json").await.unwrap();

        let session = SessionStore::new(Arc::clone(&storage));
        assert!(!session.restore().await);
        assert!(!session.is_authenticated().await);

        // Corrupt keys are purged, not left to fail again next boot
        assert!(storage.get("token").await.unwrap().is_none());
        assert!(storage.get("refreshToken").await.unwrap().is_none());
        assert!(storage.get("user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remember_me_roundtrip() {
        let (_, session) = store_pair();

        assert_eq!(session.remembered_email().await, None);

        session.remember_email("maria@example.com").await;
        assert_eq!(
            session.remembered_email().await.as_deref(),
            Some("maria@example.com")
        );

        session.forget_email().await;
        assert_eq!(session.remembered_email().await, None);
    }
}
