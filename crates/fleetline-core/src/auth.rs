// ── Authentication slice ──
//
// Holds the signed-in user and mirrors the loading/error contract of the
// resource slices. Unlike those, `login` also returns its outcome: the
// caller is on a login form and wants to branch immediately, not poll the
// error slot.
//
// Persistence goes through the `SessionStore` seam so the store layer
// never touches the filesystem itself.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::model::{Session, UserProfile};
use crate::store::api::AuthApi;

/// Durable storage for the authenticated session.
///
/// Implementations are synchronous; the config crate provides a
/// file-backed one.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StoreError>;

    fn save(&self, session: &Session) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// Sign-in state: current user, in-flight flag, last failure.
pub struct AuthSlice {
    api: Arc<dyn AuthApi>,
    sessions: Arc<dyn SessionStore>,
    user: watch::Sender<Option<Arc<UserProfile>>>,
    is_loading: watch::Sender<bool>,
    error: watch::Sender<Option<StoreError>>,
}

impl AuthSlice {
    pub fn new(api: Arc<dyn AuthApi>, sessions: Arc<dyn SessionStore>) -> Self {
        let (user, _) = watch::channel(None);
        let (is_loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);

        Self {
            api,
            sessions,
            user,
            is_loading,
            error,
        }
    }

    /// Exchange credentials for a session. On success the bearer token is
    /// installed on the shared client, the session is persisted, and the
    /// user becomes visible to subscribers.
    ///
    /// The outcome is both recorded in the error slot and returned.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), StoreError> {
        self.error.send_replace(None);
        self.is_loading.send_replace(true);

        let outcome = self.api.login(email, password).await;
        let result = match outcome {
            Ok(session) => {
                info!(user = %session.user.email, "signed in");
                if let Err(err) = self.sessions.save(&session) {
                    // Login still stands; only resume-on-restart is lost.
                    warn!(error = %err, "failed to persist session");
                }
                self.user.send_replace(Some(Arc::new(session.user)));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.error.send_replace(Some(err.clone()));
                Err(err)
            }
        };

        self.is_loading.send_replace(false);
        result
    }

    /// Drop the session locally. Never fails: credential material is gone
    /// from memory even if the persisted copy cannot be removed.
    pub fn logout(&self) {
        debug!("signing out");
        self.user.send_replace(None);
        self.error.send_replace(None);
        self.api.invalidate();
        if let Err(err) = self.sessions.clear() {
            warn!(error = %err, "failed to clear persisted session");
        }
    }

    /// Resume a previously persisted session, if one exists. Returns
    /// whether a session was restored. The token is re-installed without
    /// a round trip; the backend will reject it on first use if expired.
    pub fn restore(&self) -> Result<bool, StoreError> {
        match self.sessions.load()? {
            Some(session) => {
                info!(user = %session.user.email, "restored session");
                self.api.resume(&session);
                self.user.send_replace(Some(Arc::new(session.user)));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn current_user(&self) -> Option<Arc<UserProfile>> {
        self.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn is_loading(&self) -> bool {
        *self.is_loading.borrow()
    }

    pub fn error(&self) -> Option<StoreError> {
        self.error.borrow().clone()
    }

    pub fn watch_user(&self) -> watch::Receiver<Option<Arc<UserProfile>>> {
        self.user.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use futures_util::future::BoxFuture;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{EntityId, Role};

    fn profile(email: &str) -> UserProfile {
        UserProfile {
            id: EntityId::from("u1"),
            email: email.into(),
            first_name: "Dana".into(),
            last_name: "Ruiz".into(),
            role: Role::Manager,
            department: None,
            permissions: vec![],
        }
    }

    fn session(email: &str) -> Session {
        Session {
            token: "tok-abc".into(),
            user: profile(email),
            issued_at: Utc::now(),
        }
    }

    struct FakeAuth {
        outcome: Mutex<Option<Result<Session, StoreError>>>,
        resumed: Mutex<Option<String>>,
        invalidated: Mutex<bool>,
    }

    impl FakeAuth {
        fn with(outcome: Result<Session, StoreError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                resumed: Mutex::new(None),
                invalidated: Mutex::new(false),
            }
        }
    }

    impl AuthApi for FakeAuth {
        fn login<'a>(
            &'a self,
            _email: &'a str,
            _password: &'a SecretString,
        ) -> BoxFuture<'a, Result<Session, StoreError>> {
            Box::pin(async move {
                self.outcome
                    .lock()
                    .unwrap()
                    .take()
                    .expect("unscripted login")
            })
        }

        fn resume(&self, session: &Session) {
            *self.resumed.lock().unwrap() = Some(session.token.clone());
        }

        fn invalidate(&self) {
            *self.invalidated.lock().unwrap() = true;
        }
    }

    #[derive(Default)]
    struct MemorySessions {
        stored: Mutex<Option<Session>>,
    }

    impl SessionStore for MemorySessions {
        fn load(&self) -> Result<Option<Session>, StoreError> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn save(&self, session: &Session) -> Result<(), StoreError> {
            *self.stored.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    #[tokio::test]
    async fn successful_login_sets_user_and_persists() {
        let api = Arc::new(FakeAuth::with(Ok(session("dana@fleetline.io"))));
        let sessions = Arc::new(MemorySessions::default());
        let auth = AuthSlice::new(api, Arc::clone(&sessions) as Arc<dyn SessionStore>);

        auth.login("dana@fleetline.io", &SecretString::from("hunter2"))
            .await
            .unwrap();

        assert!(auth.is_authenticated());
        assert_eq!(
            auth.current_user().unwrap().email,
            "dana@fleetline.io".to_owned()
        );
        assert!(sessions.stored.lock().unwrap().is_some());
        assert!(!auth.is_loading());
    }

    #[tokio::test]
    async fn failed_login_records_and_returns_the_error() {
        let denied = StoreError::AuthenticationFailed {
            message: "bad credentials".into(),
        };
        let api = Arc::new(FakeAuth::with(Err(denied.clone())));
        let auth = AuthSlice::new(api, Arc::new(MemorySessions::default()));

        let result = auth
            .login("dana@fleetline.io", &SecretString::from("wrong"))
            .await;

        assert_eq!(result, Err(denied.clone()));
        assert_eq!(auth.error(), Some(denied));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_user_token_and_persisted_session() {
        let api = Arc::new(FakeAuth::with(Ok(session("dana@fleetline.io"))));
        let sessions = Arc::new(MemorySessions::default());
        let auth = AuthSlice::new(
            Arc::clone(&api) as Arc<dyn AuthApi>,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
        );

        auth.login("dana@fleetline.io", &SecretString::from("hunter2"))
            .await
            .unwrap();
        auth.logout();

        assert!(!auth.is_authenticated());
        assert!(*api.invalidated.lock().unwrap());
        assert!(sessions.stored.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_resumes_a_persisted_session() {
        let api = Arc::new(FakeAuth::with(Err(StoreError::OperationFailed {
            message: "login not expected".into(),
        })));
        let sessions = Arc::new(MemorySessions::default());
        sessions.save(&session("dana@fleetline.io")).unwrap();
        let auth = AuthSlice::new(
            Arc::clone(&api) as Arc<dyn AuthApi>,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
        );

        assert!(auth.restore().unwrap());
        assert!(auth.is_authenticated());
        assert_eq!(api.resumed.lock().unwrap().as_deref(), Some("tok-abc"));
    }

    #[tokio::test]
    async fn restore_without_persisted_session_is_a_clean_miss() {
        let api = Arc::new(FakeAuth::with(Err(StoreError::OperationFailed {
            message: "login not expected".into(),
        })));
        let auth = AuthSlice::new(api, Arc::new(MemorySessions::default()));

        assert!(!auth.restore().unwrap());
        assert!(!auth.is_authenticated());
    }
}
