// ── Collaborator seam ──
//
// The store layer never talks HTTP directly: every slice holds a trait
// object describing the four collection operations (plus workflow
// actions) it needs. Production wires in `fleetline-api` handles through
// the blanket impls below; tests inject hand-rolled mocks.
//
// Boxed futures keep the traits dyn-compatible.

use chrono::Utc;
use futures_util::future::BoxFuture;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;

use fleetline_api::{Collection, RestClient, Singleton};

use crate::error::StoreError;
use crate::model::{EntityId, Session, UserProfile};

/// CRUD contract one resource slice consumes.
///
/// `create`/`update`/`action` responses carry the full canonical entity
/// (server-assigned id included); the slice reconciles them verbatim and
/// never merges partial responses.
pub trait ResourceApi<E, D>: Send + Sync {
    fn list(&self) -> BoxFuture<'_, Result<Vec<E>, StoreError>>;

    fn create<'a>(&'a self, draft: &'a D) -> BoxFuture<'a, Result<E, StoreError>>;

    fn update<'a>(
        &'a self,
        id: &'a EntityId,
        draft: &'a D,
    ) -> BoxFuture<'a, Result<E, StoreError>>;

    fn delete<'a>(&'a self, id: &'a EntityId) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Workflow action (`send`, `read`, ...) returning the updated entity.
    fn action<'a>(
        &'a self,
        id: &'a EntityId,
        action: &'a str,
    ) -> BoxFuture<'a, Result<E, StoreError>>;
}

impl<E, D> ResourceApi<E, D> for Collection<E, D>
where
    E: DeserializeOwned + Send + Sync + 'static,
    D: Serialize + Send + Sync + 'static,
{
    fn list(&self) -> BoxFuture<'_, Result<Vec<E>, StoreError>> {
        Box::pin(async move { Collection::list(self).await.map_err(StoreError::from) })
    }

    fn create<'a>(&'a self, draft: &'a D) -> BoxFuture<'a, Result<E, StoreError>> {
        Box::pin(async move { Collection::create(self, draft).await.map_err(StoreError::from) })
    }

    fn update<'a>(
        &'a self,
        id: &'a EntityId,
        draft: &'a D,
    ) -> BoxFuture<'a, Result<E, StoreError>> {
        Box::pin(async move {
            Collection::update(self, &id.to_string(), draft)
                .await
                .map_err(StoreError::from)
        })
    }

    fn delete<'a>(&'a self, id: &'a EntityId) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            Collection::delete(self, &id.to_string())
                .await
                .map_err(StoreError::from)
        })
    }

    fn action<'a>(
        &'a self,
        id: &'a EntityId,
        action: &'a str,
    ) -> BoxFuture<'a, Result<E, StoreError>> {
        Box::pin(async move {
            Collection::action(self, &id.to_string(), action)
                .await
                .map_err(StoreError::from)
        })
    }
}

/// Read contract for singleton aggregates (dashboard metrics).
pub trait SnapshotApi<T>: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<T, StoreError>>;
}

impl<T> SnapshotApi<T> for Singleton<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn fetch(&self) -> BoxFuture<'_, Result<T, StoreError>> {
        Box::pin(async move { Singleton::fetch(self).await.map_err(StoreError::from) })
    }
}

/// Authentication contract the auth slice consumes.
pub trait AuthApi: Send + Sync {
    fn login<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
    ) -> BoxFuture<'a, Result<Session, StoreError>>;

    /// Re-install a previously persisted session's token. Synchronous.
    fn resume(&self, session: &Session);

    /// Drop client-side credentials. Synchronous, never fails.
    fn invalidate(&self);
}

impl AuthApi for RestClient {
    fn login<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
    ) -> BoxFuture<'a, Result<Session, StoreError>> {
        Box::pin(async move {
            let auth = RestClient::login::<UserProfile>(self, email, password).await?;
            Ok(Session {
                token: auth.token,
                user: auth.user,
                issued_at: Utc::now(),
            })
        })
    }

    fn resume(&self, session: &Session) {
        self.set_token(session.token.clone());
    }

    fn invalidate(&self) {
        self.clear_token();
    }
}
