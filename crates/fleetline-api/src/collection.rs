// ── Typed endpoint handles ──
//
// A `Collection<E, D>` is a handle to one CRUD route group
// (`/crm/customers`, `/projects/tasks`, ...). The entity type `E` and the
// draft payload type `D` are supplied by the consumer; this crate never
// inspects them beyond serde bounds, so one implementation serves every
// resource family.

use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::RestClient;
use crate::error::Error;

/// Handle to one entity-collection route group.
///
/// - `GET    /{path}`          — full collection
/// - `POST   /{path}`          — create from a draft, returns the canonical entity
/// - `PUT    /{path}/{id}`     — update from a draft, returns the canonical entity
/// - `DELETE /{path}/{id}`     — remove
/// - `POST   /{path}/{id}/{action}` — workflow action, returns the updated entity
#[derive(Debug)]
pub struct Collection<E, D> {
    client: RestClient,
    path: &'static str,
    _marker: PhantomData<fn() -> (E, D)>,
}

impl<E, D> Clone for Collection<E, D> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            _marker: PhantomData,
        }
    }
}

impl<E, D> Collection<E, D>
where
    E: DeserializeOwned,
    D: Serialize,
{
    pub fn new(client: RestClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Fetch the complete current collection, in server order.
    pub async fn list(&self) -> Result<Vec<E>, Error> {
        self.client.get(self.path).await
    }

    /// Create an entity from a draft. The response carries the server's
    /// canonical representation, including the assigned id.
    pub async fn create(&self, draft: &D) -> Result<E, Error> {
        self.client.post(self.path, draft).await
    }

    /// Replace the entity identified by `id` with the draft's contents.
    pub async fn update(&self, id: &str, draft: &D) -> Result<E, Error> {
        let path = format!("{}/{id}", self.path);
        self.client.put(&path, draft).await
    }

    /// Delete the entity identified by `id`. The backend treats deletes of
    /// unknown ids as successful no-ops.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let path = format!("{}/{id}", self.path);
        self.client
            .request_unit::<()>(Method::DELETE, &path, None)
            .await
    }

    /// Invoke a workflow action (`send`, `read`, ...) on one entity and
    /// return its updated canonical representation.
    pub async fn action(&self, id: &str, action: &str) -> Result<E, Error> {
        let path = format!("{}/{id}/{action}", self.path);
        self.client
            .request::<E, ()>(Method::POST, &path, None)
            .await
    }
}

/// Handle to a GET-only aggregate endpoint (dashboard metrics and the like).
#[derive(Debug)]
pub struct Singleton<T> {
    client: RestClient,
    path: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Singleton<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Singleton<T> {
    pub fn new(client: RestClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub async fn fetch(&self) -> Result<T, Error> {
        self.client.get(self.path).await
    }
}
