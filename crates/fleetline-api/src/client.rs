// ── REST client core ──
//
// Owns the HTTP client, base URL, and bearer token. Every endpoint handle
// (Collection, Singleton) routes its requests through here so envelope
// decoding and error mapping happen in exactly one place.
//
// The backend wraps every response in `{ success, data, message }`.
// Non-2xx statuses and `success: false` envelopes both surface as
// `Error::Api`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Standard response envelope used by every backend route group.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Successful login payload: bearer token plus the caller-typed profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession<U> {
    pub token: String,
    pub user: U,
}

/// Handle to the Fleetline backend.
///
/// Cheaply cloneable via `Arc` — all clones share one connection pool and
/// one bearer-token cell, so a login through any clone authenticates all
/// of them.
#[derive(Debug, Clone)]
pub struct RestClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base: Url,
    timeout_secs: u64,
    token: ArcSwapOption<String>,
}

impl RestClient {
    /// Create a client rooted at `base` (e.g. `https://api.example.com/api`).
    pub fn new(base: impl AsRef<str>, transport: &TransportConfig) -> Result<Self, Error> {
        let mut base = Url::parse(base.as_ref())?;
        // Paths are joined relative to the base; without a trailing slash
        // `Url::join` would drop the final segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                http: transport.build_client()?,
                base,
                timeout_secs: transport.timeout.as_secs(),
                token: ArcSwapOption::empty(),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install a bearer token used for all subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        self.inner.token.store(Some(Arc::new(token.into())));
    }

    /// Drop the bearer token. Subsequent requests go out unauthenticated.
    pub fn clear_token(&self) {
        self.inner.token.store(None);
    }

    pub fn has_token(&self) -> bool {
        self.inner.token.load().is_some()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// `POST /auth/login`. On success the returned token is installed on
    /// this client so every endpoint handle is immediately authenticated.
    pub async fn login<U: DeserializeOwned>(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession<U>, Error> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            email: &'a str,
            password: &'a str,
        }

        let body = LoginBody {
            email,
            password: password.expose_secret(),
        };
        let session: AuthSession<U> = self.post("auth/login", &body).await?;
        self.set_token(session.token.clone());
        debug!(email, "authenticated");
        Ok(session)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.inner.base.join(path)?)
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, String), Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut req = self.inner.http.request(method.clone(), url);
        if let Some(token) = self.inner.token.load_full() {
            req = req.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(%method, path, "request");
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.inner.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        Ok((status, text))
    }

    fn fail(status: StatusCode, body: &str) -> Error {
        let (message, code) = envelope_failure(body);
        if status == StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: message.unwrap_or_else(|| "invalid or expired credentials".into()),
            };
        }
        warn!(status = status.as_u16(), ?code, "backend rejected request");
        Error::Api {
            message: message.unwrap_or_else(|| status.to_string()),
            code,
            status: status.as_u16(),
        }
    }

    /// Send a request and decode the envelope's `data` field.
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (status, text) = self.dispatch(method, path, body).await?;
        if !status.is_success() {
            return Err(Self::fail(status, &text));
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: text.clone(),
            })?;
        if !envelope.success {
            return Err(Error::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request failed".into()),
                code: envelope.code,
                status: status.as_u16(),
            });
        }
        envelope.data.ok_or_else(|| Error::Deserialization {
            message: "envelope missing `data`".into(),
            body: text,
        })
    }

    /// Send a request where no `data` payload is expected (deletes).
    /// Accepts `204 No Content` and empty bodies.
    pub(crate) async fn request_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), Error>
    where
        B: Serialize + ?Sized,
    {
        let (status, text) = self.dispatch(method, path, body).await?;
        if !status.is_success() {
            return Err(Self::fail(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: text,
            })?;
        if envelope.success {
            Ok(())
        } else {
            Err(Error::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request failed".into()),
                code: envelope.code,
                status: status.as_u16(),
            })
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }
}

/// Pull `message`/`code` out of an error-envelope body, if it parses.
fn envelope_failure(body: &str) -> (Option<String>, Option<String>) {
    match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(env) => (env.message, env.code),
        Err(_) => (None, None),
    }
}
