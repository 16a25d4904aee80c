// Cross-slice behavior of the hub: loading aggregation, the error walk
// order, and the message workflow. Individual slice reconciliation is
// covered next to the slice itself.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use tokio::sync::oneshot;

use fleetline_core::model::{
    EntityId, Message, MessageStatus, Session,
};
use fleetline_core::store::api::{AuthApi, ResourceApi, SnapshotApi};
use fleetline_core::{Hub, HubParts, SessionStore, StoreError};

// ── Scripted collaborators ───────────────────────────────────────────

/// Generic stub for one resource family. Unscripted calls fall back to
/// benign defaults so tests only script the slices they exercise.
struct StubApi<E, D> {
    list: Mutex<VecDeque<Result<Vec<E>, StoreError>>>,
    action: Mutex<VecDeque<Result<E, StoreError>>>,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    _marker: PhantomData<fn() -> D>,
}

impl<E, D> Default for StubApi<E, D> {
    fn default() -> Self {
        Self {
            list: Mutex::new(VecDeque::new()),
            action: Mutex::new(VecDeque::new()),
            list_gate: Mutex::new(None),
            _marker: PhantomData,
        }
    }
}

impl<E, D> StubApi<E, D> {
    fn script_list(&self, result: Result<Vec<E>, StoreError>) {
        self.list.lock().unwrap().push_back(result);
    }

    fn gate_list(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.list_gate.lock().unwrap() = Some(gate);
        release
    }
}

impl<E, D> ResourceApi<E, D> for StubApi<E, D>
where
    E: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    fn list(&self) -> BoxFuture<'_, Result<Vec<E>, StoreError>> {
        Box::pin(async move {
            let gate = self.list_gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.list
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    fn create<'a>(&'a self, _draft: &'a D) -> BoxFuture<'a, Result<E, StoreError>> {
        Box::pin(async move { Err(unscripted()) })
    }

    fn update<'a>(
        &'a self,
        _id: &'a EntityId,
        _draft: &'a D,
    ) -> BoxFuture<'a, Result<E, StoreError>> {
        Box::pin(async move { Err(unscripted()) })
    }

    fn delete<'a>(&'a self, _id: &'a EntityId) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move { Ok(()) })
    }

    fn action<'a>(
        &'a self,
        _id: &'a EntityId,
        _action: &'a str,
    ) -> BoxFuture<'a, Result<E, StoreError>> {
        Box::pin(async move {
            self.action
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        })
    }
}

fn unscripted() -> StoreError {
    StoreError::OperationFailed {
        message: "unscripted call".into(),
    }
}

struct StubMetrics;

impl<T: Send + Sync + 'static> SnapshotApi<T> for StubMetrics {
    fn fetch(&self) -> BoxFuture<'_, Result<T, StoreError>> {
        Box::pin(async move { Err(unscripted()) })
    }
}

struct DeniedAuth;

impl AuthApi for DeniedAuth {
    fn login<'a>(
        &'a self,
        _email: &'a str,
        _password: &'a SecretString,
    ) -> BoxFuture<'a, Result<Session, StoreError>> {
        Box::pin(async move {
            Err(StoreError::AuthenticationFailed {
                message: "bad credentials".into(),
            })
        })
    }

    fn resume(&self, _session: &Session) {}

    fn invalidate(&self) {}
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

/// A hub wired entirely to stubs, with handles kept to the ones the hub
/// tests script.
struct Rig {
    hub: Arc<Hub>,
    deals: Arc<StubApi<fleetline_core::model::Deal, fleetline_core::model::DealDraft>>,
    tasks: Arc<StubApi<fleetline_core::model::Task, fleetline_core::model::TaskDraft>>,
    messages: Arc<StubApi<Message, fleetline_core::model::MessageDraft>>,
}

fn rig() -> Rig {
    let deals = Arc::new(StubApi::default());
    let tasks = Arc::new(StubApi::default());
    let messages = Arc::new(StubApi::default());

    let hub = Hub::from_parts(HubParts {
        auth: Arc::new(DeniedAuth),
        sessions: Arc::new(MemorySessions::default()),
        customers: Arc::new(StubApi::default()),
        deals: Arc::clone(&deals) as Arc<dyn ResourceApi<_, _>>,
        leads: Arc::new(StubApi::default()),
        partners: Arc::new(StubApi::default()),
        partner_orders: Arc::new(StubApi::default()),
        campaigns: Arc::new(StubApi::default()),
        projects: Arc::new(StubApi::default()),
        tasks: Arc::clone(&tasks) as Arc<dyn ResourceApi<_, _>>,
        messages: Arc::clone(&messages) as Arc<dyn ResourceApi<_, _>>,
        reports: Arc::new(StubApi::default()),
        metrics: Arc::new(StubMetrics),
    });

    Rig {
        hub: Arc::new(hub),
        deals,
        tasks,
        messages,
    }
}

fn down(what: &str) -> StoreError {
    StoreError::Unreachable {
        reason: what.into(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn earlier_slice_error_masks_later_ones() {
    let rig = rig();
    rig.deals.script_list(Err(down("deals endpoint")));
    rig.tasks.script_list(Err(down("tasks endpoint")));

    rig.hub.deals.refresh().await;
    rig.hub.tasks.refresh().await;

    // Both slices failed; only the earlier one in the walk order shows.
    assert_eq!(rig.hub.error(), Some(down("deals endpoint")));

    // Once deals recovers, the masked tasks failure surfaces.
    rig.deals.script_list(Ok(Vec::new()));
    rig.hub.deals.refresh().await;
    assert_eq!(rig.hub.error(), Some(down("tasks endpoint")));
}

#[tokio::test]
async fn hub_is_loading_while_any_slice_is() {
    let rig = rig();
    let release = rig.deals.gate_list();
    rig.deals.script_list(Ok(Vec::new()));

    assert!(!rig.hub.is_loading());

    let mut loading = rig.hub.deals.watch_loading();
    let worker = {
        let hub = Arc::clone(&rig.hub);
        tokio::spawn(async move { hub.deals.refresh().await })
    };
    loading.wait_for(|l| *l).await.unwrap();

    assert!(rig.hub.is_loading());

    release.send(()).unwrap();
    worker.await.unwrap();
    assert!(!rig.hub.is_loading());
}

#[tokio::test]
async fn auth_failures_stay_off_the_global_error_banner() {
    let rig = rig();

    let result = rig
        .hub
        .auth
        .login("dana@fleetline.io", &SecretString::from("wrong"))
        .await;

    assert!(result.is_err());
    assert!(rig.hub.auth.error().is_some());
    assert_eq!(rig.hub.error(), None);
}

#[tokio::test]
async fn refresh_all_records_failures_without_short_circuiting() {
    let rig = rig();
    rig.deals.script_list(Err(down("deals endpoint")));

    rig.hub.refresh_all().await;

    // The failing slice reports; every other slice completed its refresh.
    assert_eq!(rig.hub.error(), Some(down("deals endpoint")));
    assert!(!rig.hub.is_loading());
    assert!(rig.hub.customers.error().is_none());
    assert!(rig.hub.tasks.error().is_none());
}

#[tokio::test]
async fn send_message_swaps_in_the_dispatched_entity() {
    let rig = rig();
    let drafted = Message {
        id: EntityId::from("m1"),
        sender: "dana@fleetline.io".into(),
        recipient: "ops@fleetline.io".into(),
        subject: Some("Q3 rollout".into()),
        body: "Schedule attached.".into(),
        status: MessageStatus::Draft,
        sent_at: None,
    };
    let mut dispatched = drafted.clone();
    dispatched.status = MessageStatus::Sent;
    dispatched.sent_at = Some(chrono::Utc::now());

    rig.messages.script_list(Ok(vec![drafted]));
    rig.messages
        .action
        .lock()
        .unwrap()
        .push_back(Ok(dispatched.clone()));

    rig.hub.messages.refresh().await;
    rig.hub.send_message(&EntityId::from("m1")).await;

    let snap = rig.hub.messages.snapshot();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].status, MessageStatus::Sent);
    assert!(snap[0].sent_at.is_some());
}
