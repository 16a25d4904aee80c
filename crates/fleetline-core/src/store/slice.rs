// ── Generic resource slice ──
//
// One slice owns the local cache of one backend collection: an ordered
// snapshot of entities, a loading flag, and an error slot, all published
// through `watch` channels. CRUD operations call the collaborator and
// reconcile its canonical responses into the cache.
//
// Reconciliation rules:
//   - refresh: wholesale replace, server order preserved
//   - create:  append the server's entity (no optimistic insert)
//   - update:  replace-in-place by id, position preserved
//   - delete:  filter by id only after the server confirms
//
// On failure the cache is left untouched — stale-but-present beats blank.
//
// Operations are NOT serialized against each other. Two in-flight calls
// resolve in network-completion order, so a slow refresh can transiently
// revert a faster mutation until the next refresh. Behavioral parity with
// the shipping clients; callers wanting stronger ordering must queue
// above this layer.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::api::ResourceApi;
use crate::error::StoreError;
use crate::model::{EntityId, Identifiable};
use crate::stream::EntityStream;

/// State container for one REST-backed entity collection.
pub struct ResourceSlice<E, D> {
    label: &'static str,
    api: Arc<dyn ResourceApi<E, D>>,
    items: watch::Sender<Arc<Vec<Arc<E>>>>,
    is_loading: watch::Sender<bool>,
    error: watch::Sender<Option<StoreError>>,
}

impl<E, D> ResourceSlice<E, D>
where
    E: Identifiable + Clone + Send + Sync + 'static,
    D: Send + Sync,
{
    pub fn new(label: &'static str, api: Arc<dyn ResourceApi<E, D>>) -> Self {
        let (items, _) = watch::channel(Arc::new(Vec::new()));
        let (is_loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);

        Self {
            label,
            api,
            items,
            is_loading,
            error,
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the complete collection and replace the cache wholesale,
    /// preserving server order. On failure the stale cache stays visible.
    pub async fn refresh(&self) {
        self.begin();
        match self.api.list().await {
            Ok(fresh) => {
                let snapshot: Vec<Arc<E>> = fresh.into_iter().map(Arc::new).collect();
                debug!(slice = self.label, count = snapshot.len(), "refreshed");
                self.items.send_replace(Arc::new(snapshot));
                self.settle(None);
            }
            Err(e) => self.settle(Some(e)),
        }
    }

    /// Create an entity from a draft. The server's canonical entity is
    /// appended; nothing is inserted until the server confirms.
    pub async fn create(&self, draft: &D) {
        self.begin();
        match self.api.create(draft).await {
            Ok(entity) => {
                debug!(slice = self.label, id = %entity.id(), "created");
                self.mutate(|items| items.push(Arc::new(entity)));
                self.settle(None);
            }
            Err(e) => self.settle(Some(e)),
        }
    }

    /// Update the entity identified by `id`, replacing it in place with
    /// the server's canonical response. Unknown ids reconcile to a no-op.
    pub async fn update(&self, id: &EntityId, draft: &D) {
        self.begin();
        match self.api.update(id, draft).await {
            Ok(entity) => {
                debug!(slice = self.label, id = %id, "updated");
                let fresh = Arc::new(entity);
                self.mutate(|items| {
                    for slot in items.iter_mut() {
                        if slot.id() == id {
                            *slot = Arc::clone(&fresh);
                        }
                    }
                });
                self.settle(None);
            }
            Err(e) => self.settle(Some(e)),
        }
    }

    /// Delete the entity identified by `id`. Pessimistic: the row stays
    /// visible until the server confirms. Idempotent when the id is
    /// already gone.
    pub async fn delete(&self, id: &EntityId) {
        self.begin();
        match self.api.delete(id).await {
            Ok(()) => {
                debug!(slice = self.label, id = %id, "deleted");
                self.mutate(|items| items.retain(|item| item.id() != id));
                self.settle(None);
            }
            Err(e) => self.settle(Some(e)),
        }
    }

    /// Invoke a workflow action on one entity and reconcile the updated
    /// canonical entity by replace-in-place.
    pub async fn apply_action(&self, id: &EntityId, action: &str) {
        self.begin();
        match self.api.action(id, action).await {
            Ok(entity) => {
                debug!(slice = self.label, id = %id, action, "action applied");
                let fresh = Arc::new(entity);
                self.mutate(|items| {
                    for slot in items.iter_mut() {
                        if slot.id() == id {
                            *slot = Arc::clone(&fresh);
                        }
                    }
                });
                self.settle(None);
            }
            Err(e) => self.settle(Some(e)),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot (cheap `Arc` clone). Read-only: mutation happens
    /// exclusively through the operations above.
    pub fn snapshot(&self) -> Arc<Vec<Arc<E>>> {
        self.items.borrow().clone()
    }

    /// Look up one cached entity by id.
    pub fn get(&self, id: &EntityId) -> Option<Arc<E>> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// `true` exactly while an operation is in flight.
    pub fn is_loading(&self) -> bool {
        *self.is_loading.borrow()
    }

    /// Last operation's failure, if any. Cleared when a new operation
    /// begins.
    pub fn error(&self) -> Option<StoreError> {
        self.error.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> EntityStream<E> {
        EntityStream::new(self.items.subscribe())
    }

    /// Observe the loading flag as it flips.
    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.is_loading.subscribe()
    }

    /// Observe the error slot as it changes.
    pub fn watch_error(&self) -> watch::Receiver<Option<StoreError>> {
        self.error.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Clear the error slot and raise the loading flag. Runs before the
    /// collaborator call regardless of the operation's eventual outcome.
    fn begin(&self) {
        self.error.send_replace(None);
        self.is_loading.send_replace(true);
    }

    /// Record the outcome and drop the loading flag. Success leaves the
    /// error slot as `begin` left it.
    fn settle(&self, outcome: Option<StoreError>) {
        if let Some(err) = outcome {
            warn!(slice = self.label, error = %err, "operation failed");
            self.error.send_replace(Some(err));
        }
        self.is_loading.send_replace(false);
    }

    /// Apply an edit to a copy of the current snapshot and publish it.
    fn mutate(&self, edit: impl FnOnce(&mut Vec<Arc<E>>)) {
        self.items.send_modify(|snap| {
            let mut next = snap.as_ref().clone();
            edit(&mut next);
            *snap = Arc::new(next);
        });
    }
}
