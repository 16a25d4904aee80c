// ── Singleton snapshot slice ──
//
// Same loading/error contract as `ResourceSlice`, but for read-only
// aggregates that arrive as one document rather than a collection
// (dashboard metrics). No reconciliation to speak of: each refresh
// replaces the whole value.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::api::SnapshotApi;
use crate::error::StoreError;

/// State container for one read-only backend aggregate.
pub struct MetricsSlice<T> {
    label: &'static str,
    api: Arc<dyn SnapshotApi<T>>,
    value: watch::Sender<Option<Arc<T>>>,
    is_loading: watch::Sender<bool>,
    error: watch::Sender<Option<StoreError>>,
}

impl<T> MetricsSlice<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(label: &'static str, api: Arc<dyn SnapshotApi<T>>) -> Self {
        let (value, _) = watch::channel(None);
        let (is_loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);

        Self {
            label,
            api,
            value,
            is_loading,
            error,
        }
    }

    /// Fetch a fresh aggregate and replace the cached one. On failure the
    /// previous value stays visible.
    pub async fn refresh(&self) {
        self.error.send_replace(None);
        self.is_loading.send_replace(true);

        match self.api.fetch().await {
            Ok(fresh) => {
                debug!(slice = self.label, "refreshed");
                self.value.send_replace(Some(Arc::new(fresh)));
            }
            Err(err) => {
                warn!(slice = self.label, error = %err, "refresh failed");
                self.error.send_replace(Some(err));
            }
        }
        self.is_loading.send_replace(false);
    }

    /// Latest aggregate, `None` until the first successful refresh.
    pub fn value(&self) -> Option<Arc<T>> {
        self.value.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.is_loading.borrow()
    }

    pub fn error(&self) -> Option<StoreError> {
        self.error.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.value.subscribe()
    }
}
