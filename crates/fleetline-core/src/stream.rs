// ── Slice subscriptions ──
//
// A subscription is a thin wrapper over the `watch` receiver a slice
// publishes on. Three consumption styles: poll the latest snapshot,
// await the next change, or await a snapshot matching a predicate
// (the common "wait until the row shows up" case in frontends).

use std::sync::Arc;

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// A live view of one slice's entity collection.
pub struct EntityStream<T> {
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T> EntityStream<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(receiver: watch::Receiver<Snapshot<T>>) -> Self {
        Self { receiver }
    }

    /// The snapshot as of right now.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Await the next published snapshot. `None` once the owning slice
    /// has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Await the first snapshot (including the current one) for which
    /// `pred` holds. `None` once the owning slice has been dropped.
    pub async fn wait_until(
        &mut self,
        mut pred: impl FnMut(&[Arc<T>]) -> bool,
    ) -> Option<Snapshot<T>> {
        let snap = self.receiver.wait_for(|snap| pred(snap)).await.ok()?;
        Some(snap.clone())
    }

    /// Adapt into a `Stream` of snapshots for combinator pipelines. The
    /// current snapshot is yielded first, then one item per change.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot<T>> {
        WatchStream::new(self.receiver)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;
    use pretty_assertions::assert_eq;

    use super::*;

    fn publish(values: &[&str]) -> Snapshot<String> {
        Arc::new(values.iter().map(|v| Arc::new((*v).to_owned())).collect())
    }

    #[tokio::test]
    async fn wait_until_resolves_on_matching_snapshot() {
        let (tx, rx) = watch::channel(publish(&[]));
        let mut stream = EntityStream::new(rx);

        let waiter =
            tokio::spawn(async move { stream.wait_until(|snap| snap.len() == 2).await });

        tx.send(publish(&["alpha"])).unwrap();
        tx.send(publish(&["alpha", "bravo"])).unwrap();

        let snap = waiter.await.unwrap().unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(*snap[1], "bravo");
    }

    #[tokio::test]
    async fn wait_until_matches_the_current_snapshot_without_a_change() {
        let (_tx, rx) = watch::channel(publish(&["alpha"]));
        let mut stream = EntityStream::new(rx);

        let snap = stream.wait_until(|snap| !snap.is_empty()).await.unwrap();
        assert_eq!(*snap[0], "alpha");
    }

    #[tokio::test]
    async fn changed_returns_none_after_the_slice_drops() {
        let (tx, rx) = watch::channel(publish(&[]));
        let mut stream = EntityStream::new(rx);
        drop(tx);

        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn stream_adapter_yields_current_then_changes() {
        let (tx, rx) = watch::channel(publish(&["alpha"]));
        let mut snapshots = Box::pin(EntityStream::new(rx).into_stream());

        let first = snapshots.next().await.unwrap();
        assert_eq!(*first[0], "alpha");

        tx.send(publish(&["alpha", "bravo"])).unwrap();
        let second = snapshots.next().await.unwrap();
        assert_eq!(second.len(), 2);
    }
}
