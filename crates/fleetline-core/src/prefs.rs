// ── UI preference slice ──
//
// Purely local state: layout, theme, and the in-app notification feed.
// No collaborator, no loading flag — every operation is synchronous and
// infallible. Published over `watch` channels like everything else so
// frontends re-render off the same mechanism.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::model::{Notification, NotificationLevel, Theme, ThemeMode};

pub struct PrefsSlice {
    sidebar_collapsed: watch::Sender<bool>,
    theme: watch::Sender<Arc<Theme>>,
    notifications: watch::Sender<Arc<Vec<Notification>>>,
}

impl Default for PrefsSlice {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefsSlice {
    pub fn new() -> Self {
        let (sidebar_collapsed, _) = watch::channel(false);
        let (theme, _) = watch::channel(Arc::new(Theme::default()));
        let (notifications, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            sidebar_collapsed,
            theme,
            notifications,
        }
    }

    // ── Layout ───────────────────────────────────────────────────────

    pub fn toggle_sidebar(&self) {
        self.sidebar_collapsed.send_modify(|c| *c = !*c);
    }

    pub fn sidebar_collapsed(&self) -> bool {
        *self.sidebar_collapsed.borrow()
    }

    // ── Theme ────────────────────────────────────────────────────────

    pub fn set_theme(&self, theme: Theme) {
        debug!(mode = %theme.mode, "theme changed");
        self.theme.send_replace(Arc::new(theme));
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) {
        self.theme.send_modify(|theme| {
            let mut next = theme.as_ref().clone();
            next.mode = mode;
            *theme = Arc::new(next);
        });
    }

    pub fn theme(&self) -> Arc<Theme> {
        self.theme.borrow().clone()
    }

    // ── Notification feed ────────────────────────────────────────────

    /// Push a notification onto the front of the feed (newest first).
    /// Returns the client-assigned id for later dismissal.
    pub fn notify(
        &self,
        level: NotificationLevel,
        title: impl Into<String>,
        body: Option<String>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let entry = Notification {
            id,
            level,
            title: title.into(),
            body,
            read: false,
            created_at: Utc::now(),
        };
        self.notifications.send_modify(|feed| {
            let mut next = feed.as_ref().clone();
            next.insert(0, entry);
            *feed = Arc::new(next);
        });
        id
    }

    /// Remove one notification. Unknown ids are ignored.
    pub fn dismiss(&self, id: Uuid) {
        self.notifications.send_modify(|feed| {
            let mut next = feed.as_ref().clone();
            next.retain(|n| n.id != id);
            *feed = Arc::new(next);
        });
    }

    pub fn mark_read(&self, id: Uuid) {
        self.notifications.send_modify(|feed| {
            let mut next = feed.as_ref().clone();
            for entry in &mut next {
                if entry.id == id {
                    entry.read = true;
                }
            }
            *feed = Arc::new(next);
        });
    }

    pub fn notifications(&self) -> Arc<Vec<Notification>> {
        self.notifications.borrow().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.borrow().iter().filter(|n| !n.read).count()
    }

    pub fn watch_notifications(&self) -> watch::Receiver<Arc<Vec<Notification>>> {
        self.notifications.subscribe()
    }
}
