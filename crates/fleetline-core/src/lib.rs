//! Client-side state layer for Fleetline frontends.
//!
//! The entry point is [`Hub`]: one value owning a cache slice per backend
//! collection, the signed-in user, dashboard metrics, and local UI
//! preferences. Slices publish through `watch` channels, so any number of
//! views can observe the same state and re-render on change.
//!
//! Caching policy in one paragraph: reads replace wholesale, mutations
//! are pessimistic (the cache changes only after the server confirms,
//! always with the server's canonical entity), failures leave the last
//! known good snapshot visible alongside an error. Concurrent operations
//! on one slice resolve in completion order.

pub mod auth;
pub mod error;
pub mod model;
pub mod prefs;
pub mod store;
pub mod stream;

pub use auth::{AuthSlice, SessionStore};
pub use error::StoreError;
pub use prefs::PrefsSlice;
pub use store::{Hub, HubParts, MetricsSlice, ResourceSlice};
pub use stream::EntityStream;
