// fleetline-api: Async Rust client for the Fleetline partner-management REST API

pub mod client;
pub mod collection;
pub mod error;
pub mod transport;

pub use client::{AuthSession, RestClient};
pub use collection::{Collection, Singleton};
pub use error::Error;
pub use transport::TransportConfig;
