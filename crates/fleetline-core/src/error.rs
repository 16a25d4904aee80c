// ── Core error type ──
//
// User-facing errors from fleetline-core. Consumers never see raw reqwest
// failures or JSON parse errors; the `From<fleetline_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.
//
// Unlike the api crate's error, this type is `Clone` + `PartialEq`: slices
// park the last failure in a watch channel that many readers observe.

use thiserror::Error;

/// Unified error type for the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach backend: {reason}")]
    Unreachable { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Backend rejected the request (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Malformed backend response: {message}")]
    Malformed { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },
}

impl From<fleetline_api::Error> for StoreError {
    fn from(err: fleetline_api::Error) -> Self {
        use fleetline_api::Error as Api;
        match err {
            Api::Authentication { message } => Self::AuthenticationFailed { message },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    Self::Unreachable {
                        reason: e.to_string(),
                    }
                } else {
                    Self::OperationFailed {
                        message: e.to_string(),
                    }
                }
            }
            Api::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            Api::InvalidUrl(e) => Self::OperationFailed {
                message: format!("invalid URL: {e}"),
            },
            Api::Api {
                status: 404,
                message,
                ..
            } => Self::NotFound { path: message },
            Api::Api {
                message,
                code,
                status,
            } => Self::Rejected {
                status,
                message,
                code,
            },
            Api::Deserialization { message, body: _ } => Self::Malformed { message },
        }
    }
}
