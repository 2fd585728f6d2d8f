// ── Core error types ──
//
// User-facing errors from farmhand-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<farmhand_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Panel shut down")]
    PanelClosed,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No livestock with tag #{tag}")]
    RecordNotFound { tag: u32 },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Livestock #{tag} is not harvestable yet")]
    NotHarvestable { tag: u32 },

    #[error("Operation rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<farmhand_api::Error> for CoreError {
    fn from(err: farmhand_api::Error) -> Self {
        match err {
            farmhand_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            farmhand_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            farmhand_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            farmhand_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            farmhand_api::Error::Rejected { message } => CoreError::Rejected { message },
            farmhand_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<crate::model::ModelError> for CoreError {
    fn from(err: crate::model::ModelError) -> Self {
        CoreError::ValidationFailed {
            message: err.to_string(),
        }
    }
}
