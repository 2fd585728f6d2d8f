// ── Runtime panel configuration ──
//
// Describes *how* to reach the farm backend and how the panel paces
// itself. Built by the TUI (from CLI flags or farmhand-config profiles)
// and handed in — core never reads config files.

use std::time::Duration;

use url::Url;

/// Configuration for one management-panel instance.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Backend base URL (e.g., `http://localhost:8080`).
    pub server: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// How long to wait after a mutation before the follow-up re-sync.
    /// Absorbs the backend's eventual-consistency lag.
    pub sync_delay: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            server: Url::parse("http://localhost:8080").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
            sync_delay: Duration::from_millis(500),
        }
    }
}
