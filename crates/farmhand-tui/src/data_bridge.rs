//! Data bridge — connects [`Panel`] store streams to TUI actions.
//!
//! Runs as a background task: mounts the panel (initial sync + counts),
//! then forwards every snapshot, count, and load-state change as an
//! [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use farmhand_core::Panel;

use crate::action::{Action, ModalContent};

/// Spawn the data bridge connecting the panel's reactive streams to the TUI.
///
/// Mounts the panel, pushes initial snapshots so the screen has data
/// immediately, then loops forwarding every change. Shuts the panel
/// down cleanly on cancellation.
pub async fn spawn_data_bridge(
    panel: Panel,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    // Initial fetch failure is not fatal: the panel stays mounted with
    // an empty view and the user can retry with `s`.
    if let Err(e) = panel.start().await {
        warn!(error = %e, "initial sync failed");
        let _ = action_tx.send(Action::ShowModal(ModalContent::failure(
            "Could not load livestock",
            &e,
        )));
    }

    let mut livestock = panel.store().subscribe_livestock();
    let mut counts = panel.store().subscribe_counts();
    let mut load_state = panel.store().subscribe_load_state();

    // Push initial state so components render real data on first frame
    let _ = action_tx.send(Action::LivestockUpdated(livestock.current().clone()));
    let _ = action_tx.send(Action::CountsUpdated(counts.borrow_and_update().clone()));
    let _ = action_tx.send(Action::LoadStateChanged(*load_state.borrow_and_update()));

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = livestock.changed() => {
                let _ = action_tx.send(Action::LivestockUpdated(snapshot));
            }
            Ok(()) = counts.changed() => {
                let _ = action_tx.send(Action::CountsUpdated(counts.borrow_and_update().clone()));
            }
            Ok(()) = load_state.changed() => {
                let _ = action_tx.send(Action::LoadStateChanged(*load_state.borrow_and_update()));
            }
        }
    }

    panel.shutdown().await;
    debug!("data bridge shut down");
}
