//! Serialized drag payload attached to the platform drag event.
//!
//! The payload duplicates what the [`DragSession`](super::DragSession)
//! already knows so that a drop can be resolved even when the in-memory
//! session was lost or garbled. It is therefore strictly best-effort: decoding
//! never fails loudly, and a missing or malformed payload simply means the
//! drop falls back to session state.

use serde::{Deserialize, Serialize};
use tabdock_layout::{PaneId, Tab};
use tracing::warn;

use super::session::TabPosition;
use super::transfer::DataTransfer;

/// Data-transfer format identifier for tab payloads.
pub const TAB_DRAG_FORMAT: &str = "application/x-tabdock-tab+json";

/// JSON payload `{paneId, tabIndex, filePath, isPinned}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDragPayload {
    pub pane_id: PaneId,
    pub tab_index: usize,
    pub file_path: String,
    pub is_pinned: bool,
}

impl TabDragPayload {
    #[must_use]
    pub fn new(pane_id: PaneId, tab_index: usize, tab: &Tab) -> Self {
        Self {
            pane_id,
            tab_index,
            file_path: tab.path.clone(),
            is_pinned: tab.pinned,
        }
    }

    #[must_use]
    pub const fn position(&self) -> TabPosition {
        TabPosition::new(self.pane_id, self.tab_index)
    }

    /// Encode as JSON.
    #[must_use]
    pub fn encode(&self) -> String {
        // A struct of plain fields always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode from JSON, treating empty or malformed input as "no payload".
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<Self>(raw) {
            Ok(payload) if !payload.file_path.is_empty() => Some(payload),
            Ok(_) => {
                warn!("drag payload has an empty file path; falling back to session state");
                None
            }
            Err(error) => {
                warn!(%error, "malformed drag payload; falling back to session state");
                None
            }
        }
    }

    /// Attach to the drag event under [`TAB_DRAG_FORMAT`].
    pub fn attach(&self, transfer: &mut impl DataTransfer) {
        transfer.set_data(TAB_DRAG_FORMAT, &self.encode());
    }

    /// Read back from the drag event.
    #[must_use]
    pub fn read(transfer: &impl DataTransfer) -> Option<Self> {
        transfer
            .get_data(TAB_DRAG_FORMAT)
            .and_then(|raw| Self::decode(&raw))
    }
}
