//! Translucent drag preview shown at the pointer while a tab is dragged.

use serde::{Deserialize, Serialize};
use tabdock_layout::Tab;

/// Visual configuration of the drag preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragPreviewConfig {
    /// Opacity of the preview (0.0 = invisible, 1.0 = fully opaque).
    /// Default: 0.5.
    pub opacity: f32,
    /// Horizontal offset of the preview from the pointer. Default: 0.
    pub offset_x: i32,
    /// Vertical offset of the preview from the pointer. Default: 0.
    pub offset_y: i32,
}

impl Default for DragPreviewConfig {
    fn default() -> Self {
        Self {
            opacity: 0.5,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl DragPreviewConfig {
    /// Set opacity (clamped to 0.0..=1.0).
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set pointer offset.
    #[must_use]
    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Build the preview for `tab`.
    #[must_use]
    pub fn preview_for(&self, tab: &Tab) -> DragPreview {
        DragPreview {
            label: tab.title().to_string(),
            pinned: tab.pinned,
            opacity: self.opacity,
        }
    }
}

/// Descriptor handed to [`DataTransfer::set_drag_image`](super::DataTransfer::set_drag_image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    pub label: String,
    pub pinned: bool,
    pub opacity: f32,
}
