//! Platform drag capability.
//!
//! The conventional imperative drag-and-drop contract (string payloads keyed by
//! format, a custom drag image, and "prevent default" to mark a valid drop
//! zone) reduced to a trait so that the drag machinery can run against any
//! host, including the in-memory implementation used by tests.

use std::collections::BTreeMap;

use super::preview::DragPreview;

/// Host drag event surface.
pub trait DataTransfer {
    /// Store an opaque string payload under `format`.
    fn set_data(&mut self, format: &str, data: &str);

    /// Read the payload stored under `format`, if any.
    fn get_data(&self, format: &str) -> Option<String>;

    /// Replace the default drag image with `preview`, anchored at the given
    /// offset from the pointer.
    fn set_drag_image(&mut self, preview: &DragPreview, offset_x: i32, offset_y: i32);

    /// Mark the element under the pointer as a valid drop zone.
    fn prevent_default(&mut self);
}

/// In-memory [`DataTransfer`] for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataTransfer {
    data: BTreeMap<String, String>,
    drag_image: Option<(DragPreview, i32, i32)>,
    default_prevented: bool,
}

impl MemoryDataTransfer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The drag image most recently set, with its offset.
    #[must_use]
    pub fn drag_image(&self) -> Option<&(DragPreview, i32, i32)> {
        self.drag_image.as_ref()
    }

    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Clear per-event flags between two dispatched events.
    pub fn begin_event(&mut self) {
        self.default_prevented = false;
    }

    /// Overwrite a payload verbatim, e.g. to simulate a garbled event stream.
    pub fn inject(&mut self, format: &str, raw: &str) {
        self.data.insert(format.to_string(), raw.to_string());
    }

    /// Drop all payloads, as hosts do when a gesture finishes.
    pub fn clear(&mut self) {
        self.data.clear();
        self.drag_image = None;
        self.default_prevented = false;
    }
}

impl DataTransfer for MemoryDataTransfer {
    fn set_data(&mut self, format: &str, data: &str) {
        self.data.insert(format.to_string(), data.to_string());
    }

    fn get_data(&self, format: &str) -> Option<String> {
        self.data.get(format).cloned()
    }

    fn set_drag_image(&mut self, preview: &DragPreview, offset_x: i32, offset_y: i32) {
        self.drag_image = Some((preview.clone(), offset_x, offset_y));
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
