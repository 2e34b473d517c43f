//! Drag gesture plumbing: the session state machine, the payload attached to
//! the host drag event, the host capability itself, and the drag preview.

mod payload;
mod preview;
mod session;
mod transfer;

pub use payload::{TAB_DRAG_FORMAT, TabDragPayload};
pub use preview::{DragPreview, DragPreviewConfig};
pub use session::{
    DragSession, DragSessionEffect, DragSessionNoopReason, DragSessionState,
    DragSessionTransition, TabPosition,
};
pub use transfer::{DataTransfer, MemoryDataTransfer};
