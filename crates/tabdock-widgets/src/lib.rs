#![forbid(unsafe_code)]

//! Widgets: tab-strip drag and drop on top of the tabdock layout model.
//!
//! # Role in tabdock
//! `tabdock-widgets` turns host drag events into store actions and store
//! actions into workspace changes. Hosts implement [`drag::DataTransfer`] and
//! route their events to one [`TabStrip`] per pane.
//!
//! # Data flow
//! ```text
//! drag start ─▶ DragSession::start ─▶ payload + preview on DataTransfer
//! drag over  ─▶ DropTargetResolver ─▶ DragSession::update_target
//! drop       ─▶ TabActionDispatcher::decide/apply ─▶ DragSession::end
//! drag end   ─▶ DragSession::end
//! ```

pub mod dispatch;
pub mod drag;
pub mod drop_target;
pub mod store;
pub mod tab_strip;

pub use dispatch::{
    DispatchPolicy, DropDecision, DropOutcome, DropSource, ModifierBinding, ModifierPolicy,
    SkipReason, TabActionDispatcher,
};
pub use drag::{
    DataTransfer, DragPreview, DragPreviewConfig, DragSession, DragSessionEffect,
    DragSessionNoopReason, DragSessionState, DragSessionTransition, MemoryDataTransfer,
    TAB_DRAG_FORMAT, TabDragPayload, TabPosition,
};
pub use drop_target::{DropSlot, DropTargetResolver};
pub use store::{ActionEffect, Store, StoreError, TabAction, TabState};
pub use tab_strip::{
    TabCallback, TabCell, TabStrip, TabStripHooks, TabStripView, uniform_tab_bounds,
};
