#![forbid(unsafe_code)]

//! Layout: the pure data model of an editor's panes and tabs.
//!
//! # Role in tabdock
//! `tabdock-layout` owns the state that drag gestures mutate. It has no
//! notion of pointers or drag sessions; `tabdock-widgets` decides *what* to
//! change and calls into [`Workspace`] to change it.
//!
//! # Primary responsibilities
//! - **TabModel**: one pane's ordered tabs with a no-duplicate-path invariant.
//! - **PaneTree**: binary split tree with stable, never-reused pane ids.
//! - **Workspace**: panes + tab lists + focus + `layout_version`.
//! - **Snapshots**: versioned serde schema and a named layout library.

pub mod pane;
pub mod snapshot;
pub mod tabs;
pub mod workspace;

pub use pane::{
    PaneId, PaneModelError, PaneNode, PanePlacement, PaneSplitRatio, PaneTree, SplitOrientation,
};
pub use snapshot::{
    LayoutLibrary, PaneTabsRecord, SnapshotError, WORKSPACE_SCHEMA_VERSION, WorkspaceSnapshot,
};
pub use tabdock_core::geometry::Rect;
pub use tabs::{Tab, TabModel, TabModelError};
pub use workspace::{Workspace, WorkspaceError};
