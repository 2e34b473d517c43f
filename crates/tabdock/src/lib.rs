#![forbid(unsafe_code)]

//! tabdock public facade crate.
//!
//! Re-exports the types an editor host needs to wire tab drag-and-drop into
//! its panes, plus a prelude for day-to-day usage.
//!
//! ```rust,ignore
//! use tabdock::prelude::*;
//!
//! let policy = DragPolicyConfig::from_toml_file("tabdock.toml")?;
//! let mut store = EditorStore::new(Workspace::new(), &policy);
//! let strip = policy.tab_strip(PaneId::MIN, Rect::new(0, 0, 800, 28));
//! strip.on_drag_start(&mut store, &mut transfer, 0)?;
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tabdock_core::event::{Modifiers, PointerSnapshot};
pub use tabdock_core::geometry::{Point, Rect};

// --- Layout re-exports -----------------------------------------------------

pub use tabdock_layout::{
    LayoutLibrary, PaneId, PanePlacement, SnapshotError, SplitOrientation, Tab, TabModel,
    Workspace, WorkspaceError, WorkspaceSnapshot,
};

// --- Widget re-exports -----------------------------------------------------

pub use tabdock_widgets::{
    DataTransfer, DispatchPolicy, DragPreview, DragPreviewConfig, DragSession, DragSessionState,
    DropDecision, DropOutcome, DropSlot, DropTargetResolver, MemoryDataTransfer, ModifierBinding,
    ModifierPolicy, SkipReason, Store, StoreError, TAB_DRAG_FORMAT, TabAction,
    TabActionDispatcher, TabDragPayload, TabPosition, TabState, TabStrip, TabStripHooks,
    TabStripView,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use tabdock_runtime::{ConfigError, DragPolicyConfig, EditorStore, GestureTrace, TraceError};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tabdock hosts.
#[derive(Debug)]
pub enum Error {
    /// A store action was rejected.
    Store(StoreError),
    /// Policy configuration failed to load or validate.
    #[cfg(feature = "runtime")]
    Config(ConfigError),
    /// A gesture trace failed to load or replay.
    #[cfg(feature = "runtime")]
    Trace(TraceError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Trace(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Config(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Trace(err) => Some(err),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<WorkspaceError> for Error {
    fn from(err: WorkspaceError) -> Self {
        Self::Store(StoreError::Workspace(err))
    }
}

#[cfg(feature = "runtime")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "runtime")]
impl From<TraceError> for Error {
    fn from(err: TraceError) -> Self {
        Self::Trace(err)
    }
}

/// Standard result type for tabdock APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DataTransfer, DropOutcome, Error, MemoryDataTransfer, Modifiers, PaneId, Point,
        PointerSnapshot, Rect, Result, SplitOrientation, Store, TabAction, TabState, TabStrip,
        Workspace,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{DragPolicyConfig, EditorStore, GestureTrace};

    pub use crate::{core, layout, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use tabdock_core as core;
pub use tabdock_layout as layout;
#[cfg(feature = "runtime")]
pub use tabdock_runtime as runtime;
pub use tabdock_widgets as widgets;
