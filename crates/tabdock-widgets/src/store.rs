#![forbid(unsafe_code)]

//! Action/state contract between tab strips and the application store.
//!
//! Tab strips never mutate state directly. Each handler turns a host event
//! into a [`TabAction`] and hands it to a [`Store`]; all state, including the
//! one drag session shared by every strip, lives in [`TabState`] and changes
//! only through [`TabState::reduce`].
//!
//! # Invariants
//!
//! - `Drop` and `DragEnd` always leave the session idle, including when the
//!   drop itself fails.
//! - `DragOver` targets are clamped to `[0, tab count]` of the hovered pane.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabdock_core::event::PointerSnapshot;
use tabdock_core::geometry::Rect;
use tabdock_layout::{
    LayoutLibrary, PaneId, PanePlacement, PaneSplitRatio, SnapshotError, SplitOrientation,
    Workspace, WorkspaceError,
};

use crate::dispatch::{DispatchPolicy, DropOutcome, DropSource, TabActionDispatcher};
use crate::drag::{DragSession, DragSessionTransition, TabDragPayload, TabPosition};

/// Everything a tab strip or editor surface can ask the store to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TabAction {
    DragStart {
        pane: PaneId,
        index: usize,
    },
    DragOver {
        pane: PaneId,
        index: usize,
    },
    Drop {
        /// Decoded drag payload, if the host delivered a readable one.
        #[serde(default)]
        payload: Option<TabDragPayload>,
        /// Boundary under the pointer; the session target is used when absent.
        #[serde(default)]
        target: Option<TabPosition>,
        pointer: PointerSnapshot,
        viewport: Rect,
    },
    DragEnd,
    OpenTab {
        pane: PaneId,
        path: String,
    },
    CloseTab {
        pane: PaneId,
        path: String,
    },
    ActivateTab {
        pane: PaneId,
        path: String,
    },
    SetPinned {
        pane: PaneId,
        path: String,
        pinned: bool,
    },
    SplitPane {
        pane: PaneId,
        orientation: SplitOrientation,
        /// `existing:new` weights. Even when absent.
        #[serde(default)]
        ratio: PaneSplitRatio,
    },
    /// Re-weight the split directly holding `pane`.
    ResizeSplit {
        pane: PaneId,
        ratio: PaneSplitRatio,
    },
    ClosePane {
        pane: PaneId,
    },
    FocusPane {
        pane: PaneId,
    },
    SaveLayout {
        name: String,
    },
    LoadLayout {
        name: String,
    },
}

impl TabAction {
    /// Drag lifecycle actions, as opposed to ordinary editor actions.
    #[must_use]
    pub const fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. } | Self::DragOver { .. } | Self::Drop { .. } | Self::DragEnd
        )
    }
}

/// Observable effect of one reduced action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEffect {
    Session {
        transition: DragSessionTransition,
    },
    Dropped {
        outcome: DropOutcome,
        transition: DragSessionTransition,
    },
    Workspace {
        previous_version: u64,
        layout_version: u64,
    },
}

impl ActionEffect {
    /// True when the workspace (tabs, panes or focus) changed.
    #[must_use]
    pub const fn changed_workspace(&self) -> bool {
        match self {
            Self::Session { .. } => false,
            Self::Dropped { outcome, .. } => !outcome.is_skipped(),
            Self::Workspace {
                previous_version,
                layout_version,
            } => *previous_version != *layout_version,
        }
    }
}

/// Dispatch/select contract consumed by tab strips.
pub trait Store {
    fn dispatch(&mut self, action: TabAction) -> Result<ActionEffect, StoreError>;

    fn state(&self) -> &TabState;

    fn select<R>(&self, selector: impl FnOnce(&TabState) -> R) -> R
    where
        Self: Sized,
    {
        selector(self.state())
    }
}

/// Store state: panes and tabs, the drag session, saved layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabState {
    workspace: Workspace,
    session: DragSession,
    library: LayoutLibrary,
    last_drop: Option<DropOutcome>,
    dispatcher: TabActionDispatcher,
}

impl TabState {
    #[must_use]
    pub fn new(workspace: Workspace, policy: DispatchPolicy) -> Self {
        Self {
            workspace,
            session: DragSession::new(),
            library: LayoutLibrary::new(),
            last_drop: None,
            dispatcher: TabActionDispatcher::new(policy),
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: LayoutLibrary) -> Self {
        self.library = library;
        self
    }

    /// Resume a drag that was already in flight.
    #[must_use]
    pub fn with_session(mut self, session: DragSession) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    #[must_use]
    pub const fn session(&self) -> &DragSession {
        &self.session
    }

    #[must_use]
    pub const fn library(&self) -> &LayoutLibrary {
        &self.library
    }

    /// Outcome of the most recent drop, skipped or not.
    #[must_use]
    pub const fn last_drop(&self) -> Option<&DropOutcome> {
        self.last_drop.as_ref()
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &TabActionDispatcher {
        &self.dispatcher
    }

    /// Apply one action.
    pub fn reduce(&mut self, action: TabAction) -> Result<ActionEffect, StoreError> {
        match action {
            TabAction::DragStart { pane, index } => Ok(ActionEffect::Session {
                transition: self.session.start(pane, index),
            }),
            TabAction::DragOver { pane, index } => {
                let index = self
                    .workspace
                    .tabs(pane)
                    .map_or(index, |model| index.min(model.len()));
                Ok(ActionEffect::Session {
                    transition: self.session.update_target(pane, index),
                })
            }
            TabAction::Drop {
                payload,
                target,
                pointer,
                viewport,
            } => self.reduce_drop(payload.as_ref(), target, pointer, viewport),
            TabAction::DragEnd => Ok(ActionEffect::Session {
                transition: self.session.end(),
            }),
            TabAction::OpenTab { pane, path } => self.edit(|ws, _| {
                ws.open_tab(pane, path)?;
                ws.focus_pane(pane)?;
                Ok(())
            }),
            TabAction::CloseTab { pane, path } => self.edit(|ws, _| {
                ws.close_tab(pane, &path)?;
                Ok(())
            }),
            TabAction::ActivateTab { pane, path } => self.edit(|ws, _| {
                ws.activate_tab(pane, &path)?;
                Ok(())
            }),
            TabAction::SetPinned { pane, path, pinned } => self.edit(|ws, _| {
                ws.set_pinned(pane, &path, pinned)?;
                Ok(())
            }),
            TabAction::SplitPane {
                pane,
                orientation,
                ratio,
            } => self.edit(|ws, _| {
                ws.split_pane_with_ratio(pane, orientation, PanePlacement::ExistingFirst, ratio)?;
                Ok(())
            }),
            TabAction::ResizeSplit { pane, ratio } => self.edit(|ws, _| {
                ws.resize_split(pane, ratio)?;
                Ok(())
            }),
            TabAction::ClosePane { pane } => self.edit(|ws, _| {
                ws.close_pane(pane)?;
                Ok(())
            }),
            TabAction::FocusPane { pane } => self.edit(|ws, _| Ok(ws.focus_pane(pane)?)),
            TabAction::SaveLayout { name } => self.edit(|ws, library| {
                library.save(name, ws);
                Ok(())
            }),
            TabAction::LoadLayout { name } => self.edit(|ws, library| {
                *ws = library.load(&name, ws)?;
                Ok(())
            }),
        }
    }

    fn reduce_drop(
        &mut self,
        payload: Option<&TabDragPayload>,
        target: Option<TabPosition>,
        pointer: PointerSnapshot,
        viewport: Rect,
    ) -> Result<ActionEffect, StoreError> {
        let source = payload
            .map(DropSource::from_payload)
            .or_else(|| self.session.source().map(DropSource::from_position));
        let target = target.or_else(|| self.session.target());
        let result = self.dispatcher.handle_drop(
            &mut self.workspace,
            source.as_ref(),
            target,
            pointer,
            viewport,
        );
        // The session ends whatever the drop did.
        let transition = self.session.end();
        let outcome = result?;
        self.last_drop = Some(outcome);
        Ok(ActionEffect::Dropped {
            outcome,
            transition,
        })
    }

    fn edit(
        &mut self,
        change: impl FnOnce(&mut Workspace, &mut LayoutLibrary) -> Result<(), StoreError>,
    ) -> Result<ActionEffect, StoreError> {
        let previous_version = self.workspace.layout_version();
        change(&mut self.workspace, &mut self.library)?;
        Ok(ActionEffect::Workspace {
            previous_version,
            layout_version: self.workspace.layout_version(),
        })
    }
}

impl Store for TabState {
    fn dispatch(&mut self, action: TabAction) -> Result<ActionEffect, StoreError> {
        self.reduce(action)
    }

    fn state(&self) -> &TabState {
        self
    }
}

/// Errors from non-gesture actions.
///
/// Gesture actions never fail on bad input; a drop can only error when the
/// workspace was already inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Workspace(WorkspaceError),
    Snapshot(SnapshotError),
}

impl From<WorkspaceError> for StoreError {
    fn from(error: WorkspaceError) -> Self {
        Self::Workspace(error)
    }
}

impl From<SnapshotError> for StoreError {
    fn from(error: SnapshotError) -> Self {
        Self::Snapshot(error)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workspace(error) => write!(f, "workspace action failed: {error}"),
            Self::Snapshot(error) => write!(f, "layout action failed: {error}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Workspace(error) => Some(error),
            Self::Snapshot(error) => Some(error),
        }
    }
}
