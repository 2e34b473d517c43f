#![forbid(unsafe_code)]

//! Drop decision and application.
//!
//! [`TabActionDispatcher::decide`] is a pure function from modifier state and
//! pointer position to a closed [`DropDecision`]. [`TabActionDispatcher::apply`]
//! carries the decision out against a [`Workspace`].
//!
//! # Invariants
//!
//! 1. A drop never raises: invalid sources, vanished panes and degenerate
//!    gestures all produce [`DropOutcome::Skipped`] with the workspace untouched.
//! 2. No pane ever holds two tabs with the same path. Copies onto a pane that
//!    already has the path are skipped; cross-pane moves onto such a pane merge
//!    into the existing tab.
//! 3. A same-pane move is one atomic reorder, never a remove followed by an
//!    independently indexed insert.

use serde::{Deserialize, Serialize};
use tabdock_core::event::{Modifiers, PointerSnapshot};
use tabdock_core::geometry::Rect;
use tabdock_layout::{PaneId, PanePlacement, SplitOrientation, Tab, Workspace, WorkspaceError};
use tracing::{info, warn};

use crate::drag::{TabDragPayload, TabPosition};

/// What a completed drop does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DropDecision {
    Move,
    Copy,
    Split { orientation: SplitOrientation },
}

/// A modifier chord that selects a drop mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierBinding {
    Shift,
    Alt,
    Ctrl,
    Meta,
    CtrlOrMeta,
    /// Never matches.
    Disabled,
}

impl ModifierBinding {
    #[must_use]
    pub const fn matches(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Shift => modifiers.contains(Modifiers::SHIFT),
            Self::Alt => modifiers.contains(Modifiers::ALT),
            Self::Ctrl => modifiers.contains(Modifiers::CTRL),
            Self::Meta => modifiers.contains(Modifiers::META),
            Self::CtrlOrMeta => modifiers.ctrl_or_meta(),
            Self::Disabled => false,
        }
    }
}

/// Modifier chords for the non-default drop modes. Copy wins over split when
/// both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierPolicy {
    pub copy: ModifierBinding,
    pub split: ModifierBinding,
}

impl Default for ModifierPolicy {
    fn default() -> Self {
        Self {
            copy: ModifierBinding::CtrlOrMeta,
            split: ModifierBinding::Shift,
        }
    }
}

/// Dispatcher behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchPolicy {
    pub modifiers: ModifierPolicy,
    /// Close a pane left without tabs by a move or split, unless it is the
    /// last pane.
    pub close_empty_panes: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            modifiers: ModifierPolicy::default(),
            close_empty_panes: true,
        }
    }
}

/// The dragged tab as known at drop time.
///
/// `path` comes from the drag payload when one could be decoded. With a path
/// the tab is located by path, so a stale index cannot pick the wrong tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSource {
    pub position: TabPosition,
    #[serde(default)]
    pub path: Option<String>,
}

impl DropSource {
    #[must_use]
    pub const fn from_position(position: TabPosition) -> Self {
        Self {
            position,
            path: None,
        }
    }

    #[must_use]
    pub fn from_payload(payload: &TabDragPayload) -> Self {
        Self {
            position: payload.position(),
            path: Some(payload.file_path.clone()),
        }
    }
}

/// Why a drop changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Released outside every tab strip.
    NoTarget,
    /// Neither a payload nor an active session identified the dragged tab.
    NoSource,
    /// The dragged tab no longer exists where the gesture says it was.
    SourceMissing,
    /// The target pane was closed mid-drag.
    TargetPaneMissing,
    /// Copy target already has the path open.
    AlreadyOpen,
    /// Copy within one pane.
    CopyOntoSelf,
    /// Move to the boundary the tab already occupies.
    SamePosition,
    /// Split of a pane's only tab into that same pane.
    NothingToSplit,
}

/// Result of one drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Reordered {
        pane: PaneId,
        from: usize,
        to: usize,
    },
    Moved {
        from: TabPosition,
        to: TabPosition,
        /// The target already had the path; its tab was activated instead.
        merged: bool,
        closed_pane: Option<PaneId>,
    },
    Copied {
        from: TabPosition,
        to: TabPosition,
    },
    Split {
        from: TabPosition,
        new_pane: PaneId,
        orientation: SplitOrientation,
        closed_pane: Option<PaneId>,
    },
    Skipped {
        reason: SkipReason,
    },
}

impl DropOutcome {
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }
}

/// Turns a completed drop into exactly one workspace change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabActionDispatcher {
    policy: DispatchPolicy,
}

impl TabActionDispatcher {
    #[must_use]
    pub const fn new(policy: DispatchPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// Decide the drop mode from the pointer state at release.
    ///
    /// Split orientation is `Horizontal` when the pointer is left of the
    /// viewport's horizontal midpoint, `Vertical` otherwise.
    #[must_use]
    pub fn decide(&self, pointer: PointerSnapshot, viewport: Rect) -> DropDecision {
        let bindings = self.policy.modifiers;
        if bindings.copy.matches(pointer.modifiers) {
            DropDecision::Copy
        } else if bindings.split.matches(pointer.modifiers) {
            let orientation = if viewport.is_left_of_center(pointer.position.x) {
                SplitOrientation::Horizontal
            } else {
                SplitOrientation::Vertical
            };
            DropDecision::Split { orientation }
        } else {
            DropDecision::Move
        }
    }

    /// Decide and apply a drop in one step.
    ///
    /// A missing source or target is a skip, never an error.
    pub fn handle_drop(
        &self,
        workspace: &mut Workspace,
        source: Option<&DropSource>,
        target: Option<TabPosition>,
        pointer: PointerSnapshot,
        viewport: Rect,
    ) -> Result<DropOutcome, WorkspaceError> {
        let Some(target) = target else {
            return Ok(DropOutcome::skipped(SkipReason::NoTarget));
        };
        let Some(source) = source else {
            warn!("drop without payload or active session");
            return Ok(DropOutcome::skipped(SkipReason::NoSource));
        };
        let decision = self.decide(pointer, viewport);
        self.apply(workspace, source, target, decision)
    }

    /// Apply `decision` to `workspace`.
    ///
    /// Every precondition is checked before the first mutation, so an `Err`
    /// here means the workspace itself was already inconsistent.
    pub fn apply(
        &self,
        workspace: &mut Workspace,
        source: &DropSource,
        target: TabPosition,
        decision: DropDecision,
    ) -> Result<DropOutcome, WorkspaceError> {
        let Some(target_len) = workspace.tabs(target.pane).map(|model| model.len()) else {
            warn!(pane = %target.pane, "drop target pane no longer exists");
            return Ok(DropOutcome::skipped(SkipReason::TargetPaneMissing));
        };
        let Some((from, tab)) = locate(workspace, source) else {
            warn!(
                pane = %source.position.pane,
                index = source.position.index,
                "dragged tab not found"
            );
            return Ok(DropOutcome::skipped(SkipReason::SourceMissing));
        };
        let target = TabPosition::new(target.pane, target.index.min(target_len));

        let outcome = match decision {
            DropDecision::Move => self.apply_move(workspace, from, tab, target)?,
            DropDecision::Copy => apply_copy(workspace, from, &tab, target)?,
            DropDecision::Split { orientation } => {
                self.apply_split(workspace, from, tab, target, orientation)?
            }
        };
        if !outcome.is_skipped() {
            info!(?decision, ?outcome, "tab drop applied");
        }
        Ok(outcome)
    }

    fn apply_move(
        &self,
        workspace: &mut Workspace,
        from: TabPosition,
        tab: Tab,
        target: TabPosition,
    ) -> Result<DropOutcome, WorkspaceError> {
        if from.pane == target.pane {
            let dest = workspace.reorder_tab(from.pane, from.index, target.index)?;
            if dest == from.index {
                return Ok(DropOutcome::skipped(SkipReason::SamePosition));
            }
            return Ok(DropOutcome::Reordered {
                pane: from.pane,
                from: from.index,
                to: dest,
            });
        }

        let existing = workspace
            .tabs(target.pane)
            .and_then(|model| model.position(&tab.path));
        workspace.remove_tab(from.pane, from.index)?;
        let (to, merged) = match existing {
            Some(index) => {
                workspace.activate_tab(target.pane, &tab.path)?;
                (index, true)
            }
            None => (workspace.insert_tab(target.pane, target.index, tab)?, false),
        };
        let closed_pane = self.close_if_empty(workspace, from.pane)?;
        Ok(DropOutcome::Moved {
            from,
            to: TabPosition::new(target.pane, to),
            merged,
            closed_pane,
        })
    }

    fn apply_split(
        &self,
        workspace: &mut Workspace,
        from: TabPosition,
        tab: Tab,
        target: TabPosition,
        orientation: SplitOrientation,
    ) -> Result<DropOutcome, WorkspaceError> {
        let source_len = workspace.tabs(from.pane).map_or(0, |model| model.len());
        if from.pane == target.pane && source_len <= 1 {
            return Ok(DropOutcome::skipped(SkipReason::NothingToSplit));
        }
        let new_pane =
            workspace.split_pane(target.pane, orientation, PanePlacement::ExistingFirst)?;
        workspace.remove_tab(from.pane, from.index)?;
        workspace.insert_tab(new_pane, 0, tab)?;
        let closed_pane = self.close_if_empty(workspace, from.pane)?;
        Ok(DropOutcome::Split {
            from,
            new_pane,
            orientation,
            closed_pane,
        })
    }

    fn close_if_empty(
        &self,
        workspace: &mut Workspace,
        pane: PaneId,
    ) -> Result<Option<PaneId>, WorkspaceError> {
        let empty = workspace.tabs(pane).is_some_and(|model| model.is_empty());
        if !self.policy.close_empty_panes || !empty || workspace.panes().len() <= 1 {
            return Ok(None);
        }
        workspace.close_pane(pane)?;
        Ok(Some(pane))
    }
}

fn apply_copy(
    workspace: &mut Workspace,
    from: TabPosition,
    tab: &Tab,
    target: TabPosition,
) -> Result<DropOutcome, WorkspaceError> {
    if from.pane == target.pane {
        return Ok(DropOutcome::skipped(SkipReason::CopyOntoSelf));
    }
    if workspace
        .tabs(target.pane)
        .is_some_and(|model| model.contains(&tab.path))
    {
        return Ok(DropOutcome::skipped(SkipReason::AlreadyOpen));
    }
    let to = workspace.insert_tab(target.pane, target.index, Tab::new(tab.path.clone()))?;
    Ok(DropOutcome::Copied {
        from,
        to: TabPosition::new(target.pane, to),
    })
}

/// Find the dragged tab, preferring the payload path over the index.
fn locate(workspace: &Workspace, source: &DropSource) -> Option<(TabPosition, Tab)> {
    let pane = source.position.pane;
    let model = workspace.tabs(pane)?;
    let index = match source.path.as_deref() {
        Some(path) if model.get(source.position.index).is_some_and(|tab| tab.path == path) => {
            source.position.index
        }
        Some(path) => model.position(path)?,
        None => source.position.index,
    };
    let tab = model.get(index)?.clone();
    Some((TabPosition::new(pane, index), tab))
}
