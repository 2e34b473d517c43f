//! Drag session lifecycle machine.
//!
//! ```text
//! Idle --start--> Dragging { source, target: None }
//! Dragging --update_target--> Dragging { source, target: Some(..) }
//! any --end--> Idle
//! ```
//!
//! # Invariants
//!
//! 1. `source` is set exactly once per session and never changes.
//! 2. `end` always lands in `Idle`, whatever the state and whether a target
//!    was ever seen. No partial state survives it.
//! 3. `update_target` with the current target is a no-op: the state and the
//!    transition counter are left untouched, so pointer-move storms cannot
//!    produce observable churn.
//!
//! Ignored events are reported as [`DragSessionEffect::Noop`] rather than as
//! errors; a drag gesture has no failure path, only a path back to `Idle`.

use serde::{Deserialize, Serialize};
use tabdock_layout::PaneId;
use tracing::{debug, trace};

/// A tab boundary or tab position inside one pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabPosition {
    pub pane: PaneId,
    pub index: usize,
}

impl TabPosition {
    #[must_use]
    pub const fn new(pane: PaneId, index: usize) -> Self {
        Self { pane, index }
    }
}

/// Drag session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragSessionState {
    #[default]
    Idle,
    Dragging {
        source: TabPosition,
        target: Option<TabPosition>,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSessionNoopReason {
    AlreadyDragging,
    IdleWithoutActiveDrag,
    TargetUnchanged,
}

/// Effect emitted by one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragSessionEffect {
    Started {
        source: TabPosition,
    },
    TargetUpdated {
        previous: Option<TabPosition>,
        target: TabPosition,
    },
    Ended {
        source: TabPosition,
        target: Option<TabPosition>,
    },
    Noop {
        reason: DragSessionNoopReason,
    },
}

/// One lifecycle step.
///
/// `transition_id` counts state-changing steps only; a no-op repeats the id
/// of the last real transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSessionTransition {
    pub transition_id: u64,
    pub from: DragSessionState,
    pub to: DragSessionState,
    pub effect: DragSessionEffect,
}

impl DragSessionTransition {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self.effect, DragSessionEffect::Noop { .. })
    }
}

/// The single drag session shared by every tab strip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    state: DragSessionState,
    transition_counter: u64,
}

impl DragSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> DragSessionState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, DragSessionState::Dragging { .. })
    }

    #[must_use]
    pub const fn source(&self) -> Option<TabPosition> {
        match self.state {
            DragSessionState::Dragging { source, .. } => Some(source),
            DragSessionState::Idle => None,
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<TabPosition> {
        match self.state {
            DragSessionState::Dragging { target, .. } => target,
            DragSessionState::Idle => None,
        }
    }

    /// Number of state-changing transitions so far.
    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transition_counter
    }

    /// Begin a drag of the tab at `index` in `pane`. Ignored unless idle.
    pub fn start(&mut self, pane: PaneId, index: usize) -> DragSessionTransition {
        let source = TabPosition::new(pane, index);
        match self.state {
            DragSessionState::Idle => self.transition(
                DragSessionState::Dragging {
                    source,
                    target: None,
                },
                DragSessionEffect::Started { source },
            ),
            DragSessionState::Dragging { .. } => {
                self.noop(DragSessionNoopReason::AlreadyDragging)
            }
        }
    }

    /// Record the current candidate drop boundary. Ignored unless dragging.
    pub fn update_target(&mut self, pane: PaneId, index: usize) -> DragSessionTransition {
        let target = TabPosition::new(pane, index);
        match self.state {
            DragSessionState::Idle => self.noop(DragSessionNoopReason::IdleWithoutActiveDrag),
            DragSessionState::Dragging {
                target: Some(current),
                ..
            } if current == target => self.noop(DragSessionNoopReason::TargetUnchanged),
            DragSessionState::Dragging {
                source,
                target: previous,
            } => {
                trace!(pane = %pane, index, "drag target updated");
                self.transition(
                    DragSessionState::Dragging {
                        source,
                        target: Some(target),
                    },
                    DragSessionEffect::TargetUpdated { previous, target },
                )
            }
        }
    }

    /// End the session unconditionally.
    ///
    /// Safe to call any number of times: from `Idle` it is a no-op.
    pub fn end(&mut self) -> DragSessionTransition {
        match self.state {
            DragSessionState::Idle => self.noop(DragSessionNoopReason::IdleWithoutActiveDrag),
            DragSessionState::Dragging { source, target } => self.transition(
                DragSessionState::Idle,
                DragSessionEffect::Ended { source, target },
            ),
        }
    }

    fn transition(
        &mut self,
        to: DragSessionState,
        effect: DragSessionEffect,
    ) -> DragSessionTransition {
        let from = self.state;
        self.state = to;
        self.transition_counter = self.transition_counter.saturating_add(1);
        if !matches!(effect, DragSessionEffect::TargetUpdated { .. }) {
            debug!(transition_id = self.transition_counter, ?effect, "drag session transition");
        }
        DragSessionTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        }
    }

    fn noop(&self, reason: DragSessionNoopReason) -> DragSessionTransition {
        DragSessionTransition {
            transition_id: self.transition_counter,
            from: self.state,
            to: self.state,
            effect: DragSessionEffect::Noop { reason },
        }
    }
}
