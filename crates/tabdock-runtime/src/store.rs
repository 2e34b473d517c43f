#![forbid(unsafe_code)]

//! The application-side store: reducer, transition log and trace recording.
//!
//! [`EditorStore`] is the single writer of the drag session. It wraps the
//! widget-level [`TabState`] reducer, keeps a bounded log of what every action
//! did, and can record the actions it applies into a [`GestureTrace`] for
//! deterministic replay.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tabdock_layout::{LayoutLibrary, Workspace, WorkspaceSnapshot};
use tabdock_widgets::{ActionEffect, DragSession, Store, StoreError, TabAction, TabState};
use tracing::{debug, warn};

use crate::config::DragPolicyConfig;
use crate::trace::GestureTrace;

/// One entry of the transition log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Monotonic sequence number across the store's lifetime.
    pub seq: u64,
    pub action: TabAction,
    /// `None` when the action was rejected.
    pub effect: Option<ActionEffect>,
}

/// Editor store owning all tab and drag state.
#[derive(Debug, Clone)]
pub struct EditorStore {
    state: TabState,
    log: VecDeque<TransitionRecord>,
    capacity: usize,
    seq: u64,
    recording: Option<GestureTrace>,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(Workspace::new(), &DragPolicyConfig::default())
    }
}

impl EditorStore {
    #[must_use]
    pub fn new(workspace: Workspace, policy: &DragPolicyConfig) -> Self {
        Self {
            state: TabState::new(workspace, policy.to_dispatch_policy()),
            log: VecDeque::new(),
            capacity: policy.trace.capacity.max(1),
            seq: 0,
            recording: None,
        }
    }

    /// Seed the store with previously saved layouts.
    #[must_use]
    pub fn with_library(mut self, library: LayoutLibrary) -> Self {
        self.state = self.state.with_library(library);
        self
    }

    /// Seed the store with a drag session that is already under way.
    #[must_use]
    pub fn with_session(mut self, session: DragSession) -> Self {
        self.state = self.state.with_session(session);
        self
    }

    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        self.state.workspace()
    }

    /// Capture the current workspace.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot::capture(self.state.workspace())
    }

    /// Logged transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.log.iter()
    }

    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.log.len()
    }

    /// Start recording applied actions into a trace rooted at the current
    /// state, including a drag that is already in progress. Restarts any
    /// recording in progress.
    pub fn start_recording(&mut self, session_name: impl Into<String>) {
        let trace = GestureTrace::new(session_name, self.snapshot(), self.state.library().clone())
            .with_session(self.state.session().clone());
        self.recording = Some(trace);
    }

    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Stop recording and hand back the trace.
    pub fn stop_recording(&mut self) -> Option<GestureTrace> {
        self.recording.take()
    }

    fn push_log(&mut self, action: TabAction, effect: Option<ActionEffect>) {
        self.seq = self.seq.saturating_add(1);
        if self.log.len() == self.capacity {
            self.log.pop_front();
        }
        self.log.push_back(TransitionRecord {
            seq: self.seq,
            action,
            effect,
        });
    }
}

impl Store for EditorStore {
    fn dispatch(&mut self, action: TabAction) -> Result<ActionEffect, StoreError> {
        if let Some(trace) = &mut self.recording {
            trace.push(action.clone());
        }
        let result = self.state.reduce(action.clone());
        match &result {
            Ok(effect) => {
                if effect.changed_workspace() {
                    debug!(
                        layout_version = self.state.workspace().layout_version(),
                        "workspace changed"
                    );
                }
                self.push_log(action, Some(*effect));
            }
            Err(error) => {
                warn!(%error, "store action rejected");
                self.push_log(action, None);
            }
        }
        result
    }

    fn state(&self) -> &TabState {
        &self.state
    }
}
