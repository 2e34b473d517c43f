//! Persisted workspace schema and the named layout library.
//!
//! A [`WorkspaceSnapshot`] captures the pane tree, every pane's tab list and
//! focus. Snapshots are plain serde data; encoding to a concrete format is the
//! caller's concern.
//!
//! # Schema Versioning Policy
//!
//! - **Additive fields** may be carried in `extensions` without a version bump.
//! - **Breaking changes** require incrementing [`WORKSPACE_SCHEMA_VERSION`].
//! - Loaders reject unknown versions with [`SnapshotError::UnsupportedVersion`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pane::{PaneId, PaneNode, PaneTree};
use crate::tabs::{Tab, TabModel};
use crate::workspace::{Workspace, WorkspaceError};

/// Current workspace schema version.
pub const WORKSPACE_SCHEMA_VERSION: u16 = 1;

/// Tabs of one pane as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneTabsRecord {
    pub pane: PaneId,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active: Option<String>,
}

/// Persisted workspace state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub root: PaneNode,
    pub next_id: PaneId,
    pub panes: Vec<PaneTabsRecord>,
    pub focused: PaneId,
    #[serde(default)]
    pub layout_version: u64,
    /// Forward-compatible extension bag.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

fn default_schema_version() -> u16 {
    WORKSPACE_SCHEMA_VERSION
}

impl WorkspaceSnapshot {
    /// Capture `workspace`.
    #[must_use]
    pub fn capture(workspace: &Workspace) -> Self {
        let panes = workspace
            .tab_models()
            .iter()
            .map(|(pane, model)| PaneTabsRecord {
                pane: *pane,
                tabs: model.tabs().to_vec(),
                active: model.active().map(|tab| tab.path.clone()),
            })
            .collect();
        Self {
            schema_version: WORKSPACE_SCHEMA_VERSION,
            root: workspace.tree().root().clone(),
            next_id: workspace.tree().next_id(),
            panes,
            focused: workspace.focused(),
            layout_version: workspace.layout_version(),
            extensions: BTreeMap::new(),
        }
    }

    /// Rebuild a validated workspace from this snapshot.
    pub fn restore(&self) -> Result<Workspace, SnapshotError> {
        if self.schema_version != WORKSPACE_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
                expected: WORKSPACE_SCHEMA_VERSION,
            });
        }
        let tree = PaneTree::from_parts(self.root.clone(), self.next_id)
            .map_err(|error| SnapshotError::Invalid(WorkspaceError::Pane(error)))?;
        let mut tabs = BTreeMap::new();
        for record in &self.panes {
            let model = TabModel::from_tabs(record.tabs.clone(), record.active.as_deref())
                .map_err(|source| {
                    SnapshotError::Invalid(WorkspaceError::Tab {
                        pane: record.pane,
                        source,
                    })
                })?;
            if tabs.insert(record.pane, model).is_some() {
                return Err(SnapshotError::DuplicatePaneRecord { pane: record.pane });
            }
        }
        Workspace::from_parts(tree, tabs, self.focused, self.layout_version)
            .map_err(SnapshotError::Invalid)
    }
}

/// Named saved layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutLibrary {
    #[serde(default)]
    layouts: BTreeMap<String, WorkspaceSnapshot>,
}

impl LayoutLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `workspace` under `name`, replacing any previous entry.
    pub fn save(&mut self, name: impl Into<String>, workspace: &Workspace) {
        self.layouts
            .insert(name.into(), WorkspaceSnapshot::capture(workspace));
    }

    /// Restore the layout saved under `name`.
    ///
    /// The restored workspace's `layout_version` is moved past both the
    /// saved and the current version so observers always see a change.
    pub fn load(&self, name: &str, current: &Workspace) -> Result<Workspace, SnapshotError> {
        let snapshot = self
            .layouts
            .get(name)
            .ok_or_else(|| SnapshotError::UnknownLayout {
                name: name.to_string(),
            })?;
        let mut restored = snapshot.restore()?;
        restored.advance_version_past(current.layout_version());
        Ok(restored)
    }

    pub fn remove(&mut self, name: &str) -> Option<WorkspaceSnapshot> {
        self.layouts.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Snapshot restore errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    UnsupportedVersion { found: u16, expected: u16 },
    DuplicatePaneRecord { pane: PaneId },
    UnknownLayout { name: String },
    Invalid(WorkspaceError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported workspace schema version {found} (expected {expected})"
            ),
            Self::DuplicatePaneRecord { pane } => {
                write!(f, "{pane} has more than one tab record")
            }
            Self::UnknownLayout { name } => write!(f, "no saved layout named '{name}'"),
            Self::Invalid(error) => write!(f, "invalid workspace: {error}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Invalid(error) = self {
            return Some(error);
        }
        None
    }
}
