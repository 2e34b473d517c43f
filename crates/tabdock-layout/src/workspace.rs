//! Editor workspace: the pane tree plus the tab list of every pane.
//!
//! [`Workspace`] is the keyed state container the store reduces over. All
//! mutations go through it so that the pane tree and the tab lists can never
//! disagree about which panes exist, and so that `layout_version` advances on
//! every observable change.

use std::collections::BTreeMap;
use std::fmt;

use tabdock_core::geometry::Rect;

use crate::pane::{
    PaneId, PaneModelError, PanePlacement, PaneSplitRatio, PaneTree, SplitOrientation,
};
use crate::tabs::{Tab, TabModel, TabModelError};

/// Panes, their tabs, and focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    tree: PaneTree,
    tabs: BTreeMap<PaneId, TabModel>,
    focused: PaneId,
    layout_version: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// A workspace with one empty pane.
    #[must_use]
    pub fn new() -> Self {
        let tree = PaneTree::new();
        let mut tabs = BTreeMap::new();
        tabs.insert(PaneId::MIN, TabModel::new());
        Self {
            tree,
            tabs,
            focused: PaneId::MIN,
            layout_version: 0,
        }
    }

    /// Assemble a workspace from persisted parts and validate it.
    pub fn from_parts(
        tree: PaneTree,
        tabs: BTreeMap<PaneId, TabModel>,
        focused: PaneId,
        layout_version: u64,
    ) -> Result<Self, WorkspaceError> {
        let workspace = Self {
            tree,
            tabs,
            focused,
            layout_version,
        };
        workspace.validate()?;
        Ok(workspace)
    }

    /// Check that tab lists exist for exactly the panes of the tree and that
    /// focus names a live pane.
    pub fn validate(&self) -> Result<(), WorkspaceError> {
        let leaves = self.tree.leaves();
        for pane in &leaves {
            if !self.tabs.contains_key(pane) {
                return Err(WorkspaceError::MissingTabList { pane: *pane });
            }
        }
        for pane in self.tabs.keys() {
            if !leaves.contains(pane) {
                return Err(WorkspaceError::OrphanTabList { pane: *pane });
            }
        }
        if !leaves.contains(&self.focused) {
            return Err(WorkspaceError::UnknownPane {
                pane: self.focused,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn tree(&self) -> &PaneTree {
        &self.tree
    }

    /// Pane ids in visual order.
    #[must_use]
    pub fn panes(&self) -> Vec<PaneId> {
        self.tree.leaves()
    }

    #[must_use]
    pub fn contains_pane(&self, pane: PaneId) -> bool {
        self.tabs.contains_key(&pane)
    }

    #[must_use]
    pub fn tabs(&self, pane: PaneId) -> Option<&TabModel> {
        self.tabs.get(&pane)
    }

    /// Look up one tab by pane and index.
    #[must_use]
    pub fn tab(&self, pane: PaneId, index: usize) -> Option<&Tab> {
        self.tabs.get(&pane).and_then(|model| model.get(index))
    }

    #[must_use]
    pub const fn focused(&self) -> PaneId {
        self.focused
    }

    /// Monotonic counter bumped by every successful mutation.
    #[must_use]
    pub const fn layout_version(&self) -> u64 {
        self.layout_version
    }

    /// Assign a rectangle to every pane inside `area`.
    #[must_use]
    pub fn layout(&self, area: Rect) -> Vec<(PaneId, Rect)> {
        self.tree.layout(area)
    }

    /// Open `path` in `pane`, activating it. Existing tabs are not duplicated.
    pub fn open_tab(
        &mut self,
        pane: PaneId,
        path: impl Into<String>,
    ) -> Result<usize, WorkspaceError> {
        let model = self.model_mut(pane)?;
        let before = (model.len(), model.active_index());
        let index = model.open(path);
        let changed = before != (model.len(), model.active_index());
        if changed {
            self.bump();
        }
        Ok(index)
    }

    /// Close `path` in `pane`. Returns the closed tab if it was open.
    pub fn close_tab(
        &mut self,
        pane: PaneId,
        path: &str,
    ) -> Result<Option<Tab>, WorkspaceError> {
        let closed = self.model_mut(pane)?.close(path);
        if closed.is_some() {
            self.bump();
        }
        Ok(closed)
    }

    /// Activate `path` in `pane` and focus the pane.
    pub fn activate_tab(&mut self, pane: PaneId, path: &str) -> Result<bool, WorkspaceError> {
        let found = self.model_mut(pane)?.activate(path);
        if found {
            self.focused = pane;
            self.bump();
        }
        Ok(found)
    }

    pub fn set_pinned(
        &mut self,
        pane: PaneId,
        path: &str,
        pinned: bool,
    ) -> Result<bool, WorkspaceError> {
        let found = self.model_mut(pane)?.set_pinned(path, pinned);
        if found {
            self.bump();
        }
        Ok(found)
    }

    /// Insert `tab` at boundary `index`, activate it and focus the pane.
    pub fn insert_tab(
        &mut self,
        pane: PaneId,
        index: usize,
        tab: Tab,
    ) -> Result<usize, WorkspaceError> {
        let model = self.model_mut(pane)?;
        let index = model
            .insert(index, tab)
            .map_err(|source| WorkspaceError::Tab { pane, source })?;
        model.activate_index(index);
        self.focused = pane;
        self.bump();
        Ok(index)
    }

    /// Remove and return the tab at `index` of `pane`.
    pub fn remove_tab(&mut self, pane: PaneId, index: usize) -> Result<Tab, WorkspaceError> {
        let tab = self
            .model_mut(pane)?
            .remove(index)
            .map_err(|source| WorkspaceError::Tab { pane, source })?;
        self.bump();
        Ok(tab)
    }

    /// Atomic in-pane reorder; see [`TabModel::reorder`].
    pub fn reorder_tab(
        &mut self,
        pane: PaneId,
        from: usize,
        to: usize,
    ) -> Result<usize, WorkspaceError> {
        let model = self.model_mut(pane)?;
        let dest = model
            .reorder(from, to)
            .map_err(|source| WorkspaceError::Tab { pane, source })?;
        if dest != from {
            model.activate_index(dest);
            self.bump();
        }
        Ok(dest)
    }

    /// Split `pane`, creating a new empty pane next to it.
    pub fn split_pane(
        &mut self,
        pane: PaneId,
        orientation: SplitOrientation,
        placement: PanePlacement,
    ) -> Result<PaneId, WorkspaceError> {
        self.split_pane_with_ratio(pane, orientation, placement, PaneSplitRatio::default())
    }

    /// Split `pane` with `ratio` as the `first:second` weights.
    pub fn split_pane_with_ratio(
        &mut self,
        pane: PaneId,
        orientation: SplitOrientation,
        placement: PanePlacement,
        ratio: PaneSplitRatio,
    ) -> Result<PaneId, WorkspaceError> {
        let created = self
            .tree
            .split_with_ratio(pane, orientation, placement, ratio)?;
        self.tabs.insert(created, TabModel::new());
        self.bump();
        Ok(created)
    }

    /// Re-weight the split directly holding `pane`.
    pub fn resize_split(
        &mut self,
        pane: PaneId,
        ratio: PaneSplitRatio,
    ) -> Result<(), WorkspaceError> {
        if !self.contains_pane(pane) {
            return Err(WorkspaceError::UnknownPane { pane });
        }
        if self.tree.resize(pane, ratio)? != ratio {
            self.bump();
        }
        Ok(())
    }

    /// Close `pane` and drop its tabs. The last pane cannot be closed.
    ///
    /// Focus moves to the first remaining pane when the closed pane had it.
    pub fn close_pane(&mut self, pane: PaneId) -> Result<TabModel, WorkspaceError> {
        self.tree.remove(pane)?;
        let model = self.tabs.remove(&pane).unwrap_or_default();
        if self.focused == pane {
            self.focused = self.tree.leaves().first().copied().unwrap_or(PaneId::MIN);
        }
        self.bump();
        Ok(model)
    }

    pub fn focus_pane(&mut self, pane: PaneId) -> Result<(), WorkspaceError> {
        if !self.contains_pane(pane) {
            return Err(WorkspaceError::UnknownPane { pane });
        }
        if self.focused != pane {
            self.focused = pane;
            self.bump();
        }
        Ok(())
    }

    /// Force `layout_version` forward, e.g. after restoring a saved layout.
    pub fn advance_version_past(&mut self, floor: u64) {
        self.layout_version = self.layout_version.max(floor).saturating_add(1);
    }

    pub(crate) fn tab_models(&self) -> &BTreeMap<PaneId, TabModel> {
        &self.tabs
    }

    fn model_mut(&mut self, pane: PaneId) -> Result<&mut TabModel, WorkspaceError> {
        self.tabs
            .get_mut(&pane)
            .ok_or(WorkspaceError::UnknownPane { pane })
    }

    fn bump(&mut self) {
        self.layout_version = self.layout_version.saturating_add(1);
    }
}

/// Workspace mutation and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    UnknownPane { pane: PaneId },
    MissingTabList { pane: PaneId },
    OrphanTabList { pane: PaneId },
    Pane(PaneModelError),
    Tab { pane: PaneId, source: TabModelError },
}

impl From<PaneModelError> for WorkspaceError {
    fn from(error: PaneModelError) -> Self {
        Self::Pane(error)
    }
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPane { pane } => write!(f, "{pane} does not exist"),
            Self::MissingTabList { pane } => write!(f, "{pane} has no tab list"),
            Self::OrphanTabList { pane } => write!(f, "tab list for {pane} has no pane"),
            Self::Pane(error) => write!(f, "pane tree: {error}"),
            Self::Tab { pane, source } => write!(f, "{pane}: {source}"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pane(error) => Some(error),
            Self::Tab { source, .. } => Some(source),
            _ => None,
        }
    }
}
