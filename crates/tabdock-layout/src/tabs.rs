//! Per-pane ordered tab list.
//!
//! A [`TabModel`] owns the tabs of exactly one pane. Tabs are never shared
//! between panes: moving a tab removes it from one model and inserts an
//! equivalent [`Tab`] into another.
//!
//! # Invariants
//!
//! 1. No two tabs in one model share a path.
//! 2. `active`, when present, indexes an existing tab.
//! 3. The active tab stays active across reorders and unrelated removals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One open item in a pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tab {
    pub path: String,
    #[serde(default)]
    pub pinned: bool,
}

impl Tab {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pinned: false,
        }
    }

    #[must_use]
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Display title: the final path component.
    #[must_use]
    pub fn title(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.path)
    }
}

/// Ordered tab list of one pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabModel {
    tabs: Vec<Tab>,
    active: Option<usize>,
}

impl TabModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from persisted tabs, rejecting duplicate paths.
    ///
    /// `active` names the active tab by path; an unknown path leaves the
    /// model without an active tab.
    pub fn from_tabs(tabs: Vec<Tab>, active: Option<&str>) -> Result<Self, TabModelError> {
        for (i, tab) in tabs.iter().enumerate() {
            if tabs[..i].iter().any(|other| other.path == tab.path) {
                return Err(TabModelError::DuplicatePath {
                    path: tab.path.clone(),
                });
            }
        }
        let active = active.and_then(|path| tabs.iter().position(|t| t.path == path));
        Ok(Self { tabs, active })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(|tab| tab.path.as_str())
    }

    #[must_use]
    pub fn position(&self, path: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.path == path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> Option<&Tab> {
        self.active.and_then(|i| self.tabs.get(i))
    }

    /// Open `path`, activating the existing tab if it is already open.
    ///
    /// Returns the tab's index.
    pub fn open(&mut self, path: impl Into<String>) -> usize {
        let path = path.into();
        let index = match self.position(&path) {
            Some(existing) => existing,
            None => {
                self.tabs.push(Tab::new(path));
                self.tabs.len() - 1
            }
        };
        self.active = Some(index);
        index
    }

    /// Insert `tab` at boundary `index` (clamped to `[0, len]`).
    ///
    /// Does not change which tab is active.
    pub fn insert(&mut self, index: usize, tab: Tab) -> Result<usize, TabModelError> {
        if self.contains(&tab.path) {
            return Err(TabModelError::DuplicatePath { path: tab.path });
        }
        let index = index.min(self.tabs.len());
        self.tabs.insert(index, tab);
        if let Some(active) = self.active.as_mut() {
            if *active >= index {
                *active += 1;
            }
        }
        Ok(index)
    }

    /// Remove the tab at `index`.
    ///
    /// Removing the active tab activates its right neighbour (or the new last
    /// tab when it was last).
    pub fn remove(&mut self, index: usize) -> Result<Tab, TabModelError> {
        if index >= self.tabs.len() {
            return Err(TabModelError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }
        let tab = self.tabs.remove(index);
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Ok(tab)
    }

    /// Close the tab holding `path`, if open.
    pub fn close(&mut self, path: &str) -> Option<Tab> {
        let index = self.position(path)?;
        self.remove(index).ok()
    }

    /// Move the tab at `from` to boundary `to` as one atomic reorder.
    ///
    /// `to` is a boundary index in `[0, len]` measured before the removal, so
    /// dragging rightward lands at `to - 1`. Returns the final index.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<usize, TabModelError> {
        let len = self.tabs.len();
        if from >= len {
            return Err(TabModelError::IndexOutOfRange { index: from, len });
        }
        let to = to.min(len);
        let dest = if to > from { to - 1 } else { to };
        if dest == from {
            return Ok(from);
        }
        let tab = self.tabs.remove(from);
        self.tabs.insert(dest, tab);
        self.active = self.active.map(|active| shift_index(active, from, dest));
        Ok(dest)
    }

    /// Set the pinned flag on `path`. Returns whether the tab exists.
    pub fn set_pinned(&mut self, path: &str, pinned: bool) -> bool {
        match self.tabs.iter_mut().find(|tab| tab.path == path) {
            Some(tab) => {
                tab.pinned = pinned;
                true
            }
            None => false,
        }
    }

    /// Activate the tab holding `path`. Returns whether it exists.
    pub fn activate(&mut self, path: &str) -> bool {
        match self.position(path) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn activate_index(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active = Some(index);
        }
    }
}

/// Where index `i` ends up after moving the element at `from` to `dest`.
fn shift_index(i: usize, from: usize, dest: usize) -> usize {
    if i == from {
        dest
    } else if from < i && i <= dest {
        i - 1
    } else if dest <= i && i < from {
        i + 1
    } else {
        i
    }
}

/// Tab list errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabModelError {
    DuplicatePath { path: String },
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TabModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePath { path } => write!(f, "'{path}' is already open in this pane"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "tab index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for TabModelError {}
