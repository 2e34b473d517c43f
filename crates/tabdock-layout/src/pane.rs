//! Editor pane split tree.
//!
//! Every editor surface is a leaf of a binary split tree. Leaves are
//! identified by stable [`PaneId`]s which are never reused inside one tree, so
//! a drag session that captured a pane id can always tell whether the pane it
//! refers to still exists.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tabdock_core::geometry::Rect;

/// Stable identifier for editor panes.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PaneId(u64);

impl PaneId {
    /// Lowest valid pane ID.
    pub const MIN: Self = Self(1);

    /// Create a new pane ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, PaneModelError> {
        if raw == 0 {
            return Err(PaneModelError::ZeroPaneId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, PaneModelError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(PaneModelError::PaneIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u64> for PaneId {
    type Error = PaneModelError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<PaneId> for u64 {
    fn from(id: PaneId) -> Self {
        id.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane-{}", self.0)
    }
}

/// Orientation of a split node.
///
/// `Horizontal` lays children out side by side (the split line is vertical);
/// `Vertical` stacks them top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitOrientation {
    Horizontal,
    Vertical,
}

/// Placement of an incoming pane relative to the pane being split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanePlacement {
    #[default]
    ExistingFirst,
    IncomingFirst,
}

impl PanePlacement {
    fn ordered<T>(self, existing: T, incoming: T) -> (T, T) {
        match self {
            Self::ExistingFirst => (existing, incoming),
            Self::IncomingFirst => (incoming, existing),
        }
    }
}

/// Ratio between split children, stored in reduced form.
///
/// Interpreted as weight pair `first:second` (not a direct fraction).
/// Example: `3:2` assigns `3 / (3 + 2)` of available space to the first child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RatioParts")]
pub struct PaneSplitRatio {
    numerator: u32,
    denominator: u32,
}

#[derive(Deserialize)]
struct RatioParts {
    numerator: u32,
    denominator: u32,
}

impl TryFrom<RatioParts> for PaneSplitRatio {
    type Error = PaneModelError;

    fn try_from(parts: RatioParts) -> Result<Self, Self::Error> {
        Self::new(parts.numerator, parts.denominator)
    }
}

impl PaneSplitRatio {
    /// Create and normalize a ratio.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, PaneModelError> {
        if numerator == 0 || denominator == 0 {
            return Err(PaneModelError::InvalidSplitRatio {
                numerator,
                denominator,
            });
        }
        let gcd = gcd_u32(numerator, denominator);
        Ok(Self {
            numerator: numerator / gcd,
            denominator: denominator / gcd,
        })
    }

    /// Numerator (always > 0).
    #[must_use]
    pub const fn numerator(self) -> u32 {
        self.numerator
    }

    /// Denominator (always > 0).
    #[must_use]
    pub const fn denominator(self) -> u32 {
        self.denominator
    }

    fn first_share(self, total: u32) -> u32 {
        let weight = u64::from(self.numerator) + u64::from(self.denominator);
        let share = u64::from(total) * u64::from(self.numerator) / weight;
        u32::try_from(share).unwrap_or(total)
    }
}

impl Default for PaneSplitRatio {
    fn default() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
        }
    }
}

/// One node of the split tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaneNode {
    Leaf {
        id: PaneId,
    },
    Split {
        orientation: SplitOrientation,
        #[serde(default)]
        ratio: PaneSplitRatio,
        first: Box<PaneNode>,
        second: Box<PaneNode>,
    },
}

impl PaneNode {
    #[must_use]
    pub const fn leaf(id: PaneId) -> Self {
        Self::Leaf { id }
    }

    fn is_leaf_with(&self, target: PaneId) -> bool {
        matches!(self, Self::Leaf { id } if *id == target)
    }

    fn collect_leaves(&self, out: &mut Vec<PaneId>) {
        match self {
            Self::Leaf { id } => out.push(*id),
            Self::Split { first, second, .. } => {
                first.collect_leaves(out);
                second.collect_leaves(out);
            }
        }
    }

    fn orientation_of(&self, target: PaneId) -> Option<SplitOrientation> {
        self.parent_split(target).map(|(orientation, _)| orientation)
    }

    fn parent_split(&self, target: PaneId) -> Option<(SplitOrientation, PaneSplitRatio)> {
        match self {
            Self::Leaf { .. } => None,
            Self::Split {
                orientation,
                ratio,
                first,
                second,
            } => {
                if first.is_leaf_with(target) || second.is_leaf_with(target) {
                    Some((*orientation, *ratio))
                } else {
                    first
                        .parent_split(target)
                        .or_else(|| second.parent_split(target))
                }
            }
        }
    }

    fn parent_ratio_mut(&mut self, target: PaneId) -> Option<&mut PaneSplitRatio> {
        match self {
            Self::Leaf { .. } => None,
            Self::Split {
                ratio,
                first,
                second,
                ..
            } => {
                if first.is_leaf_with(target) || second.is_leaf_with(target) {
                    Some(ratio)
                } else {
                    match first.parent_ratio_mut(target) {
                        Some(slot) => Some(slot),
                        None => second.parent_ratio_mut(target),
                    }
                }
            }
        }
    }

    fn layout_into(&self, area: Rect, out: &mut Vec<(PaneId, Rect)>) {
        match self {
            Self::Leaf { id } => out.push((*id, area)),
            Self::Split {
                orientation,
                ratio,
                first,
                second,
            } => {
                let (a, b) = match orientation {
                    SplitOrientation::Horizontal => {
                        let w = ratio.first_share(area.width);
                        (
                            Rect::new(area.x, area.y, w, area.height),
                            Rect::new(
                                area.x.saturating_add_unsigned(w),
                                area.y,
                                area.width - w,
                                area.height,
                            ),
                        )
                    }
                    SplitOrientation::Vertical => {
                        let h = ratio.first_share(area.height);
                        (
                            Rect::new(area.x, area.y, area.width, h),
                            Rect::new(
                                area.x,
                                area.y.saturating_add_unsigned(h),
                                area.width,
                                area.height - h,
                            ),
                        )
                    }
                };
                first.layout_into(a, out);
                second.layout_into(b, out);
            }
        }
    }
}

/// Binary split tree of editor panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneTree {
    root: PaneNode,
    next_id: PaneId,
}

impl Default for PaneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneTree {
    /// A tree holding a single pane with [`PaneId::MIN`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: PaneNode::leaf(PaneId::MIN),
            next_id: PaneId(2),
        }
    }

    /// Rebuild a tree from persisted parts, validating leaf uniqueness and
    /// the id allocator.
    pub fn from_parts(root: PaneNode, next_id: PaneId) -> Result<Self, PaneModelError> {
        let mut leaves = Vec::new();
        root.collect_leaves(&mut leaves);
        let mut seen = BTreeSet::new();
        for id in &leaves {
            if !seen.insert(*id) {
                return Err(PaneModelError::DuplicatePane { pane: *id });
            }
        }
        if let Some(max_existing) = seen.last().copied() {
            if next_id <= max_existing {
                return Err(PaneModelError::NextIdNotGreaterThanExisting {
                    next_id,
                    max_existing,
                });
            }
        }
        Ok(Self { root, next_id })
    }

    #[must_use]
    pub fn root(&self) -> &PaneNode {
        &self.root
    }

    /// The id the next split will allocate.
    #[must_use]
    pub const fn next_id(&self) -> PaneId {
        self.next_id
    }

    /// Pane ids in visual order (depth-first, first child before second).
    #[must_use]
    pub fn leaves(&self) -> Vec<PaneId> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    #[must_use]
    pub fn contains(&self, pane: PaneId) -> bool {
        self.leaves().contains(&pane)
    }

    /// Orientation of the split directly holding `pane`, if any.
    #[must_use]
    pub fn parent_orientation(&self, pane: PaneId) -> Option<SplitOrientation> {
        self.root.orientation_of(pane)
    }

    /// Split `target` evenly into two panes, returning the id of the new pane.
    pub fn split(
        &mut self,
        target: PaneId,
        orientation: SplitOrientation,
        placement: PanePlacement,
    ) -> Result<PaneId, PaneModelError> {
        self.split_with_ratio(target, orientation, placement, PaneSplitRatio::default())
    }

    /// Split `target` with `ratio` as the `first:second` weights.
    pub fn split_with_ratio(
        &mut self,
        target: PaneId,
        orientation: SplitOrientation,
        placement: PanePlacement,
        ratio: PaneSplitRatio,
    ) -> Result<PaneId, PaneModelError> {
        if !self.contains(target) {
            return Err(PaneModelError::UnknownPane { pane: target });
        }
        let incoming = self.next_id;
        let next_id = incoming.checked_next()?;
        let shape = SplitShape {
            orientation,
            placement,
            ratio,
        };
        let replaced = split_leaf(&mut self.root, target, incoming, shape);
        debug_assert!(replaced, "contains() guaranteed the leaf exists");
        self.next_id = next_id;
        Ok(incoming)
    }

    /// Ratio of the split directly holding `pane`.
    #[must_use]
    pub fn parent_ratio(&self, pane: PaneId) -> Option<PaneSplitRatio> {
        self.root.parent_split(pane).map(|(_, ratio)| ratio)
    }

    /// Re-weight the split directly holding `pane`. Returns the previous ratio.
    pub fn resize(
        &mut self,
        pane: PaneId,
        ratio: PaneSplitRatio,
    ) -> Result<PaneSplitRatio, PaneModelError> {
        if !self.contains(pane) {
            return Err(PaneModelError::UnknownPane { pane });
        }
        self.root
            .parent_ratio_mut(pane)
            .map(|slot| std::mem::replace(slot, ratio))
            .ok_or(PaneModelError::NotSplit { pane })
    }

    /// Remove `target`, promoting its sibling into the parent's slot.
    ///
    /// The last remaining pane can never be removed.
    pub fn remove(&mut self, target: PaneId) -> Result<(), PaneModelError> {
        if self.root.is_leaf_with(target) {
            return Err(PaneModelError::LastPane { pane: target });
        }
        if remove_leaf(&mut self.root, target) {
            Ok(())
        } else {
            Err(PaneModelError::UnknownPane { pane: target })
        }
    }

    /// Assign a rectangle to every pane inside `area`.
    #[must_use]
    pub fn layout(&self, area: Rect) -> Vec<(PaneId, Rect)> {
        let mut out = Vec::new();
        self.root.layout_into(area, &mut out);
        out
    }
}

#[derive(Clone, Copy)]
struct SplitShape {
    orientation: SplitOrientation,
    placement: PanePlacement,
    ratio: PaneSplitRatio,
}

fn split_leaf(node: &mut PaneNode, target: PaneId, incoming: PaneId, shape: SplitShape) -> bool {
    match node {
        PaneNode::Leaf { id } if *id == target => {
            let (first, second) = shape
                .placement
                .ordered(PaneNode::leaf(target), PaneNode::leaf(incoming));
            *node = PaneNode::Split {
                orientation: shape.orientation,
                ratio: shape.ratio,
                first: Box::new(first),
                second: Box::new(second),
            };
            true
        }
        PaneNode::Leaf { .. } => false,
        PaneNode::Split { first, second, .. } => {
            split_leaf(first, target, incoming, shape)
                || split_leaf(second, target, incoming, shape)
        }
    }
}

fn remove_leaf(node: &mut PaneNode, target: PaneId) -> bool {
    let PaneNode::Split { first, second, .. } = node else {
        return false;
    };
    let promoted = if first.is_leaf_with(target) {
        take_node(second)
    } else if second.is_leaf_with(target) {
        take_node(first)
    } else {
        return remove_leaf(first, target) || remove_leaf(second, target);
    };
    *node = promoted;
    true
}

fn take_node(slot: &mut PaneNode) -> PaneNode {
    std::mem::replace(slot, PaneNode::leaf(PaneId::MIN))
}

fn gcd_u32(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Pane tree construction and mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneModelError {
    ZeroPaneId,
    PaneIdOverflow {
        current: PaneId,
    },
    UnknownPane {
        pane: PaneId,
    },
    LastPane {
        pane: PaneId,
    },
    NotSplit {
        pane: PaneId,
    },
    DuplicatePane {
        pane: PaneId,
    },
    InvalidSplitRatio {
        numerator: u32,
        denominator: u32,
    },
    NextIdNotGreaterThanExisting {
        next_id: PaneId,
        max_existing: PaneId,
    },
}

impl fmt::Display for PaneModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPaneId => write!(f, "pane id 0 is reserved"),
            Self::PaneIdOverflow { current } => {
                write!(f, "pane id allocator overflowed after {current}")
            }
            Self::UnknownPane { pane } => write!(f, "{pane} does not exist"),
            Self::LastPane { pane } => write!(f, "cannot remove {pane}: it is the last pane"),
            Self::NotSplit { pane } => write!(f, "{pane} is not inside a split"),
            Self::DuplicatePane { pane } => write!(f, "{pane} appears more than once"),
            Self::InvalidSplitRatio {
                numerator,
                denominator,
            } => write!(
                f,
                "split ratio must be positive (got {numerator}:{denominator})"
            ),
            Self::NextIdNotGreaterThanExisting {
                next_id,
                max_existing,
            } => write!(
                f,
                "next id {next_id} must be greater than existing {max_existing}"
            ),
        }
    }
}

impl std::error::Error for PaneModelError {}
