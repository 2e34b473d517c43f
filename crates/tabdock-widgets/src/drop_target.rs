#![forbid(unsafe_code)]

//! Insertion-boundary resolution for a tab strip.
//!
//! A strip with `n` tabs has `n + 1` boundaries. The pointer selects the
//! boundary after every tab whose horizontal midpoint it has reached:
//!
//! ```text
//!   | tab 0 | tab 1 | tab 2 |
//!   0   ^   1   ^   2   ^   3     ^ = midpoints
//! ```
//!
//! A pointer exactly on a midpoint counts as having reached it, so a
//! stationary pointer always maps to the same boundary. Midpoints are compared
//! doubled, which keeps odd widths exact.

use serde::{Deserialize, Serialize};
use tabdock_core::geometry::{Point, Rect};
use tracing::trace;

/// Resolved insertion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropSlot {
    /// Boundary index in `[0, n]`.
    pub index: usize,
    /// The boundary is the explicit end-of-strip position `n`.
    pub at_end: bool,
}

impl DropSlot {
    #[must_use]
    pub const fn new(index: usize, tab_count: usize) -> Self {
        Self {
            index,
            at_end: index >= tab_count,
        }
    }
}

/// Stateless resolver from pointer geometry to a [`DropSlot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DropTargetResolver;

impl DropTargetResolver {
    /// Resolve the boundary under `pointer` for tabs laid out left to right.
    ///
    /// Returns `None` when another strip is on top of this one at the pointer;
    /// only the topmost strip may claim a drop.
    #[must_use]
    pub fn resolve(pointer: Point, tab_bounds: &[Rect], topmost: bool) -> Option<DropSlot> {
        if !topmost {
            return None;
        }
        let index = Self::boundary_index(pointer.x, tab_bounds);
        let slot = DropSlot::new(index, tab_bounds.len());
        trace!(x = pointer.x, index, at_end = slot.at_end, "resolved drop boundary");
        Some(slot)
    }

    /// Number of tabs whose midpoint lies at or left of `x`.
    ///
    /// Zero tabs always yield `0`.
    #[must_use]
    pub fn boundary_index(x: i32, tab_bounds: &[Rect]) -> usize {
        tab_bounds.partition_point(|rect| !rect.is_left_of_center(x))
    }
}
