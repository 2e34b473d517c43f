#![forbid(unsafe_code)]

//! Pointer input captured with drag lifecycle events.
//!
//! Host adapters fill a [`PointerSnapshot`] for every drag event they forward.
//! Modifier state is sampled at the moment of the event; the drop decision
//! only ever looks at the snapshot taken at release.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Command/Super key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Either Control or Meta is held.
    #[must_use]
    pub const fn ctrl_or_meta(self) -> bool {
        self.intersects(Self::CTRL.union(Self::META))
    }
}

/// Pointer position plus held modifiers for one drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerSnapshot {
    pub position: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerSnapshot {
    #[must_use]
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a snapshot with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_modifiers_are_empty() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(PointerSnapshot::default().modifiers.is_empty());
    }

    #[test]
    fn ctrl_or_meta() {
        assert!(Modifiers::CTRL.ctrl_or_meta());
        assert!(Modifiers::META.ctrl_or_meta());
        assert!((Modifiers::SHIFT | Modifiers::META).ctrl_or_meta());
        assert!(!Modifiers::SHIFT.ctrl_or_meta());
        assert!(!Modifiers::ALT.ctrl_or_meta());
    }

    #[test]
    fn snapshot_builder() {
        let snap = PointerSnapshot::at(4, 9).with_modifiers(Modifiers::SHIFT);
        assert_eq!(snap.position, Point::new(4, 9));
        assert_eq!(snap.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let snap = PointerSnapshot::at(-3, 12).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        let json = serde_json::to_string(&snap).expect("serialize");
        let back: PointerSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snap);
    }

    #[test]
    fn snapshot_modifiers_default_when_missing() {
        let snap: PointerSnapshot =
            serde_json::from_str(r#"{"position":{"x":1,"y":2}}"#).expect("deserialize");
        assert_eq!(snap, PointerSnapshot::at(1, 2));
    }
}
