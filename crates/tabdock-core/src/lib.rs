#![forbid(unsafe_code)]

//! Core: geometry and pointer input primitives shared by every tabdock layer.
//!
//! # Role in tabdock
//! `tabdock-core` is the input layer. Host adapters (a desktop toolkit, a web
//! view, a test harness) translate their native pointer and keyboard state into
//! the types defined here before handing them to the drag machinery in
//! `tabdock-widgets`.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Point`] and [`geometry::Rect`] with exact
//!   (integer, rounding-free) midpoint comparisons.
//! - **Pointer input**: [`event::Modifiers`] and [`event::PointerSnapshot`],
//!   the pointer state captured alongside each drag lifecycle event.

pub mod event;
pub mod geometry;

pub use event::{Modifiers, PointerSnapshot};
pub use geometry::{Point, Rect};
