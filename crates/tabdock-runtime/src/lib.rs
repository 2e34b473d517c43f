#![forbid(unsafe_code)]

//! Runtime: the editor store, drag policy configuration and gesture traces.
//!
//! # Role in tabdock
//! `tabdock-runtime` is where an application wires the pieces together. It
//! loads a [`DragPolicyConfig`], owns the single [`EditorStore`] that every
//! tab strip dispatches into, and can record the actions it applies as a
//! [`GestureTrace`] that replays to the same workspace.
//!
//! # Key components
//! - [`DragPolicyConfig`]: TOML/JSON policy for modifiers, preview and panes.
//! - [`EditorStore`]: reducer plus bounded transition log.
//! - [`GestureTrace`]: JSONL record/replay of store actions.

pub mod config;
pub mod store;
pub mod trace;

pub use config::{
    ConfigError, DragPolicyConfig, PanePolicyConfig, StripPolicyConfig, TracePolicyConfig,
};
pub use store::{EditorStore, TransitionRecord};
pub use trace::{GestureTrace, SCHEMA_VERSION as TRACE_SCHEMA_VERSION, TraceError, TraceRecord};
