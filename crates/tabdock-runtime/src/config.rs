#![forbid(unsafe_code)]

//! Policy-as-data configuration for tab drag and drop.
//!
//! Every knob the drag machinery exposes lives in one [`DragPolicyConfig`]
//! that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # tabdock.toml
//! [modifiers]
//! copy = "alt"
//! split = "shift"
//!
//! [preview]
//! opacity = 0.6
//!
//! [panes]
//! close_empty_panes = false
//! ```
//!
//! ```rust,ignore
//! let policy = DragPolicyConfig::from_toml_file("tabdock.toml")?;
//! let policy = DragPolicyConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `DragPolicyConfig::default()` reproduces the built-in behaviour: copy on
//! Ctrl or Meta, split on Shift, half-opacity preview and dimming, empty
//! panes closed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabdock_core::geometry::Rect;
use tabdock_layout::PaneId;
use tabdock_widgets::tab_strip::DEFAULT_TAB_WIDTH;
use tabdock_widgets::{DispatchPolicy, DragPreviewConfig, ModifierPolicy, TabStrip};

/// Top-level drag policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragPolicyConfig {
    /// Modifier chords selecting copy and split drops.
    pub modifiers: ModifierPolicy,

    /// Drag preview appearance.
    pub preview: DragPreviewConfig,

    /// Tab strip rendering.
    pub strip: StripPolicyConfig,

    /// Pane housekeeping after drops.
    pub panes: PanePolicyConfig,

    /// Transition log retention.
    pub trace: TracePolicyConfig,
}

impl DragPolicyConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.preview.opacity > 0.0 && self.preview.opacity <= 1.0) {
            errors.push(format!(
                "preview.opacity must be in (0, 1], got {}",
                self.preview.opacity
            ));
        }

        if !(self.strip.dimmed_opacity > 0.0 && self.strip.dimmed_opacity <= 1.0) {
            errors.push(format!(
                "strip.dimmed_opacity must be in (0, 1], got {}",
                self.strip.dimmed_opacity
            ));
        }

        if self.strip.tab_width == 0 {
            errors.push("strip.tab_width must be > 0".into());
        }

        if self.modifiers.copy == self.modifiers.split
            && self.modifiers.copy != tabdock_widgets::ModifierBinding::Disabled
        {
            errors.push(format!(
                "modifiers.copy and modifiers.split must differ, both are {:?}",
                self.modifiers.copy
            ));
        }

        if self.trace.capacity == 0 {
            errors.push("trace.capacity must be > 0".into());
        }

        errors
    }

    /// Validate, turning any problem into [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the dispatcher policy.
    #[must_use]
    pub const fn to_dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            modifiers: self.modifiers,
            close_empty_panes: self.panes.close_empty_panes,
        }
    }

    /// Build a tab strip for `pane` using this policy's appearance.
    #[must_use]
    pub fn tab_strip(&self, pane: PaneId, area: Rect) -> TabStrip {
        TabStrip::new(pane, area)
            .with_tab_width(self.strip.tab_width)
            .with_preview(self.preview)
            .with_dimmed_opacity(self.strip.dimmed_opacity)
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"drag-policy-v1","copy":"{:?}","split":"{:?}","preview_opacity":{},"dimmed_opacity":{},"close_empty_panes":{},"trace_capacity":{}}}"#,
            self.modifiers.copy,
            self.modifiers.split,
            self.preview.opacity,
            self.strip.dimmed_opacity,
            self.panes.close_empty_panes,
            self.trace.capacity,
        )
    }
}

/// Tab strip rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripPolicyConfig {
    /// Opacity of the dragged tab and the hovered tab. Default: 0.5.
    pub dimmed_opacity: f32,
    /// Tab width for the uniform layout. Default: 120.
    pub tab_width: u32,
}

impl Default for StripPolicyConfig {
    fn default() -> Self {
        Self {
            dimmed_opacity: 0.5,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Pane housekeeping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanePolicyConfig {
    /// Close panes emptied by a move or split. Default: true.
    pub close_empty_panes: bool,
}

impl Default for PanePolicyConfig {
    fn default() -> Self {
        Self {
            close_empty_panes: true,
        }
    }
}

/// Transition log parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracePolicyConfig {
    /// Entries kept in the store's transition log. Default: 256.
    pub capacity: usize,
}

impl Default for TracePolicyConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Errors that can occur when loading a drag policy.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tabdock_widgets::ModifierBinding;

    #[test]
    fn default_matches_component_defaults() {
        let policy = DragPolicyConfig::default();
        assert_eq!(policy.to_dispatch_policy(), DispatchPolicy::default());
        assert_eq!(policy.preview, DragPreviewConfig::default());
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn empty_toml_is_default() {
        let policy = DragPolicyConfig::from_toml_str("").expect("parse");
        assert_eq!(policy, DragPolicyConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let policy = DragPolicyConfig::from_toml_str(
            r#"
            [modifiers]
            copy = "alt"

            [preview]
            opacity = 0.8

            [panes]
            close_empty_panes = false
            "#,
        )
        .expect("parse");
        assert_eq!(policy.modifiers.copy, ModifierBinding::Alt);
        assert_eq!(policy.modifiers.split, ModifierBinding::Shift);
        assert!((policy.preview.opacity - 0.8).abs() < f32::EPSILON);
        assert_eq!(policy.preview.offset_x, 0);
        assert!(!policy.to_dispatch_policy().close_empty_panes);
        assert_eq!(policy.trace.capacity, 256);
    }

    #[test]
    fn json_round_trip() {
        let mut policy = DragPolicyConfig::default();
        policy.modifiers.split = ModifierBinding::Meta;
        policy.modifiers.copy = ModifierBinding::Ctrl;
        policy.strip.tab_width = 90;
        let json = serde_json::to_string(&policy).expect("serialize");
        let back = DragPolicyConfig::from_json_str(&json).expect("parse");
        assert_eq!(back, policy);
    }

    #[test]
    fn unknown_binding_is_a_parse_error() {
        let err = DragPolicyConfig::from_toml_str("[modifiers]\ncopy = \"hyper\"\n")
            .expect_err("unknown binding");
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut policy = DragPolicyConfig::default();
        policy.preview.opacity = 0.0;
        policy.strip.dimmed_opacity = 1.5;
        policy.strip.tab_width = 0;
        policy.modifiers.copy = ModifierBinding::Shift;
        policy.trace.capacity = 0;
        let errors = policy.validate();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].starts_with("preview.opacity"));

        let err = policy.validated().expect_err("invalid");
        assert!(matches!(err, ConfigError::Validation(ref list) if list.len() == 5));
    }

    #[test]
    fn both_bindings_disabled_is_valid() {
        let mut policy = DragPolicyConfig::default();
        policy.modifiers.copy = ModifierBinding::Disabled;
        policy.modifiers.split = ModifierBinding::Disabled;
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn load_from_files() {
        let mut toml_file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(toml_file, "[trace]\ncapacity = 8").expect("write");
        let policy = DragPolicyConfig::from_toml_file(toml_file.path()).expect("load toml");
        assert_eq!(policy.trace.capacity, 8);

        let mut json_file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(json_file, r#"{{"strip":{{"dimmed_opacity":0.25}}}}"#).expect("write");
        let policy = DragPolicyConfig::from_json_file(json_file.path()).expect("load json");
        assert!((policy.strip.dimmed_opacity - 0.25).abs() < f32::EPSILON);

        let missing = DragPolicyConfig::from_toml_file("/definitely/not/here.toml");
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn tab_strip_uses_policy() {
        let mut policy = DragPolicyConfig::default();
        policy.strip.tab_width = 80;
        let strip = policy.tab_strip(PaneId::MIN, Rect::new(0, 0, 400, 30));
        assert_eq!(strip.pane(), PaneId::MIN);
    }

    #[test]
    fn jsonl_is_valid_json() {
        let line = DragPolicyConfig::default().to_jsonl();
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["schema"], "drag-policy-v1");
        assert_eq!(value["trace_capacity"], 256);
        assert_eq!(value["copy"], "CtrlOrMeta");
    }
}
