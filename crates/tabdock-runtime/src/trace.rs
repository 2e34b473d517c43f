#![forbid(unsafe_code)]

//! Gesture trace recording and deterministic replay.
//!
//! A [`GestureTrace`] is an initial workspace snapshot plus the ordered store
//! actions applied on top of it. Replaying a trace rebuilds the store from the
//! snapshot and re-dispatches every action, so the same trace always yields
//! the same final workspace.
//!
//! # Format
//!
//! JSON lines, one [`TraceRecord`] per line tagged by `record`:
//! a `trace_header` first, then one `action` per dispatched action.
//!
//! ```text
//! {"record":"trace_header","schema_version":"gesture-trace-v1","session_name":"demo",...}
//! {"record":"action","seq":1,"action":{"action":"drag_start","pane":1,"index":0}}
//! ```

use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tabdock_layout::{LayoutLibrary, SnapshotError, WorkspaceSnapshot};
use tabdock_widgets::{DragSession, Store, TabAction};
use tracing::debug;

use crate::config::DragPolicyConfig;
use crate::store::EditorStore;

/// Current schema version for gesture trace files.
pub const SCHEMA_VERSION: &str = "gesture-trace-v1";

/// A single line of a gesture trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Header record (first line).
    #[serde(rename = "trace_header")]
    Header {
        schema_version: String,
        session_name: String,
        initial: WorkspaceSnapshot,
        #[serde(default)]
        layouts: LayoutLibrary,
        /// Drag in flight when recording began; idle for older traces.
        #[serde(default)]
        session: DragSession,
    },
    /// One dispatched action.
    Action { seq: u64, action: TabAction },
}

/// Recorded gesture session.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureTrace {
    session_name: String,
    initial: WorkspaceSnapshot,
    layouts: LayoutLibrary,
    session: DragSession,
    actions: Vec<TabAction>,
}

impl GestureTrace {
    #[must_use]
    pub fn new(
        session_name: impl Into<String>,
        initial: WorkspaceSnapshot,
        layouts: LayoutLibrary,
    ) -> Self {
        Self {
            session_name: session_name.into(),
            initial,
            layouts,
            session: DragSession::new(),
            actions: Vec::new(),
        }
    }

    /// Start replay from `session` instead of an idle drag.
    #[must_use]
    pub fn with_session(mut self, session: DragSession) -> Self {
        self.session = session;
        self
    }

    pub fn push(&mut self, action: TabAction) {
        self.actions.push(action);
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    #[must_use]
    pub const fn initial(&self) -> &WorkspaceSnapshot {
        &self.initial
    }

    #[must_use]
    pub const fn session(&self) -> &DragSession {
        &self.session
    }

    #[must_use]
    pub fn actions(&self) -> &[TabAction] {
        &self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Re-dispatch every action against a store rebuilt from the initial
    /// snapshot and return the final workspace.
    ///
    /// Rejected actions are rejected again, exactly as during recording.
    pub fn replay(&self, policy: &DragPolicyConfig) -> Result<WorkspaceSnapshot, TraceError> {
        let workspace = self.initial.restore().map_err(TraceError::Restore)?;
        let mut store = EditorStore::new(workspace, policy)
            .with_library(self.layouts.clone())
            .with_session(self.session.clone());
        let mut rejected = 0_usize;
        for action in &self.actions {
            if store.dispatch(action.clone()).is_err() {
                rejected += 1;
            }
        }
        debug!(
            session = %self.session_name,
            actions = self.actions.len(),
            rejected,
            "gesture trace replayed"
        );
        Ok(store.snapshot())
    }

    /// Header first, then one action record per dispatched action.
    fn records(&self) -> impl Iterator<Item = TraceRecord> + '_ {
        let header = TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_string(),
            session_name: self.session_name.clone(),
            initial: self.initial.clone(),
            layouts: self.layouts.clone(),
            session: self.session.clone(),
        };
        let actions = self.actions.iter().enumerate().map(|(i, action)| TraceRecord::Action {
            seq: i as u64 + 1,
            action: action.clone(),
        });
        std::iter::once(header).chain(actions)
    }

    /// Serialize as JSON lines.
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in self.records() {
            serde_json::to_writer(&mut writer, &record).map_err(io::Error::other)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    /// Serialize as JSON lines into a string.
    ///
    /// # Errors
    ///
    /// Fails only if a record does not serialize to JSON.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in self.records() {
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse JSON lines. Blank lines are skipped.
    pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Self, TraceError> {
        let mut trace: Option<Self> = None;
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(TraceError::Io)?;
            if line.trim().is_empty() {
                continue;
            }
            let record: TraceRecord = serde_json::from_str(&line).map_err(|source| {
                TraceError::Parse {
                    line: index + 1,
                    source,
                }
            })?;
            match record {
                TraceRecord::Header {
                    schema_version,
                    session_name,
                    initial,
                    layouts,
                    session,
                } => {
                    if trace.is_some() {
                        return Err(TraceError::UnexpectedHeader { line: index + 1 });
                    }
                    if schema_version != SCHEMA_VERSION {
                        return Err(TraceError::UnsupportedSchema {
                            found: schema_version,
                        });
                    }
                    trace = Some(Self::new(session_name, initial, layouts).with_session(session));
                }
                TraceRecord::Action { action, .. } => match trace.as_mut() {
                    Some(trace) => trace.push(action),
                    None => return Err(TraceError::MissingHeader),
                },
            }
        }
        trace.ok_or(TraceError::MissingHeader)
    }

    pub fn from_jsonl(s: &str) -> Result<Self, TraceError> {
        Self::read_jsonl(s.as_bytes())
    }

    /// Write to a `.jsonl` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let file = std::fs::File::create(path.as_ref()).map_err(TraceError::Io)?;
        self.write_jsonl(io::BufWriter::new(file))
            .map_err(TraceError::Io)
    }

    /// Read from a `.jsonl` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = std::fs::File::open(path.as_ref()).map_err(TraceError::Io)?;
        Self::read_jsonl(BufReader::new(file))
    }
}

/// Errors reading or replaying a gesture trace.
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    Parse { line: usize, source: serde_json::Error },
    MissingHeader,
    UnexpectedHeader { line: usize },
    UnsupportedSchema { found: String },
    Restore(SnapshotError),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { line, source } => write!(f, "line {line}: {source}"),
            Self::MissingHeader => f.write_str("trace has no header record"),
            Self::UnexpectedHeader { line } => write!(f, "line {line}: second header record"),
            Self::UnsupportedSchema { found } => write!(
                f,
                "unsupported trace schema '{found}' (expected '{SCHEMA_VERSION}')"
            ),
            Self::Restore(e) => write!(f, "initial snapshot does not restore: {e}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
            Self::Restore(e) => Some(e),
            Self::MissingHeader
            | Self::UnexpectedHeader { .. }
            | Self::UnsupportedSchema { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabdock_layout::{PaneId, Workspace};

    fn sample() -> GestureTrace {
        let mut ws = Workspace::new();
        ws.open_tab(PaneId::MIN, "/a.rs").expect("open");
        ws.open_tab(PaneId::MIN, "/b.rs").expect("open");
        let mut trace = GestureTrace::new(
            "sample",
            WorkspaceSnapshot::capture(&ws),
            LayoutLibrary::new(),
        );
        trace.push(TabAction::DragStart {
            pane: PaneId::MIN,
            index: 1,
        });
        trace.push(TabAction::DragOver {
            pane: PaneId::MIN,
            index: 0,
        });
        trace.push(TabAction::Drop {
            payload: None,
            target: None,
            pointer: tabdock_core::event::PointerSnapshot::at(1, 1),
            viewport: tabdock_core::geometry::Rect::new(0, 0, 100, 100),
        });
        trace.push(TabAction::DragEnd);
        trace
    }

    #[test]
    fn jsonl_round_trip() {
        let trace = sample();
        let text = trace.to_jsonl().expect("jsonl");
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with(r#"{"record":"trace_header""#));
        let back = GestureTrace::from_jsonl(&text).expect("parse");
        assert_eq!(back, trace);
    }

    #[test]
    fn string_and_writer_output_agree() {
        let trace = sample();
        let mut buf = Vec::new();
        trace.write_jsonl(&mut buf).expect("write");
        let written = String::from_utf8(buf).expect("utf8");
        assert_eq!(trace.to_jsonl().expect("jsonl"), written);
    }

    #[test]
    fn in_flight_session_survives_round_trip() {
        let mut session = DragSession::new();
        session.start(PaneId::MIN, 0);
        let trace = sample().with_session(session.clone());
        let back = GestureTrace::from_jsonl(&trace.to_jsonl().expect("jsonl")).expect("parse");
        assert_eq!(back.session(), &session);
        assert!(back.session().is_active());
    }

    #[test]
    fn header_without_session_starts_idle() {
        let text = sample().to_jsonl().expect("jsonl");
        let mut lines = text.lines();
        let mut header: serde_json::Value =
            serde_json::from_str(lines.next().expect("header")).expect("json");
        header
            .as_object_mut()
            .expect("object")
            .remove("session")
            .expect("session key");
        let rest: Vec<&str> = lines.collect();
        let legacy = format!("{header}\n{}\n", rest.join("\n"));
        let back = GestureTrace::from_jsonl(&legacy).expect("parse");
        assert!(!back.session().is_active());
        assert_eq!(back.actions(), sample().actions());
    }

    #[test]
    fn replay_is_deterministic() {
        let trace = sample();
        let policy = DragPolicyConfig::default();
        let first = trace.replay(&policy).expect("replay");
        let second = trace.replay(&policy).expect("replay");
        assert_eq!(first, second);
        let order: Vec<&str> = first.panes[0].tabs.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(order, ["/b.rs", "/a.rs"]);
    }

    #[test]
    fn missing_header_is_rejected() {
        let line = r#"{"record":"action","seq":1,"action":{"action":"drag_end"}}"#;
        assert!(matches!(
            GestureTrace::from_jsonl(line),
            Err(TraceError::MissingHeader)
        ));
        assert!(matches!(
            GestureTrace::from_jsonl("\n\n"),
            Err(TraceError::MissingHeader)
        ));
    }

    #[test]
    fn wrong_schema_is_rejected() {
        let text = sample()
            .to_jsonl()
            .expect("jsonl")
            .replacen(SCHEMA_VERSION, "gesture-trace-v0", 1);
        assert!(matches!(
            GestureTrace::from_jsonl(&text),
            Err(TraceError::UnsupportedSchema { found }) if found == "gesture-trace-v0"
        ));
    }

    #[test]
    fn garbage_line_reports_line_number() {
        let mut text = sample().to_jsonl().expect("jsonl");
        text.push_str("not json\n");
        let err = GestureTrace::from_jsonl(&text).expect_err("garbage");
        assert!(matches!(err, TraceError::Parse { line: 6, .. }));
        assert!(err.to_string().starts_with("line 6:"));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let text = sample().to_jsonl().expect("jsonl");
        let header = text.lines().next().expect("header").to_string();
        let doubled = format!("{text}{header}\n");
        assert!(matches!(
            GestureTrace::from_jsonl(&doubled),
            Err(TraceError::UnexpectedHeader { line: 6 })
        ));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("trace.jsonl");
        let trace = sample();
        trace.save(&path).expect("save");
        let loaded = GestureTrace::load(&path).expect("load");
        assert_eq!(loaded, trace);
    }
}
