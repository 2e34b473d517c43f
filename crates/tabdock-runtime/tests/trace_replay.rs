//! Record gestures through tab strips, persist the trace, replay it.

use proptest::prelude::*;
use tabdock_core::event::{Modifiers, PointerSnapshot};
use tabdock_core::geometry::{Point, Rect};
use tabdock_layout::{PaneId, PaneSplitRatio, SplitOrientation, Workspace};
use tabdock_runtime::{DragPolicyConfig, EditorStore, GestureTrace};
use tabdock_widgets::{MemoryDataTransfer, Store, TabAction};

const VIEWPORT: Rect = Rect::new(0, 0, 800, 600);

fn store_with(paths: &[&str]) -> EditorStore {
    let mut ws = Workspace::new();
    for path in paths {
        ws.open_tab(PaneId::MIN, *path).expect("open");
    }
    EditorStore::new(ws, &DragPolicyConfig::default())
}

fn paths(store: &EditorStore, pane: PaneId) -> Vec<String> {
    store
        .workspace()
        .tabs(pane)
        .map(|m| m.paths().map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn recorded_session_replays_to_live_state() {
    let policy = DragPolicyConfig::default();
    let mut store = store_with(&["/a.rs", "/b.rs", "/c.rs"]);
    store.start_recording("strip-session");

    let top = policy.tab_strip(PaneId::MIN, Rect::new(0, 0, 400, 30));
    let mut transfer = MemoryDataTransfer::new();

    // Reorder the first tab past the second.
    top.on_drag_start(&mut store, &mut transfer, 0).expect("start");
    top.on_drag_over(&mut store, &mut transfer, Point::new(160, 10), true)
        .expect("over");
    top.on_drop(&mut store, &transfer, PointerSnapshot::at(160, 10), VIEWPORT, true)
        .expect("drop");
    assert_ne!(paths(&store, PaneId::MIN)[0], "/a.rs");

    // Split, then copy a tab into the new pane with Ctrl held.
    store
        .dispatch(TabAction::SplitPane {
            pane: PaneId::MIN,
            orientation: SplitOrientation::Vertical,
            ratio: PaneSplitRatio::new(2, 1).expect("ratio"),
        })
        .expect("split");
    let second = store.workspace().panes()[1];
    let bottom = policy.tab_strip(second, Rect::new(0, 300, 400, 30));
    transfer.clear();
    top.on_drag_start(&mut store, &mut transfer, 1).expect("start");
    bottom
        .on_drag_over(&mut store, &mut transfer, Point::new(10, 310), true)
        .expect("over");
    bottom
        .on_drop(
            &mut store,
            &transfer,
            PointerSnapshot::at(10, 310).with_modifiers(Modifiers::CTRL),
            VIEWPORT,
            true,
        )
        .expect("drop");
    assert_eq!(paths(&store, second).len(), 1);
    assert_eq!(paths(&store, PaneId::MIN).len(), 3);

    // A drag that is abandoned changes nothing.
    top.on_drag_start(&mut store, &mut transfer, 2).expect("start");
    top.on_drag_end(&mut store).expect("end");

    let live = store.snapshot();
    let trace = store.stop_recording().expect("recording");
    assert!(!trace.is_empty());

    let text = trace.to_jsonl().expect("jsonl");
    let parsed = GestureTrace::from_jsonl(&text).expect("parse");
    assert_eq!(parsed, trace);

    let replayed = parsed.replay(&policy).expect("replay");
    assert_eq!(replayed.panes, live.panes);
    assert_eq!(replayed.root, live.root);
    assert_eq!(replayed.focused, live.focused);
}

#[test]
fn trace_file_survives_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.jsonl");

    let mut store = store_with(&["/a.rs", "/b.rs"]);
    store.start_recording("file");
    store
        .dispatch(TabAction::DragStart {
            pane: PaneId::MIN,
            index: 1,
        })
        .expect("start");
    store
        .dispatch(TabAction::DragOver {
            pane: PaneId::MIN,
            index: 0,
        })
        .expect("over");
    store
        .dispatch(TabAction::Drop {
            payload: None,
            target: None,
            pointer: PointerSnapshot::at(5, 5),
            viewport: VIEWPORT,
        })
        .expect("drop");
    let trace = store.stop_recording().expect("recording");
    trace.save(&path).expect("save");

    let loaded = GestureTrace::load(&path).expect("load");
    let replayed = loaded
        .replay(&DragPolicyConfig::default())
        .expect("replay");
    assert_eq!(replayed.panes, store.snapshot().panes);
    assert_eq!(paths(&store, PaneId::MIN), ["/b.rs", "/a.rs"]);
}

#[test]
fn recording_started_mid_drag_replays_the_drag() {
    let mut store = store_with(&["/a.rs", "/b.rs", "/c.rs"]);
    store
        .dispatch(TabAction::DragStart {
            pane: PaneId::MIN,
            index: 0,
        })
        .expect("start");
    store.start_recording("mid-drag");
    store
        .dispatch(TabAction::DragOver {
            pane: PaneId::MIN,
            index: 3,
        })
        .expect("over");
    store
        .dispatch(TabAction::Drop {
            payload: None,
            target: None,
            pointer: PointerSnapshot::at(5, 5),
            viewport: VIEWPORT,
        })
        .expect("drop");
    assert_eq!(paths(&store, PaneId::MIN), ["/b.rs", "/c.rs", "/a.rs"]);

    let trace = store.stop_recording().expect("recording");
    assert!(trace.session().is_active());
    let text = trace.to_jsonl().expect("jsonl");
    let replayed = GestureTrace::from_jsonl(&text)
        .expect("parse")
        .replay(&DragPolicyConfig::default())
        .expect("replay");
    assert_eq!(replayed.panes, store.snapshot().panes);
}

#[test]
fn rejected_actions_replay_as_rejections() {
    let mut store = store_with(&["/a.rs"]);
    store.start_recording("rejects");
    store
        .dispatch(TabAction::ClosePane { pane: PaneId::MIN })
        .expect_err("last pane");
    store
        .dispatch(TabAction::OpenTab {
            pane: PaneId::MIN,
            path: "/b.rs".to_string(),
        })
        .expect("open");
    let trace = store.stop_recording().expect("recording");
    assert_eq!(trace.len(), 2);
    let replayed = trace
        .replay(&DragPolicyConfig::default())
        .expect("replay");
    assert_eq!(replayed.panes, store.snapshot().panes);
}

fn action_strategy() -> impl Strategy<Value = TabAction> {
    let pane = (1u64..4).prop_map(|raw| PaneId::new(raw).expect("non-zero"));
    prop_oneof![
        (pane.clone(), 0usize..5).prop_map(|(pane, index)| TabAction::DragStart { pane, index }),
        (pane.clone(), 0usize..6).prop_map(|(pane, index)| TabAction::DragOver { pane, index }),
        (0i32..800, any::<bool>(), any::<bool>()).prop_map(|(x, ctrl, shift)| {
            let mut mods = Modifiers::NONE;
            if ctrl {
                mods |= Modifiers::CTRL;
            }
            if shift {
                mods |= Modifiers::SHIFT;
            }
            TabAction::Drop {
                payload: None,
                target: None,
                pointer: PointerSnapshot::at(x, 10).with_modifiers(mods),
                viewport: VIEWPORT,
            }
        }),
        Just(TabAction::DragEnd),
        (pane, 0usize..4).prop_map(|(pane, n)| TabAction::OpenTab {
            pane,
            path: format!("/f{n}.rs"),
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn replay_matches_live_store(actions in proptest::collection::vec(action_strategy(), 0..60)) {
        let mut store = store_with(&["/a.rs", "/b.rs", "/c.rs"]);
        store.start_recording("prop");
        for action in actions {
            let _ = store.dispatch(action);
        }
        let live = store.snapshot();
        let trace = store.stop_recording().expect("recording");
        let text = trace.to_jsonl().expect("jsonl");
        let reparsed = GestureTrace::from_jsonl(&text).expect("parse");
        let replayed = reparsed.replay(&DragPolicyConfig::default()).expect("replay");
        prop_assert_eq!(replayed.panes, live.panes);
        prop_assert_eq!(replayed.root, live.root);
    }
}
