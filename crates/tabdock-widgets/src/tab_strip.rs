#![forbid(unsafe_code)]

//! One pane's tab strip: drag handlers and a pure view model.
//!
//! The strip owns no tab state. Handlers read the store, talk to the host
//! through [`DataTransfer`], and dispatch [`TabAction`]s; [`TabStrip::view`]
//! derives everything it draws from [`TabState`].
//!
//! # Handler contract
//!
//! | Handler | Store action | Notes |
//! |---------|--------------|-------|
//! | `on_drag_start` | `DragStart` | attaches payload and image once started |
//! | `on_drag_over` | `DragOver` | marks the strip a drop zone |
//! | `on_drop` | `Drop` | payload first, session as fallback |
//! | `on_drag_end` | `DragEnd` | safe after `on_drop` |
//!
//! Drag handlers never touch tab lists themselves.

use std::fmt;

use tabdock_core::event::PointerSnapshot;
use tabdock_core::geometry::{Point, Rect};
use tabdock_layout::PaneId;

use crate::drag::{
    DataTransfer, DragPreviewConfig, DragSessionEffect, DragSessionState, TabDragPayload,
    TabPosition,
};
use crate::drop_target::DropTargetResolver;
use crate::store::{ActionEffect, Store, StoreError, TabAction, TabState};

/// Default tab width for the uniform layout.
pub const DEFAULT_TAB_WIDTH: u32 = 120;

/// Callback type for editor-surface hooks; receives the tab's path.
pub type TabCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Non-drag hooks back into the editor surface.
#[derive(Default)]
pub struct TabStripHooks {
    on_tab_change: Option<TabCallback>,
    on_tab_close: Option<TabCallback>,
}

impl fmt::Debug for TabStripHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabStripHooks")
            .field("on_tab_change", &self.on_tab_change.is_some())
            .field("on_tab_close", &self.on_tab_close.is_some())
            .finish()
    }
}

impl TabStripHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the path of a tab activated by click.
    #[must_use]
    pub fn on_tab_change(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_tab_change = Some(Box::new(f));
        self
    }

    /// Called with the path of a tab closed from the strip.
    #[must_use]
    pub fn on_tab_close(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_tab_close = Some(Box::new(f));
        self
    }
}

/// Tab strip adapter for one pane.
#[derive(Debug)]
pub struct TabStrip {
    pane: PaneId,
    area: Rect,
    tab_width: u32,
    measured: Option<Vec<Rect>>,
    preview: DragPreviewConfig,
    dimmed_opacity: f32,
    hooks: TabStripHooks,
}

impl TabStrip {
    #[must_use]
    pub fn new(pane: PaneId, area: Rect) -> Self {
        Self {
            pane,
            area,
            tab_width: DEFAULT_TAB_WIDTH,
            measured: None,
            preview: DragPreviewConfig::default(),
            dimmed_opacity: 0.5,
            hooks: TabStripHooks::default(),
        }
    }

    #[must_use]
    pub fn with_tab_width(mut self, width: u32) -> Self {
        self.tab_width = width.max(1);
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: DragPreviewConfig) -> Self {
        self.preview = preview;
        self
    }

    /// Opacity of the dragged tab and of the tab at the hovered boundary.
    #[must_use]
    pub fn with_dimmed_opacity(mut self, opacity: f32) -> Self {
        self.dimmed_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: TabStripHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub const fn pane(&self) -> PaneId {
        self.pane
    }

    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Use host-measured tab bounds instead of the uniform layout.
    ///
    /// Bounds are one per tab in tab order. Tabs sit left to right, so they
    /// are sorted by `x` here; drop resolution bisects on that order.
    /// Ignored whenever their count disagrees with the pane's tab count.
    pub fn set_measured_bounds(&mut self, mut bounds: Vec<Rect>) {
        bounds.sort_by_key(|rect| rect.x);
        self.measured = Some(bounds);
    }

    /// Bounds of the pane's tabs, left to right.
    #[must_use]
    pub fn tab_bounds(&self, state: &TabState) -> Vec<Rect> {
        let count = state.workspace().tabs(self.pane).map_or(0, |model| model.len());
        match &self.measured {
            Some(bounds) if bounds.len() == count => bounds.clone(),
            _ => uniform_tab_bounds(self.area, count, self.tab_width),
        }
    }

    /// Pointer pressed and dragged on tab `index`.
    ///
    /// Returns `Ok(None)` when there is no such tab. The payload and drag
    /// image are attached only when this call actually starts the session;
    /// a start during another drag leaves the transfer untouched.
    pub fn on_drag_start<S: Store>(
        &self,
        store: &mut S,
        transfer: &mut impl DataTransfer,
        index: usize,
    ) -> Result<Option<ActionEffect>, StoreError> {
        let Some(tab) = store.state().workspace().tab(self.pane, index).cloned() else {
            return Ok(None);
        };
        let effect = store.dispatch(TabAction::DragStart {
            pane: self.pane,
            index,
        })?;
        if let ActionEffect::Session { transition } = &effect
            && matches!(transition.effect, DragSessionEffect::Started { .. })
        {
            TabDragPayload::new(self.pane, index, &tab).attach(transfer);
            transfer.set_drag_image(
                &self.preview.preview_for(&tab),
                self.preview.offset_x,
                self.preview.offset_y,
            );
        }
        Ok(Some(effect))
    }

    /// Pointer moved over the strip during a drag.
    ///
    /// `topmost` is false when another strip covers this one at `pointer`;
    /// such events are left for the covering strip.
    pub fn on_drag_over<S: Store>(
        &self,
        store: &mut S,
        transfer: &mut impl DataTransfer,
        pointer: Point,
        topmost: bool,
    ) -> Result<Option<ActionEffect>, StoreError> {
        let bounds = self.tab_bounds(store.state());
        let Some(slot) = DropTargetResolver::resolve(pointer, &bounds, topmost) else {
            return Ok(None);
        };
        transfer.prevent_default();
        store
            .dispatch(TabAction::DragOver {
                pane: self.pane,
                index: slot.index,
            })
            .map(Some)
    }

    /// Pointer released over the strip.
    pub fn on_drop<S: Store>(
        &self,
        store: &mut S,
        transfer: &impl DataTransfer,
        pointer: PointerSnapshot,
        viewport: Rect,
        topmost: bool,
    ) -> Result<ActionEffect, StoreError> {
        let bounds = self.tab_bounds(store.state());
        let target = DropTargetResolver::resolve(pointer.position, &bounds, topmost)
            .map(|slot| TabPosition::new(self.pane, slot.index));
        store.dispatch(TabAction::Drop {
            payload: TabDragPayload::read(transfer),
            target,
            pointer,
            viewport,
        })
    }

    /// Drag finished on the source strip, dropped or not.
    pub fn on_drag_end<S: Store>(&self, store: &mut S) -> Result<ActionEffect, StoreError> {
        store.dispatch(TabAction::DragEnd)
    }

    /// Plain click on tab `index`.
    pub fn on_tab_click<S: Store>(
        &self,
        store: &mut S,
        index: usize,
    ) -> Result<Option<ActionEffect>, StoreError> {
        let Some(path) = self.path_at(store.state(), index) else {
            return Ok(None);
        };
        let effect = store.dispatch(TabAction::ActivateTab {
            pane: self.pane,
            path: path.clone(),
        })?;
        if let Some(hook) = &self.hooks.on_tab_change {
            hook(&path);
        }
        Ok(Some(effect))
    }

    /// Close button on tab `index`.
    pub fn on_tab_close<S: Store>(
        &self,
        store: &mut S,
        index: usize,
    ) -> Result<Option<ActionEffect>, StoreError> {
        let Some(path) = self.path_at(store.state(), index) else {
            return Ok(None);
        };
        let effect = store.dispatch(TabAction::CloseTab {
            pane: self.pane,
            path: path.clone(),
        })?;
        if let Some(hook) = &self.hooks.on_tab_close {
            hook(&path);
        }
        Ok(Some(effect))
    }

    fn path_at(&self, state: &TabState, index: usize) -> Option<String> {
        state
            .workspace()
            .tab(self.pane, index)
            .map(|tab| tab.path.clone())
    }

    /// Derive the strip's view model from `state`.
    #[must_use]
    pub fn view(&self, state: &TabState) -> TabStripView {
        let (source, target) = match state.session().state() {
            DragSessionState::Dragging { source, target } => (Some(source), target),
            DragSessionState::Idle => (None, None),
        };
        let dragged = source.filter(|s| s.pane == self.pane).map(|s| s.index);
        let indicator = target.filter(|t| t.pane == self.pane).map(|t| t.index);

        let bounds = self.tab_bounds(state);
        let cells = state
            .workspace()
            .tabs(self.pane)
            .map(|model| {
                model
                    .tabs()
                    .iter()
                    .enumerate()
                    .map(|(index, tab)| {
                        let dimmed = dragged == Some(index) || indicator == Some(index);
                        TabCell {
                            path: tab.path.clone(),
                            title: tab.title().to_string(),
                            pinned: tab.pinned,
                            active: model.active_index() == Some(index),
                            opacity: if dimmed { self.dimmed_opacity } else { 1.0 },
                            bounds: bounds.get(index).copied().unwrap_or_default(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        TabStripView {
            pane: self.pane,
            focused: state.workspace().focused() == self.pane,
            cells,
            indicator,
        }
    }
}

/// Lay `count` tabs of `tab_width` left to right from the strip's origin.
#[must_use]
pub fn uniform_tab_bounds(area: Rect, count: usize, tab_width: u32) -> Vec<Rect> {
    let step = i64::from(tab_width);
    (0..count)
        .map(|i| {
            let x = i64::from(area.x).saturating_add(step.saturating_mul(i as i64));
            Rect::new(
                i32::try_from(x).unwrap_or(i32::MAX),
                area.y,
                tab_width,
                area.height,
            )
        })
        .collect()
}

/// One rendered tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabCell {
    pub path: String,
    pub title: String,
    pub pinned: bool,
    pub active: bool,
    pub opacity: f32,
    pub bounds: Rect,
}

impl TabCell {
    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Everything one strip draws.
#[derive(Debug, Clone, PartialEq)]
pub struct TabStripView {
    pub pane: PaneId,
    pub focused: bool,
    pub cells: Vec<TabCell>,
    /// Boundary index of the drop indicator, if this strip is the target.
    pub indicator: Option<usize>,
}

impl TabStripView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Text rendering: `[title]` per tab, `*` marks the active tab, `^` pinned,
/// `(..)` dimmed, `|` the drop indicator.
impl fmt::Display for TabStripView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cell) in self.cells.iter().enumerate() {
            if self.indicator == Some(index) {
                f.write_str("|")?;
            }
            let (open, close) = if cell.is_dimmed() { ('(', ')') } else { ('[', ']') };
            let pin = if cell.pinned { "^" } else { "" };
            let active = if cell.active { "*" } else { "" };
            write!(f, "{open}{pin}{}{active}{close}", cell.title)?;
        }
        if self.indicator == Some(self.cells.len()) {
            f.write_str("|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{MemoryDataTransfer, TAB_DRAG_FORMAT};
    use std::sync::{Arc, Mutex};
    use tabdock_core::event::Modifiers;

    const STRIP: Rect = Rect::new(0, 0, 600, 30);
    const VIEWPORT: Rect = Rect::new(0, 0, 1200, 800);

    fn pane(raw: u64) -> PaneId {
        PaneId::new(raw).expect("non-zero")
    }

    fn store_with(paths: &[&str]) -> TabState {
        let mut state = TabState::default();
        for path in paths {
            state
                .dispatch(TabAction::OpenTab {
                    pane: pane(1),
                    path: (*path).to_string(),
                })
                .expect("open");
        }
        state
    }

    #[test]
    fn uniform_bounds() {
        let bounds = uniform_tab_bounds(Rect::new(10, 5, 300, 20), 3, 100);
        assert_eq!(bounds[0], Rect::new(10, 5, 100, 20));
        assert_eq!(bounds[2], Rect::new(210, 5, 100, 20));
        assert!(uniform_tab_bounds(STRIP, 0, 100).is_empty());
    }

    #[test]
    fn drag_start_attaches_payload_and_preview() {
        let mut store = store_with(&["/src/a.rs", "/src/b.rs"]);
        let strip = TabStrip::new(pane(1), STRIP).with_preview(
            DragPreviewConfig::default().with_opacity(0.6).with_offset(4, 2),
        );
        let mut transfer = MemoryDataTransfer::new();
        let effect = strip
            .on_drag_start(&mut store, &mut transfer, 1)
            .expect("dispatch");
        assert!(effect.is_some());

        let payload = TabDragPayload::read(&transfer).expect("payload");
        assert_eq!(payload.file_path, "/src/b.rs");
        assert_eq!(payload.tab_index, 1);
        let (preview, dx, dy) = transfer.drag_image().expect("drag image");
        assert_eq!(preview.label, "b.rs");
        assert_eq!((*dx, *dy), (4, 2));
        assert!(store.session().is_active());
        // Starting a drag never touches the tab list.
        assert_eq!(store.workspace().tabs(pane(1)).map(|m| m.len()), Some(2));
    }

    #[test]
    fn second_start_keeps_first_payload() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let strip = TabStrip::new(pane(1), STRIP);
        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 0)
            .expect("start");
        // The matching drag end never arrives before the next start.
        let effect = strip
            .on_drag_start(&mut store, &mut transfer, 2)
            .expect("dispatch")
            .expect("tab exists");
        assert!(matches!(
            effect,
            ActionEffect::Session { transition } if transition.is_noop()
        ));

        let payload = TabDragPayload::read(&transfer).expect("payload");
        assert_eq!(payload.file_path, "/a");
        assert_eq!(payload.tab_index, 0);
        let (preview, _, _) = transfer.drag_image().expect("drag image");
        assert_eq!(preview.label, "a");
        assert_eq!(store.session().source(), Some(TabPosition::new(pane(1), 0)));
    }

    #[test]
    fn drag_start_on_missing_tab_does_nothing() {
        let mut store = store_with(&["/a"]);
        let strip = TabStrip::new(pane(1), STRIP);
        let mut transfer = MemoryDataTransfer::new();
        assert_eq!(strip.on_drag_start(&mut store, &mut transfer, 5), Ok(None));
        assert!(!store.session().is_active());
        assert_eq!(transfer.get_data(TAB_DRAG_FORMAT), None);
    }

    #[test]
    fn drag_over_prevents_default_and_targets_boundary() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let strip = TabStrip::new(pane(1), STRIP).with_tab_width(100);
        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 0)
            .expect("start");
        strip
            .on_drag_over(&mut store, &mut transfer, Point::new(160, 10), true)
            .expect("over");
        assert!(transfer.default_prevented());
        assert_eq!(store.session().target(), Some(TabPosition::new(pane(1), 2)));
    }

    #[test]
    fn covered_strip_ignores_drag_over() {
        let mut store = store_with(&["/a"]);
        let strip = TabStrip::new(pane(1), STRIP);
        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 0)
            .expect("start");
        transfer.begin_event();
        let effect = strip
            .on_drag_over(&mut store, &mut transfer, Point::new(5, 5), false)
            .expect("over");
        assert_eq!(effect, None);
        assert!(!transfer.default_prevented());
        assert_eq!(store.session().target(), None);
    }

    #[test]
    fn view_dims_source_and_hovered_and_shows_one_indicator() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let strip = TabStrip::new(pane(1), STRIP).with_tab_width(100);
        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 0)
            .expect("start");
        strip
            .on_drag_over(&mut store, &mut transfer, Point::new(160, 10), true)
            .expect("over");

        let view = strip.view(&store);
        assert_eq!(view.indicator, Some(2));
        let dimmed: Vec<bool> = view.cells.iter().map(TabCell::is_dimmed).collect();
        assert_eq!(dimmed, [true, false, true]);
        assert_eq!(view.to_string(), "(a)[b]|(c*)");
    }

    #[test]
    fn indicator_at_end_and_idle_view() {
        let mut store = store_with(&["/a", "/b"]);
        let strip = TabStrip::new(pane(1), STRIP).with_tab_width(100);
        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 0)
            .expect("start");
        strip
            .on_drag_over(&mut store, &mut transfer, Point::new(590, 10), true)
            .expect("over");
        assert_eq!(strip.view(&store).to_string(), "(a)[b*]|");

        strip.on_drag_end(&mut store).expect("end");
        let idle = strip.view(&store);
        assert_eq!(idle.indicator, None);
        assert!(idle.cells.iter().all(|c| !c.is_dimmed()));
    }

    #[test]
    fn drop_with_garbled_payload_uses_session() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let strip = TabStrip::new(pane(1), STRIP).with_tab_width(100);
        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 2)
            .expect("start");
        transfer.inject(TAB_DRAG_FORMAT, "{not json");
        let pointer = PointerSnapshot::at(10, 10).with_modifiers(Modifiers::NONE);
        strip
            .on_drop(&mut store, &transfer, pointer, VIEWPORT, true)
            .expect("drop");
        strip.on_drag_end(&mut store).expect("end");
        let order: Vec<&str> = store
            .workspace()
            .tabs(pane(1))
            .map(|m| m.paths().collect())
            .unwrap_or_default();
        assert_eq!(order, ["/c", "/a", "/b"]);
        assert!(!store.session().is_active());
    }

    #[test]
    fn click_and_close_invoke_hooks() {
        let changed = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(Mutex::new(Vec::new()));
        let hooks = {
            let changed = Arc::clone(&changed);
            let closed = Arc::clone(&closed);
            TabStripHooks::new()
                .on_tab_change(move |path| changed.lock().expect("lock").push(path.to_string()))
                .on_tab_close(move |path| closed.lock().expect("lock").push(path.to_string()))
        };
        let mut store = store_with(&["/a", "/b"]);
        let strip = TabStrip::new(pane(1), STRIP).with_hooks(hooks);

        strip.on_tab_click(&mut store, 0).expect("click");
        assert_eq!(
            store.workspace().tabs(pane(1)).and_then(|m| m.active()).map(|t| t.path.as_str()),
            Some("/a")
        );
        strip.on_tab_close(&mut store, 1).expect("close");
        assert_eq!(strip.on_tab_close(&mut store, 9), Ok(None));

        assert_eq!(*changed.lock().expect("lock"), ["/a"]);
        assert_eq!(*closed.lock().expect("lock"), ["/b"]);
    }

    #[test]
    fn measured_bounds_used_only_when_counts_match() {
        let store = store_with(&["/a", "/b"]);
        let mut strip = TabStrip::new(pane(1), STRIP).with_tab_width(100);
        strip.set_measured_bounds(vec![Rect::new(0, 0, 40, 30), Rect::new(40, 0, 200, 30)]);
        assert_eq!(strip.tab_bounds(&store)[1].width, 200);
        strip.set_measured_bounds(vec![Rect::new(0, 0, 40, 30)]);
        assert_eq!(strip.tab_bounds(&store)[1].width, 100);
    }

    #[test]
    fn measured_bounds_are_ordered_left_to_right() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let mut strip = TabStrip::new(pane(1), STRIP);
        strip.set_measured_bounds(vec![
            Rect::new(200, 0, 100, 30),
            Rect::new(0, 0, 100, 30),
            Rect::new(100, 0, 100, 30),
        ]);
        let xs: Vec<i32> = strip.tab_bounds(&store).iter().map(|r| r.x).collect();
        assert_eq!(xs, [0, 100, 200]);

        let mut transfer = MemoryDataTransfer::new();
        strip
            .on_drag_start(&mut store, &mut transfer, 0)
            .expect("start");
        strip
            .on_drag_over(&mut store, &mut transfer, Point::new(160, 10), true)
            .expect("over");
        assert_eq!(store.session().target(), Some(TabPosition::new(pane(1), 2)));
    }
}
