//! Selection state: the set of selected repository names, click toggling,
//! select-all, drag-driven batch updates, and reconciliation with the list.
//!
//! A drag only exists while the modifier (Shift) is held and the button is
//! down. On every pointer move the box is rebuilt from the original start
//! point and the current point, the intersecting set is recomputed from the
//! full geometry, and the merge policy is re-applied — nothing accumulates
//! from per-event deltas, so a lost event cannot cause drift.

pub mod autoscroll;
pub mod geometry;

use self::geometry::{items_in_box, Point, Rect, SelectionBox};
use std::collections::{HashMap, HashSet};

/// Count-based selection phase. Dragging is orthogonal to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Partial,
    All,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    start: Point,
    current: Point,
}

#[derive(Debug, Default)]
pub struct Selection {
    selected: HashSet<String>,
    drag: Option<DragState>,
    shift_held: bool,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn phase(&self, total: usize) -> Phase {
        if self.selected.is_empty() {
            Phase::Idle
        } else if self.selected.len() >= total {
            Phase::All
        } else {
            Phase::Partial
        }
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Toggle-all: everything selected clears, anything else selects all.
    pub fn select_all<'a>(&mut self, all: impl IntoIterator<Item = &'a str>) {
        let all: Vec<&str> = all.into_iter().collect();
        if !all.is_empty() && self.selected.len() == all.len() {
            self.selected.clear();
        } else {
            self.selected = all.into_iter().map(str::to_string).collect();
        }
    }

    /// Intersect with the identities currently in the list. Called at the one
    /// point where the list changes (fetch applied, delete applied), never as
    /// a rendering side effect. May empty the set; never fails.
    pub fn reconcile<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) {
        let live: HashSet<&str> = live.into_iter().collect();
        self.selected.retain(|id| live.contains(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.drag = None;
    }

    // --- modifier & drag lifecycle ---

    pub fn shift_held(&self) -> bool {
        self.shift_held
    }

    /// Releasing the modifier cancels an active drag; changes already
    /// applied to the set persist.
    pub fn set_shift(&mut self, held: bool) {
        self.shift_held = held;
        if !held {
            self.drag = None;
        }
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Begin a drag at a container-local point. Only valid while the
    /// modifier is held; starting while already dragging is a no-op.
    pub fn begin_drag(&mut self, start: Point) -> bool {
        if !self.shift_held || self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragState {
            start,
            current: start,
        });
        true
    }

    /// Apply a pointer move: rebuild the box from the original start point,
    /// classify direction, and merge the intersecting set into the selection
    /// (forward adds, reverse removes).
    pub fn drag_update(
        &mut self,
        current: Point,
        container: Option<Rect>,
        bounds: &HashMap<String, Rect>,
    ) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.current = current;
        let selection_box = SelectionBox::new(drag.start, current);
        let in_box = items_in_box(selection_box, container, bounds);
        if selection_box.is_reverse() {
            for id in &in_box {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(in_box);
        }
    }

    /// Pointer-up, modifier release, or focus loss: the box disappears, the
    /// selection stays as last computed.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Current drag box for rendering, if a drag is active.
    pub fn drag_box(&self) -> Option<SelectionBox> {
        self.drag
            .map(|drag| SelectionBox::new(drag.start, drag.current))
    }
}
