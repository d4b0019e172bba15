//! Rectangle intersection for drag selection.
//!
//! Coordinates are terminal cells as `f64`. The drag box lives in
//! container-local coordinates (relative to the list area); item bounds are
//! recorded in screen coordinates. [`items_in_box`] translates the box by the
//! container origin *at query time* — the container is re-measured on every
//! call because the list can scroll mid-drag.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Open-interval overlap: edge-touching rectangles do not intersect,
    /// and a zero-area rectangle intersects nothing.
    pub fn intersects(self, other: Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Horizontal displacement below this many cells counts as a vertical drag
/// when classifying direction (cell analogue of a small pixel threshold).
pub const REVERSE_DRAG_X_SLOP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    pub start: Point,
    pub end: Point,
}

impl SelectionBox {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn normalized(self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// Reverse (subtractive) drag: up-and-left, or essentially vertical
    /// and upward. Computed from the original start point and the current
    /// point, so the classification can flip mid-drag.
    pub fn is_reverse(self) -> bool {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx < 0.0 && dy < 0.0) || (dx.abs() < REVERSE_DRAG_X_SLOP && dy < 0.0)
    }
}

/// Identities whose recorded bounds strictly intersect the drag box.
/// A missing container means the list is not on screen — empty set, not an
/// error.
pub fn items_in_box(
    selection_box: SelectionBox,
    container: Option<Rect>,
    bounds: &HashMap<String, Rect>,
) -> HashSet<String> {
    let Some(container) = container else {
        return HashSet::new();
    };
    let screen_box = selection_box
        .normalized()
        .translated(container.left, container.top);
    bounds
        .iter()
        .filter(|(_, rect)| screen_box.intersects(**rect))
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds_of(items: &[(&str, Rect)]) -> HashMap<String, Rect> {
        items
            .iter()
            .map(|(id, rect)| ((*id).to_string(), *rect))
            .collect()
    }

    fn row(y: f64) -> Rect {
        Rect::new(0.0, y, 40.0, y + 1.0)
    }

    #[test]
    fn strict_intersection_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(touching));
        let overlapping = Rect::new(9.9, 0.0, 20.0, 10.0);
        assert!(a.intersects(overlapping));
    }

    #[test]
    fn zero_area_box_selects_nothing() {
        let b = SelectionBox::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        let bounds = bounds_of(&[("a", row(4.0)), ("b", row(5.0))]);
        let hit = items_in_box(b, Some(Rect::new(0.0, 0.0, 40.0, 20.0)), &bounds);
        assert!(hit.is_empty());
    }

    #[test]
    fn missing_container_yields_empty_set() {
        let b = SelectionBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let bounds = bounds_of(&[("a", row(1.0))]);
        assert!(items_in_box(b, None, &bounds).is_empty());
    }

    #[test]
    fn box_translated_by_container_origin() {
        // Container at (0, 10): a container-local box over rows 0..2 must hit
        // items recorded at screen rows 10..12, not 0..2.
        let b = SelectionBox::new(Point::new(0.0, 0.0), Point::new(20.0, 2.0));
        let bounds = bounds_of(&[("screen", row(10.0)), ("local", row(0.0))]);
        let hit = items_in_box(b, Some(Rect::new(0.0, 10.0, 40.0, 20.0)), &bounds);
        assert_eq!(hit.len(), 1);
        assert!(hit.contains("screen"));
    }

    #[test]
    fn intersection_is_translation_invariant() {
        let b = SelectionBox::new(Point::new(1.0, 1.0), Point::new(15.0, 4.0));
        let container = Rect::new(2.0, 3.0, 42.0, 30.0);
        let items = [("a", row(3.0)), ("b", row(5.0)), ("c", row(9.0))];

        let baseline = items_in_box(b, Some(container), &bounds_of(&items));

        let (dx, dy) = (7.0, 13.0);
        let shifted_items: Vec<(&str, Rect)> = items
            .iter()
            .map(|(id, rect)| (*id, rect.translated(dx, dy)))
            .collect();
        let shifted = items_in_box(
            b,
            Some(container.translated(dx, dy)),
            &bounds_of(&shifted_items),
        );
        assert_eq!(baseline, shifted);
    }

    #[test]
    fn reverse_when_up_and_left() {
        let b = SelectionBox::new(Point::new(20.0, 10.0), Point::new(5.0, 2.0));
        assert!(b.is_reverse());
    }

    #[test]
    fn reverse_when_straight_up() {
        let b = SelectionBox::new(Point::new(10.0, 10.0), Point::new(10.5, 2.0));
        assert!(b.is_reverse());
    }

    #[test]
    fn forward_when_down_right() {
        let b = SelectionBox::new(Point::new(2.0, 2.0), Point::new(20.0, 10.0));
        assert!(!b.is_reverse());
    }

    #[test]
    fn forward_when_up_but_clearly_rightward() {
        // Upward but with real horizontal extent to the right: additive.
        let b = SelectionBox::new(Point::new(2.0, 10.0), Point::new(20.0, 2.0));
        assert!(!b.is_reverse());
    }

    #[test]
    fn classification_flips_mid_drag() {
        let start = Point::new(10.0, 10.0);
        assert!(!SelectionBox::new(start, Point::new(25.0, 14.0)).is_reverse());
        assert!(SelectionBox::new(start, Point::new(4.0, 3.0)).is_reverse());
    }
}
