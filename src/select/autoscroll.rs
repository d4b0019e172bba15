//! Edge-of-viewport auto-scroll while a drag selection is active.
//!
//! The controller only decides; the caller applies the returned row delta to
//! the list offset. It is driven by the main loop's fixed tick, not by
//! pointer-move events, so scrolling continues while the pointer sits still
//! inside the edge band. `start`/`stop` are idempotent and the drag teardown
//! path must call [`AutoScroll::stop`] so no tick keeps scrolling afterwards.

/// Pointer within this many rows of the viewport's top/bottom edge scrolls.
pub const EDGE_BAND_ROWS: f64 = 3.0;
/// Rows scrolled per tick. Constant magnitude — no proportional easing.
pub const SCROLL_STEP_ROWS: i32 = 1;

/// Signed scroll direction for a pointer at `pointer_y` in a viewport of
/// `height` rows: negative toward the top, positive toward the bottom.
pub fn velocity(pointer_y: f64, height: f64) -> i32 {
    if height <= 2.0 * EDGE_BAND_ROWS {
        // Degenerate viewport: both bands overlap, scrolling would jitter.
        return 0;
    }
    if pointer_y <= EDGE_BAND_ROWS {
        -SCROLL_STEP_ROWS
    } else if pointer_y >= height - EDGE_BAND_ROWS {
        SCROLL_STEP_ROWS
    } else {
        0
    }
}

#[derive(Debug, Default)]
pub struct AutoScroll {
    running: bool,
    pointer_y: f64,
}

impl AutoScroll {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Record the latest pointer position and start/stop based on the edge
    /// band. Called from pointer-move handling.
    pub fn update(&mut self, pointer_y: f64, viewport_height: f64) {
        self.pointer_y = pointer_y;
        if velocity(pointer_y, viewport_height) == 0 {
            if self.running {
                self.stop();
            }
        } else if !self.running {
            self.start();
        }
    }

    /// Row delta to apply this tick, from the last recorded pointer position.
    pub fn tick(&self, viewport_height: f64) -> i32 {
        if self.running {
            velocity(self.pointer_y, viewport_height)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_near_top_is_negative() {
        assert_eq!(velocity(1.0, 30.0), -1);
    }

    #[test]
    fn velocity_near_bottom_is_positive() {
        assert_eq!(velocity(28.0, 30.0), 1);
    }

    #[test]
    fn velocity_in_middle_is_zero() {
        assert_eq!(velocity(15.0, 30.0), 0);
    }

    #[test]
    fn velocity_zero_in_tiny_viewport() {
        assert_eq!(velocity(1.0, 5.0), 0);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut s = AutoScroll::default();
        s.start();
        s.start();
        assert!(s.is_running());
        s.stop();
        s.stop();
        assert!(!s.is_running());
    }

    #[test]
    fn update_starts_in_band_and_stops_outside() {
        let mut s = AutoScroll::default();
        s.update(29.0, 30.0);
        assert!(s.is_running());
        assert_eq!(s.tick(30.0), 1);
        s.update(15.0, 30.0);
        assert!(!s.is_running());
        assert_eq!(s.tick(30.0), 0);
    }

    #[test]
    fn tick_keeps_scrolling_without_new_pointer_events() {
        let mut s = AutoScroll::default();
        s.update(0.0, 30.0);
        assert_eq!(s.tick(30.0), -1);
        assert_eq!(s.tick(30.0), -1);
    }

    #[test]
    fn stopped_controller_never_scrolls() {
        let mut s = AutoScroll::default();
        s.update(0.0, 30.0);
        s.stop();
        assert_eq!(s.tick(30.0), 0);
    }
}
