use glam::Vec2;

/// Turns raw pointer input into look deltas for [`voxelview_render::Camera`].
///
/// Screen-space y grows downwards, so it is negated: moving the pointer up
/// yields a positive look delta. After [`MouseLook::reset`] the next sample
/// only establishes a reference point, which avoids a jump when the cursor is
/// captured or focus returns.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    primed: bool,
    last_cursor: Option<(f64, f64)>,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the reference point; the next sample is swallowed.
    pub fn reset(&mut self) {
        self.primed = false;
        self.last_cursor = None;
    }

    /// Relative motion as reported by raw mouse events.
    pub fn motion(&mut self, dx: f64, dy: f64) -> Option<Vec2> {
        if !self.primed {
            self.primed = true;
            return None;
        }
        Some(Vec2::new(dx as f32, -dy as f32))
    }

    /// Absolute cursor position; the delta is taken against the previous position.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<Vec2> {
        let previous = self.last_cursor.replace((x, y));
        self.primed = true;
        let (last_x, last_y) = previous?;
        Some(Vec2::new((x - last_x) as f32, (last_y - y) as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_motion_is_reference_only() {
        let mut look = MouseLook::new();
        assert_eq!(look.motion(250.0, -40.0), None);
        assert_eq!(look.motion(3.0, 4.0), Some(Vec2::new(3.0, -4.0)));
    }

    #[test]
    fn reset_swallows_next_sample() {
        let mut look = MouseLook::new();
        look.motion(0.0, 0.0);
        assert!(look.motion(1.0, 1.0).is_some());
        look.reset();
        assert_eq!(look.motion(900.0, 900.0), None);
        assert!(look.motion(1.0, 1.0).is_some());
    }

    #[test]
    fn cursor_positions_produce_inverted_deltas() {
        let mut look = MouseLook::new();
        assert_eq!(look.cursor_moved(640.0, 360.0), None);
        assert_eq!(look.cursor_moved(650.0, 350.0), Some(Vec2::new(10.0, 10.0)));
        assert_eq!(look.cursor_moved(645.0, 365.0), Some(Vec2::new(-5.0, -15.0)));
    }

    #[test]
    fn reset_clears_cursor_reference() {
        let mut look = MouseLook::new();
        look.cursor_moved(0.0, 0.0);
        look.reset();
        assert_eq!(look.cursor_moved(500.0, 500.0), None);
    }
}
