//! Cursor and scroll state fed by the host's event handlers.

use crate::viewport::Viewport;

/// Cursor position normalized to [-0.5, 0.5] on both axes, (0, 0) at the centre
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    pub x: f32,
    pub y: f32,
}

impl CursorState {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-0.5, 0.5),
            y: y.clamp(-0.5, 0.5),
        }
    }

    /// Normalize client coordinates against the viewport.
    ///
    /// A collapsed axis maps to the centre.
    pub fn from_client(client_x: f32, client_y: f32, viewport: &Viewport) -> Self {
        let axis = |value: f32, extent: f32| {
            if extent > 0.0 {
                value / extent - 0.5
            } else {
                0.0
            }
        };
        Self::new(axis(client_x, viewport.width), axis(client_y, viewport.height))
    }
}

/// Vertical scroll offset in the same units as the viewport height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_y: f32,
}

impl ScrollState {
    pub fn set(&mut self, scroll_y: f32) {
        self.scroll_y = if scroll_y.is_finite() { scroll_y.max(0.0) } else { 0.0 };
    }

    /// Scroll progress in viewport heights, 0 for a collapsed viewport
    pub fn pages(&self, viewport_height: f32) -> f32 {
        if viewport_height > 0.0 {
            self.scroll_y / viewport_height
        } else {
            0.0
        }
    }
}

/// Everything the frame update reads from the outside world
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub cursor: CursorState,
    pub scroll: ScrollState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_normalization() {
        let viewport = Viewport::new(1920.0, 1080.0, 1.0);
        let cursor = CursorState::from_client(1440.0, 270.0, &viewport);
        assert!((cursor.x - 0.25).abs() < 1e-6);
        assert!((cursor.y + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_cursor_outside_window_is_clamped() {
        let viewport = Viewport::new(100.0, 100.0, 1.0);
        let cursor = CursorState::from_client(-50.0, 400.0, &viewport);
        assert_eq!(cursor, CursorState::new(-0.5, 0.5));
    }

    #[test]
    fn test_scroll_is_non_negative() {
        let mut scroll = ScrollState::default();
        scroll.set(-30.0);
        assert_eq!(scroll.scroll_y, 0.0);
        scroll.set(540.0);
        assert_eq!(scroll.pages(1080.0), 0.5);
        assert_eq!(scroll.pages(0.0), 0.0);
    }
}
