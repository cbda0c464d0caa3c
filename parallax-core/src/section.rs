//! Discrete section tracking from scroll position

/// Section index for a scroll offset: `round(scroll_y / height)` clamped to
/// `[0, count - 1]`. A collapsed viewport or an empty list maps to 0.
pub fn section_for(scroll_y: f32, viewport_height: f32, count: usize) -> usize {
    if count == 0 || viewport_height <= 0.0 || !scroll_y.is_finite() {
        return 0;
    }
    let raw = (scroll_y / viewport_height).round();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(count - 1)
    }
}

/// Remembers which section is in view and reports transitions
#[derive(Debug, Clone)]
pub struct SectionTracker {
    current: usize,
    count: usize,
}

impl SectionTracker {
    pub fn new(count: usize) -> Self {
        Self { current: 0, count }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Recompute the section for a new scroll offset.
    ///
    /// Returns the newly entered section on a transition. Jumping over several
    /// sections in one call yields only the final one. A collapsed viewport
    /// never causes a transition.
    pub fn update(&mut self, scroll_y: f32, viewport_height: f32) -> Option<usize> {
        if viewport_height <= 0.0 || self.count == 0 {
            return None;
        }
        let next = section_for(scroll_y, viewport_height, self.count);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_formula() {
        assert_eq!(section_for(0.0, 1080.0, 3), 0);
        assert_eq!(section_for(539.0, 1080.0, 3), 0);
        assert_eq!(section_for(540.0, 1080.0, 3), 1);
        assert_eq!(section_for(1080.0, 1080.0, 3), 1);
        assert_eq!(section_for(1700.0, 1080.0, 3), 2);
    }

    #[test]
    fn test_section_is_clamped() {
        assert_eq!(section_for(10_000.0, 1080.0, 3), 2);
        assert_eq!(section_for(-500.0, 1080.0, 3), 0);
        assert_eq!(section_for(500.0, 0.0, 3), 0);
        assert_eq!(section_for(500.0, 100.0, 0), 0);
    }

    #[test]
    fn test_transition_fires_once() {
        let mut tracker = SectionTracker::new(3);
        assert_eq!(tracker.update(100.0, 1080.0), None);
        assert_eq!(tracker.update(1000.0, 1080.0), Some(1));
        assert_eq!(tracker.update(1100.0, 1080.0), None);
        assert_eq!(tracker.current(), 1);
    }

    #[test]
    fn test_fast_scroll_collapses_to_last_section() {
        let mut tracker = SectionTracker::new(3);
        assert_eq!(tracker.update(2160.0, 1080.0), Some(2));
        assert_eq!(tracker.update(0.0, 1080.0), Some(0));
    }

    #[test]
    fn test_past_the_end_stays_on_last_section() {
        let mut tracker = SectionTracker::new(3);
        assert_eq!(tracker.update(99_999.0, 1080.0), Some(2));
        assert_eq!(tracker.update(199_999.0, 1080.0), None);
    }
}
