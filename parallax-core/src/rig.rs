/// Camera rig: a parent group for parallax holding the scroll-driven camera
use nalgebra::Vector3;

use crate::config::{CameraConfig, ParallaxConfig};
use crate::input::{CursorState, ScrollState};
use crate::projection::PerspectiveCamera;

/// Scroll moves the child camera, the cursor moves the parent group; the two
/// offsets add up in the camera's world position.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Parent group position, smoothed toward the parallax target
    pub group: Vector3<f32>,
    pub camera: PerspectiveCamera,
    parallax: ParallaxConfig,
}

impl CameraRig {
    pub fn new(camera: &CameraConfig, parallax: ParallaxConfig, aspect: f32) -> Self {
        let mut lens = PerspectiveCamera::new(camera.fov, aspect, camera.near, camera.far);
        lens.position.z = camera.distance;
        Self {
            group: Vector3::zeros(),
            camera: lens,
            parallax,
        }
    }

    pub fn world_position(&self) -> Vector3<f32> {
        self.group + self.camera.position
    }

    /// Place the camera exactly `scroll / height` sections down
    pub fn follow_scroll(&mut self, scroll: &ScrollState, viewport_height: f32, objects_distance: f32) {
        self.camera.position.y = -scroll.pages(viewport_height) * objects_distance;
    }

    pub fn parallax_target(&self, cursor: &CursorState) -> (f32, f32) {
        (
            cursor.x * self.parallax.amplitude,
            -cursor.y * self.parallax.amplitude,
        )
    }

    /// One exponential-smoothing step toward the cursor's parallax target.
    ///
    /// Scaling by `dt` keeps the approach speed independent of frame rate. A
    /// very large `dt` can overshoot the target.
    pub fn smooth_parallax(&mut self, cursor: &CursorState, dt: f32) {
        let (target_x, target_y) = self.parallax_target(cursor);
        let step = dt * self.parallax.easing;
        self.group.x += (target_x - self.group.x) * step;
        self.group.y += (target_y - self.group.y) * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(&CameraConfig::default(), ParallaxConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_scroll_maps_to_camera_height() {
        let mut rig = rig();
        let mut scroll = ScrollState::default();
        scroll.set(1080.0);
        rig.follow_scroll(&scroll, 1080.0, 4.0);
        assert!((rig.camera.position.y + 4.0).abs() < 1e-6);

        rig.follow_scroll(&scroll, 0.0, 4.0);
        assert_eq!(rig.camera.position.y, 0.0);
    }

    #[test]
    fn test_parallax_target() {
        let rig = rig();
        let (x, y) = rig.parallax_target(&CursorState::new(0.25, -0.25));
        assert!((x - 0.125).abs() < 1e-6);
        assert!((y - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_matches_closed_form() {
        let mut rig = rig();
        rig.group.x = -0.3;
        let cursor = CursorState::new(0.4, 0.0);
        let target = 0.2;
        let dt = 1.0 / 60.0;

        for _ in 0..30 {
            rig.smooth_parallax(&cursor, dt);
        }

        let expected = target - (target - -0.3) * (1.0 - 5.0 * dt).powi(30);
        assert!((rig.group.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_smoothing_converges() {
        let mut rig = rig();
        let cursor = CursorState::new(-0.5, 0.5);
        for _ in 0..2000 {
            rig.smooth_parallax(&cursor, 1.0 / 60.0);
        }
        assert!((rig.group.x + 0.25).abs() < 1e-5);
        assert!((rig.group.y + 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_scroll_and_parallax_are_additive() {
        let mut rig = rig();
        let mut scroll = ScrollState::default();
        scroll.set(540.0);
        rig.follow_scroll(&scroll, 1080.0, 4.0);
        rig.group.y = 0.1;
        assert!((rig.world_position().y - (-2.0 + 0.1)).abs() < 1e-6);
        assert!((rig.world_position().z - 6.0).abs() < 1e-6);
    }
}
