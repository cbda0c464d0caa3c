/// Perspective camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Perspective camera looking down -Z from its position.
///
/// The projection matrix is cached and only rebuilt by
/// [`PerspectiveCamera::update_projection_matrix`], so changing `aspect` has
/// no effect until that call.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Local position inside the camera rig
    pub position: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vector3::zeros(),
            fov,
            aspect,
            near,
            far,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Matrix4::new_perspective(self.aspect, self.fov.to_radians(), self.near, self.far);
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    /// View matrix for a camera whose world position is `eye`
    pub fn view_matrix(eye: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(&-eye)
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `depth` in NDC, or `None` when the point is
    /// behind the camera. Points outside the screen are still returned so that
    /// partially visible triangles can be clipped by the rasterizer.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_view: &Matrix4<f32>,
        width: usize,
        height: usize,
    ) -> Option<(f32, f32, f32)> {
        let clip = self.projection * model_view * Vector4::new(point.x, point.y, point.z, 1.0);

        if clip.w < self.near {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(35.0, 1.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_requires_projection_update() {
        let mut camera = PerspectiveCamera::new(35.0, 1.0, 0.1, 100.0);
        let before = *camera.projection_matrix();
        camera.aspect = 16.0 / 9.0;
        assert_eq!(*camera.projection_matrix(), before);
        camera.update_projection_matrix();
        assert!((camera.projection_matrix()[(0, 0)] - before[(0, 0)] * 9.0 / 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_projects_center_to_middle() {
        let camera = PerspectiveCamera::default();
        let view = PerspectiveCamera::view_matrix(&Vector3::new(0.0, 0.0, 6.0));
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &view, 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let camera = PerspectiveCamera::default();
        let view = PerspectiveCamera::view_matrix(&Vector3::new(0.0, 0.0, 6.0));
        assert!(camera
            .project_to_screen(&Point3::new(0.0, 0.0, 10.0), &view, 80, 40)
            .is_none());
    }
}
