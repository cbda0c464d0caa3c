/// Viewport dimensions and pixel-ratio clamping
use crate::projection::PerspectiveCamera;

/// Upper bound for the drawing surface pixel ratio
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Clamp a device pixel ratio to `(0, MAX_PIXEL_RATIO]`
pub fn clamp_pixel_ratio(device_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Window size in CSS pixels (or terminal units) plus the display density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            device_pixel_ratio,
        }
    }

    pub fn pixel_ratio(&self) -> f32 {
        clamp_pixel_ratio(self.device_pixel_ratio)
    }

    /// Camera aspect ratio, or `None` for a collapsed viewport
    pub fn aspect(&self) -> Option<f32> {
        if self.height > 0.0 && self.width > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Drawing-buffer size in device pixels
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            (self.width * ratio).round() as u32,
            (self.height * ratio).round() as u32,
        )
    }

    /// Apply a resize and refresh the camera projection.
    ///
    /// Returns `true` when the stored size, pixel ratio or camera aspect
    /// changed; repeating the same resize returns `false`.
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        let next = Viewport::new(width, height, device_pixel_ratio);
        let mut changed = next != *self;
        *self = next;

        if let Some(aspect) = self.aspect() {
            if aspect != camera.aspect {
                camera.aspect = aspect;
                camera.update_projection_matrix();
                changed = true;
            }
        }

        changed
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}
