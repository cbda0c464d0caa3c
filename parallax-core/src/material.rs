/// Toon material, gradient lookup map and scene lights
use nalgebra::Vector3;
use std::cell::RefCell;
use std::rc::Rc;

use crate::color::Color;
use crate::config::LightConfig;
use crate::error::{CoreError, CoreResult};

/// One-dimensional lookup from lighting coordinate to tone.
///
/// Always sampled with nearest filtering and without mipmaps, so the toon
/// bands keep hard edges.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMap {
    levels: Vec<u8>,
}

impl GradientMap {
    pub fn from_levels(levels: Vec<u8>) -> CoreResult<Self> {
        if levels.is_empty() {
            return Err(CoreError::EmptyGradient);
        }
        Ok(Self { levels })
    }

    /// Decode an encoded image (PNG or JPEG); the middle row is the ramp
    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let image = image::load_from_memory(bytes)?.to_luma8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CoreError::EmptyGradient);
        }
        let row = height / 2;
        let levels = (0..width).map(|x| image.get_pixel(x, row)[0]).collect();
        Self::from_levels(levels)
    }

    pub fn width(&self) -> usize {
        self.levels.len()
    }

    /// Raw single-channel texels, for uploading to a GPU texture
    pub fn texels(&self) -> &[u8] {
        &self.levels
    }

    /// Nearest texel at a coordinate in [0, 1]
    pub fn sample(&self, coord: f32) -> f32 {
        let width = self.levels.len();
        let x = coord.clamp(0.0, 1.0) * width as f32;
        self.levels[(x as usize).min(width - 1)] as f32 / 255.0
    }
}

/// Tone for an untextured toon material: two bands split at 0.7
pub const FALLBACK_DARK_TONE: f32 = 0.7;

/// Toon-shaded surface material
#[derive(Debug, Clone)]
pub struct ToonMaterial {
    pub color: Color,
    pub gradient_map: Option<GradientMap>,
}

impl ToonMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            gradient_map: None,
        }
    }

    /// Lighting tone for a surface normal facing `n_dot_l` toward the light
    pub fn tone(&self, n_dot_l: f32) -> f32 {
        let coord = n_dot_l * 0.5 + 0.5;
        match &self.gradient_map {
            Some(map) => map.sample(coord),
            None if coord < 0.7 => FALLBACK_DARK_TONE,
            None => 1.0,
        }
    }

    /// Final shaded colour under one directional light
    pub fn shade(&self, normal: &Vector3<f32>, light: &DirectionalLight) -> Color {
        let tone = self.tone(normal.dot(&light.direction()));
        self.color
            .modulate(light.color)
            .scale(light.intensity * tone)
    }
}

/// One material instance referenced by every mesh that uses it
pub type SharedMaterial = Rc<RefCell<ToonMaterial>>;

/// Flat-coloured point sprites
#[derive(Debug, Clone)]
pub struct PointsMaterial {
    pub color: Color,
    pub size: f32,
    pub size_attenuation: bool,
}

/// Light shining from `position` toward the origin
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl DirectionalLight {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            color: config.color,
            intensity: config.intensity,
            position: Vector3::from(config.position),
        }
    }

    /// Unit vector pointing from the surface toward the light
    pub fn direction(&self) -> Vector3<f32> {
        self.position.try_normalize(1e-9).unwrap_or_else(Vector3::z)
    }
}
