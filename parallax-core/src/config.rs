//! Scene configuration.
//!
//! Every field has a default, so a config document only needs to name the
//! values it overrides:
//!
//! ```
//! use parallax_core::SceneConfig;
//!
//! let config = SceneConfig::from_json(r##"{ "material_color": "#88ccff" }"##).unwrap();
//! assert_eq!(config.material_color.to_hex(), "#88ccff");
//! assert_eq!(config.objects_distance, 4.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::RotationPolicy;
use crate::color::Color;
use crate::error::CoreResult;
use crate::tween::Ease;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertical spacing between section meshes, in world units
    pub objects_distance: f32,
    pub material_color: Color,
    pub particles_color: Color,
    pub particle_count: usize,
    pub particle_seed: u64,
    pub particle_size: f32,
    /// Overrides the variant's rotation policy
    pub rotation_policy: Option<RotationPolicy>,
    /// Gradient texture location, resolved by the frontend
    pub gradient_url: Option<String>,
    pub light: LightConfig,
    pub camera: CameraConfig,
    pub parallax: ParallaxConfig,
    pub spin: SpinConfig,
    pub section_tween: TweenConfig,
}

impl SceneConfig {
    pub fn from_json(input: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            objects_distance: 4.0,
            material_color: Color::from_rgb8(0xff, 0xed, 0xed),
            particles_color: Color::from_rgb8(0xff, 0xed, 0xed),
            particle_count: 2000,
            particle_seed: 0x5eed,
            particle_size: 0.03,
            rotation_policy: None,
            gradient_url: Some("textures/gradients/5a.jpg".to_string()),
            light: LightConfig::default(),
            camera: CameraConfig::default(),
            parallax: ParallaxConfig::default(),
            spin: SpinConfig::default(),
            section_tween: TweenConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Color::new(1.0, 1.0, 0.0),
            intensity: 1.0,
            position: [1.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Camera distance from the section plane along +Z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 35.0,
            near: 0.1,
            far: 100.0,
            distance: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// World offset per unit of normalized cursor travel
    pub amplitude: f32,
    /// Smoothing rate per second
    pub easing: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            easing: 5.0,
        }
    }
}

/// Idle spin rate in radians per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub x: f32,
    pub y: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self { x: 0.1, y: 0.08 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    /// Rotation added on section entry, radians per axis
    pub rotation: [f32; 3],
    /// Seconds
    pub duration: f32,
    pub ease: Ease,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            rotation: [2.0, 3.0, 1.5],
            duration: 1.5,
            ease: Ease::Power2InOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_default_gradient_asset() {
        assert_eq!(
            SceneConfig::default().gradient_url.as_deref(),
            Some("textures/gradients/5a.jpg")
        );
    }

    #[test]
    fn test_nested_override() {
        let config = SceneConfig::from_json(
            r##"{ "parallax": { "easing": 8.0 }, "light": { "color": "#ffffff" }, "rotation_policy": "absolute" }"##,
        )
        .unwrap();
        assert_eq!(config.parallax.easing, 8.0);
        assert_eq!(config.parallax.amplitude, 0.5);
        assert_eq!(config.light.color, Color::WHITE);
        assert_eq!(config.rotation_policy, Some(RotationPolicy::Absolute));
    }

    #[test]
    fn test_bad_colour_is_a_config_error() {
        let err = SceneConfig::from_json(r#"{ "material_color": "pink" }"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
