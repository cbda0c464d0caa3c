/// Scene graph: section meshes, light and the optional particle field
use nalgebra::{Point3, Vector3};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::animation::RotationPolicy;
use crate::color::Color;
use crate::config::SceneConfig;
use crate::error::{CoreError, CoreResult};
use crate::geometry::Mesh;
use crate::material::{
    DirectionalLight, GradientMap, PointsMaterial, SharedMaterial, ToonMaterial,
};
use crate::transform::{Rotation, Transform};

/// Horizontal placement of the section meshes, alternating sides
const SECTION_X: [f32; 3] = [2.0, -2.0, 2.0];

/// Which flavour of the landing page to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Meshes spin as a function of absolute time; no particles
    Classic,
    /// Accumulated spin, particle field and section-entry tweens
    Sections,
}

impl Variant {
    pub fn rotation_policy(self) -> RotationPolicy {
        match self {
            Variant::Classic => RotationPolicy::Absolute,
            Variant::Sections => RotationPolicy::Accumulated,
        }
    }

    pub fn has_particles(self) -> bool {
        matches!(self, Variant::Sections)
    }

    pub fn tracks_sections(self) -> bool {
        matches!(self, Variant::Sections)
    }
}

impl FromStr for Variant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "1" => Ok(Variant::Classic),
            "sections" | "2" => Ok(Variant::Sections),
            _ => Err(CoreError::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Classic => "classic",
            Variant::Sections => "sections",
        })
    }
}

/// A renderable object placed in one scroll section
#[derive(Debug, Clone)]
pub struct SectionMesh {
    pub geometry: Rc<Mesh>,
    pub material: SharedMaterial,
    pub position: Vector3<f32>,
    pub rotation: Rotation,
}

impl SectionMesh {
    pub fn model_matrix(&self) -> nalgebra::Matrix4<f32> {
        Transform::model_matrix(&self.position, &self.rotation)
    }
}

/// Randomly scattered points spanning every section
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<Point3<f32>>,
    pub material: PointsMaterial,
}

impl ParticleField {
    /// Scatter `count` points over `x, z ∈ [-5, 5)` and the vertical extent of
    /// `sections` sections starting half a section above the first one
    pub fn scatter(count: usize, sections: usize, objects_distance: f32, seed: u64) -> Vec<Point3<f32>> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let span = objects_distance * sections as f32;
        (0..count)
            .map(|_| {
                let x = (rng.f32() - 0.5) * 10.0;
                let y = objects_distance * 0.5 - rng.f32() * span;
                let z = (rng.f32() - 0.5) * 10.0;
                Point3::new(x, y, z)
            })
            .collect()
    }

    /// Flat `[x, y, z]` array for vertex upload
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

/// The two parameters an inspector panel may edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    MaterialColor,
    ParticlesColor,
}

impl Parameter {
    pub const ALL: [Parameter; 2] = [Parameter::MaterialColor, Parameter::ParticlesColor];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::MaterialColor => "materialColor",
            Parameter::ParticlesColor => "particlesColor",
        }
    }
}

impl FromStr for Parameter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| CoreError::UnknownParameter(s.to_string()))
    }
}

pub struct Scene {
    pub material: SharedMaterial,
    pub meshes: Vec<SectionMesh>,
    pub light: DirectionalLight,
    pub particles: Option<ParticleField>,
}

impl Scene {
    /// Build the three section meshes around one shared material.
    ///
    /// Without a gradient the material renders with the two-tone fallback.
    pub fn build(config: &SceneConfig, variant: Variant, gradient: Option<GradientMap>) -> Self {
        let material: SharedMaterial = Rc::new(RefCell::new(ToonMaterial {
            color: config.material_color,
            gradient_map: gradient,
        }));

        let geometries = [
            Mesh::torus(1.0, 0.4, 16, 69),
            Mesh::cone(1.0, 2.0, 32),
            Mesh::torus_knot(0.8, 0.35, 64, 16, 2, 3),
        ];

        let meshes: Vec<SectionMesh> = geometries
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| SectionMesh {
                geometry: Rc::new(geometry),
                material: Rc::clone(&material),
                position: Vector3::new(SECTION_X[i], -config.objects_distance * i as f32, 0.0),
                rotation: Rotation::zero(),
            })
            .collect();

        let particles = variant.has_particles().then(|| ParticleField {
            positions: ParticleField::scatter(
                config.particle_count,
                meshes.len(),
                config.objects_distance,
                config.particle_seed,
            ),
            material: PointsMaterial {
                color: config.particles_color,
                size: config.particle_size,
                size_attenuation: true,
            },
        });

        log::info!(
            "built {} scene: {} meshes, {} particles, gradient: {}",
            variant,
            meshes.len(),
            particles.as_ref().map_or(0, |p| p.positions.len()),
            material.borrow().gradient_map.is_some()
        );

        Self {
            material,
            meshes,
            light: DirectionalLight::from_config(&config.light),
            particles,
        }
    }

    /// Install a gradient after the scene is built (asynchronous loads)
    pub fn set_gradient(&self, gradient: Option<GradientMap>) {
        self.material.borrow_mut().gradient_map = gradient;
    }

    pub fn parameter(&self, parameter: Parameter) -> Option<Color> {
        match parameter {
            Parameter::MaterialColor => Some(self.material.borrow().color),
            Parameter::ParticlesColor => self.particles.as_ref().map(|p| p.material.color),
        }
    }

    /// Apply an inspector edit. Setting the particle colour on a scene without
    /// particles is accepted and has no effect.
    pub fn set_parameter(&mut self, parameter: Parameter, color: Color) {
        match parameter {
            Parameter::MaterialColor => self.material.borrow_mut().color = color,
            Parameter::ParticlesColor => {
                if let Some(particles) = &mut self.particles {
                    particles.material.color = color;
                }
            }
        }
    }

    pub fn set_parameter_str(&mut self, name: &str, value: &str) -> CoreResult<()> {
        let parameter: Parameter = name.parse()?;
        let color = Color::from_hex(value)?;
        self.set_parameter(parameter, color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_layout() {
        let scene = Scene::build(&SceneConfig::default(), Variant::Classic, None);
        assert_eq!(scene.meshes.len(), 3);
        let ys: Vec<f32> = scene.meshes.iter().map(|m| m.position.y).collect();
        assert_eq!(ys, vec![0.0, -4.0, -8.0]);
        let xs: Vec<f32> = scene.meshes.iter().map(|m| m.position.x).collect();
        assert_eq!(xs, vec![2.0, -2.0, 2.0]);
        assert!(scene.particles.is_none());
    }

    #[test]
    fn test_meshes_share_one_material() {
        let mut scene = Scene::build(&SceneConfig::default(), Variant::Classic, None);
        for mesh in &scene.meshes {
            assert!(Rc::ptr_eq(&mesh.material, &scene.material));
        }
        scene.set_parameter_str("materialColor", "#00ff00").unwrap();
        for mesh in &scene.meshes {
            assert_eq!(mesh.material.borrow().color, Color::new(0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn test_particles_span_all_sections() {
        let scene = Scene::build(&SceneConfig::default(), Variant::Sections, None);
        let particles = scene.particles.as_ref().unwrap();
        assert_eq!(particles.positions.len(), 2000);
        for p in &particles.positions {
            assert!(p.x >= -5.0 && p.x <= 5.0);
            assert!(p.z >= -5.0 && p.z <= 5.0);
            assert!(p.y <= 2.0 && p.y >= 2.0 - 12.0);
        }
        assert_eq!(particles.flat_positions().len(), 6000);
    }

    #[test]
    fn test_scatter_is_seeded() {
        let a = ParticleField::scatter(10, 3, 4.0, 7);
        let b = ParticleField::scatter(10, 3, 4.0, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_particles_colour_parameter() {
        let mut scene = Scene::build(&SceneConfig::default(), Variant::Sections, None);
        scene.set_parameter(Parameter::ParticlesColor, Color::WHITE);
        assert_eq!(scene.parameter(Parameter::ParticlesColor), Some(Color::WHITE));
        assert_ne!(scene.parameter(Parameter::MaterialColor), Some(Color::WHITE));
    }

    #[test]
    fn test_unknown_parameter_and_variant() {
        let mut scene = Scene::build(&SceneConfig::default(), Variant::Classic, None);
        assert!(matches!(
            scene.set_parameter_str("lightColor", "#ffffff"),
            Err(CoreError::UnknownParameter(_))
        ));
        assert!(matches!("three".parse::<Variant>(), Err(CoreError::UnknownVariant(_))));
        assert_eq!("Sections".parse::<Variant>().unwrap(), Variant::Sections);
    }
}
