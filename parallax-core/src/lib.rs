//! Parallax Core Library - scene model for the scroll-driven toon landing page
//!
//! This library holds everything that does not touch a display: mesh
//! generation, toon material, camera rig, input state, section tracking,
//! tweens and the per-frame update. Frontends forward events to an
//! [`Animator`] and draw through the [`Renderer`] trait.

pub mod animation;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod material;
pub mod projection;
pub mod rig;
pub mod scene;
pub mod section;
pub mod transform;
pub mod tween;
pub mod viewport;

// Re-export commonly used types
pub use animation::{Animator, Renderer, RotationPolicy};
pub use clock::{Clock, FrameTime, FrameTimer, ManualClock};
pub use color::Color;
pub use config::SceneConfig;
pub use error::{CoreError, CoreResult};
pub use geometry::{Mesh, Triangle, Vertex};
pub use input::{CursorState, InputState, ScrollState};
pub use material::{DirectionalLight, GradientMap, SharedMaterial, ToonMaterial};
pub use projection::PerspectiveCamera;
pub use rig::CameraRig;
pub use scene::{Parameter, ParticleField, Scene, SectionMesh, Variant};
pub use section::SectionTracker;
pub use transform::{Rotation, Transform};
pub use viewport::Viewport;
