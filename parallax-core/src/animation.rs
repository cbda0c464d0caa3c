//! Frame driver for the scroll scene.
//!
//! [`Animator`] owns the scene, camera rig, viewport and input state. Hosts
//! forward their events to the `on_*` handlers and call [`Animator::frame`]
//! once per display refresh; headless callers feed synthetic deltas through
//! [`Animator::step`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{FrameTime, FrameTimer};
use crate::color::Color;
use crate::config::SceneConfig;
use crate::error::CoreResult;
use crate::input::{CursorState, InputState};
use crate::material::GradientMap;
use crate::rig::CameraRig;
use crate::scene::{Parameter, Scene, Variant};
use crate::section::SectionTracker;
use crate::transform::Rotation;
use crate::tween::{RotationTween, TweenSet};
use crate::viewport::Viewport;

/// How idle spin relates to time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// `rotation = elapsed * spin (+ tween offset)`, independent of frame history
    Absolute,
    /// `rotation += delta * spin`, tweens add directly to the rotation
    Accumulated,
}

/// Drawing backend for one frame of the scene
pub trait Renderer {
    type Error: fmt::Display;

    fn resize(&mut self, viewport: &Viewport) -> Result<(), Self::Error>;

    fn render(&mut self, scene: &Scene, rig: &CameraRig, viewport: &Viewport) -> Result<(), Self::Error>;
}

pub struct Animator {
    scene: Scene,
    rig: CameraRig,
    viewport: Viewport,
    input: InputState,
    tracker: Option<SectionTracker>,
    tweens: TweenSet,
    /// Tween contributions kept apart from spin under `Absolute`
    offsets: Vec<Rotation>,
    timer: FrameTimer,
    policy: RotationPolicy,
    config: SceneConfig,
}

impl Animator {
    pub fn new(
        config: SceneConfig,
        variant: Variant,
        viewport: Viewport,
        gradient: Option<GradientMap>,
    ) -> Self {
        let scene = Scene::build(&config, variant, gradient);
        let rig = CameraRig::new(&config.camera, config.parallax, viewport.aspect().unwrap_or(1.0));
        let tracker = variant
            .tracks_sections()
            .then(|| SectionTracker::new(scene.meshes.len()));
        let policy = config.rotation_policy.unwrap_or_else(|| variant.rotation_policy());

        Self {
            offsets: vec![Rotation::zero(); scene.meshes.len()],
            scene,
            rig,
            viewport,
            input: InputState::default(),
            tracker,
            tweens: TweenSet::new(),
            timer: FrameTimer::new(),
            policy,
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    pub fn current_section(&self) -> Option<usize> {
        self.tracker.as_ref().map(SectionTracker::current)
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    /// Returns `true` when the viewport or camera projection changed
    pub fn on_resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> bool {
        self.viewport
            .resize(width, height, device_pixel_ratio, &mut self.rig.camera)
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.input.cursor = CursorState::from_client(client_x, client_y, &self.viewport);
    }

    /// Store the scroll offset and, when sections are tracked, start the entry
    /// tween for a newly reached section. Returns that section.
    pub fn on_scroll(&mut self, scroll_y: f32) -> Option<usize> {
        self.input.scroll.set(scroll_y);
        let entered = self
            .tracker
            .as_mut()?
            .update(self.input.scroll.scroll_y, self.viewport.height)?;

        let tween = &self.config.section_tween;
        let [dx, dy, dz] = tween.rotation;
        self.tweens.start(RotationTween::new(
            entered,
            Rotation::new(dx, dy, dz),
            tween.duration,
            tween.ease,
        ));
        log::debug!("entered section {}", entered);
        Some(entered)
    }

    pub fn set_gradient(&mut self, gradient: Option<GradientMap>) {
        self.scene.set_gradient(gradient);
    }

    pub fn parameter(&self, parameter: Parameter) -> Option<Color> {
        self.scene.parameter(parameter)
    }

    pub fn set_parameter(&mut self, parameter: Parameter, color: Color) {
        self.scene.set_parameter(parameter, color);
    }

    pub fn set_parameter_str(&mut self, name: &str, value: &str) -> CoreResult<()> {
        self.scene.set_parameter_str(name, value)
    }

    /// Advance the scene to `elapsed` seconds without drawing
    pub fn update(&mut self, elapsed: f32) -> FrameTime {
        let frame = self.timer.tick(elapsed);
        self.advance(frame);
        frame
    }

    /// Advance by a synthetic delta
    pub fn step(&mut self, dt: f32) -> FrameTime {
        self.update(self.timer.previous() + dt.max(0.0))
    }

    /// Update to `elapsed` and draw one frame
    pub fn frame<R: Renderer>(&mut self, elapsed: f32, renderer: &mut R) -> Result<FrameTime, R::Error> {
        let frame = self.update(elapsed);
        renderer.render(&self.scene, &self.rig, &self.viewport)?;
        Ok(frame)
    }

    fn advance(&mut self, frame: FrameTime) {
        let spin = self.config.spin;
        match self.policy {
            RotationPolicy::Absolute => {
                let offsets = &mut self.offsets;
                self.tweens.advance(frame.delta, |i, step| {
                    if let Some(offset) = offsets.get_mut(i) {
                        offset.rotate(step.x, step.y, step.z);
                    }
                });
                for (mesh, offset) in self.scene.meshes.iter_mut().zip(&self.offsets) {
                    mesh.rotation = Rotation::new(
                        frame.elapsed * spin.x + offset.x,
                        frame.elapsed * spin.y + offset.y,
                        offset.z,
                    );
                }
            }
            RotationPolicy::Accumulated => {
                let meshes = &mut self.scene.meshes;
                self.tweens.advance(frame.delta, |i, step| {
                    if let Some(mesh) = meshes.get_mut(i) {
                        mesh.rotation.rotate(step.x, step.y, step.z);
                    }
                });
                for mesh in meshes.iter_mut() {
                    mesh.rotation.rotate(frame.delta * spin.x, frame.delta * spin.y, 0.0);
                }
            }
        }

        self.rig.follow_scroll(
            &self.input.scroll,
            self.viewport.height,
            self.config.objects_distance,
        );
        self.rig.smooth_parallax(&self.input.cursor, frame.delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Counts draw calls and remembers the last camera position
    #[derive(Default)]
    struct RecordingRenderer {
        frames: usize,
        last_camera_y: f32,
    }

    impl Renderer for RecordingRenderer {
        type Error = Infallible;

        fn resize(&mut self, _viewport: &Viewport) -> Result<(), Self::Error> {
            Ok(())
        }

        fn render(&mut self, _scene: &Scene, rig: &CameraRig, _viewport: &Viewport) -> Result<(), Self::Error> {
            self.frames += 1;
            self.last_camera_y = rig.camera.position.y;
            Ok(())
        }
    }

    fn full_hd(variant: Variant) -> Animator {
        Animator::new(
            SceneConfig::default(),
            variant,
            Viewport::new(1920.0, 1080.0, 1.0),
            None,
        )
    }

    #[test]
    fn test_end_to_end_scroll_and_parallax() {
        let mut animator = full_hd(Variant::Classic);
        let mut renderer = RecordingRenderer::default();

        animator.on_scroll(1080.0);
        animator.on_pointer_move(1440.0, 270.0);
        assert_eq!(animator.input().cursor, CursorState::new(0.25, -0.25));

        let frame = animator.frame(0.1, &mut renderer).unwrap();
        assert!((frame.delta - 0.1).abs() < 1e-6);
        assert_eq!(renderer.frames, 1);
        assert!((renderer.last_camera_y + 4.0).abs() < 1e-6);
        assert!((animator.rig().group.x - 0.0625).abs() < 1e-6);
        assert!((animator.rig().group.y - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn test_absolute_rotation_ignores_history() {
        let mut animator = full_hd(Variant::Classic);
        for elapsed in [0.3, 7.0, 2.5] {
            animator.update(elapsed);
        }
        for mesh in &animator.scene().meshes {
            assert_eq!(mesh.rotation.x, 2.5 * 0.1);
            assert_eq!(mesh.rotation.y, 2.5 * 0.08);
        }
    }

    #[test]
    fn test_accumulated_rotation_sums_deltas() {
        let mut animator = full_hd(Variant::Sections);
        let deltas = [0.016, 0.033, 0.1, 0.0, 0.25, 0.016];
        for dt in deltas {
            animator.step(dt);
        }
        let total: f32 = deltas.iter().sum();
        for mesh in &animator.scene().meshes {
            assert!((mesh.rotation.x - total * 0.1).abs() < 1e-5);
            assert!((mesh.rotation.y - total * 0.08).abs() < 1e-5);
        }
    }

    #[test]
    fn test_section_entry_tweens_only_that_mesh() {
        let mut animator = full_hd(Variant::Sections);
        assert_eq!(animator.on_scroll(1080.0), Some(1));
        assert_eq!(animator.on_scroll(1100.0), None);
        assert_eq!(animator.active_tweens(), 1);

        for _ in 0..120 {
            animator.step(1.0 / 60.0);
        }
        assert_eq!(animator.active_tweens(), 0);

        let spin_x = 2.0 * 0.1;
        let meshes = &animator.scene().meshes;
        assert!((meshes[0].rotation.x - spin_x).abs() < 1e-4);
        assert!((meshes[1].rotation.x - (spin_x + 2.0)).abs() < 1e-4);
        assert!((meshes[1].rotation.z - 1.5).abs() < 1e-4);
        assert!((meshes[2].rotation.x - spin_x).abs() < 1e-4);
    }

    #[test]
    fn test_scrolling_past_the_end_is_clamped() {
        let mut animator = full_hd(Variant::Sections);
        assert_eq!(animator.on_scroll(50_000.0), Some(2));
        assert_eq!(animator.current_section(), Some(2));
    }

    #[test]
    fn test_classic_has_no_tracker() {
        let mut animator = full_hd(Variant::Classic);
        assert_eq!(animator.on_scroll(1080.0), None);
        assert_eq!(animator.current_section(), None);
        assert_eq!(animator.policy(), RotationPolicy::Absolute);
    }

    #[test]
    fn test_absolute_policy_keeps_tween_offsets() {
        let config = SceneConfig {
            rotation_policy: Some(RotationPolicy::Absolute),
            ..SceneConfig::default()
        };
        let mut animator = Animator::new(config, Variant::Sections, Viewport::new(800.0, 600.0, 1.0), None);
        animator.on_scroll(600.0);
        animator.update(1.0);
        animator.update(3.0);
        let mesh = &animator.scene().meshes[1];
        assert!((mesh.rotation.x - (3.0 * 0.1 + 2.0)).abs() < 1e-5);
        assert!((mesh.rotation.y - (3.0 * 0.08 + 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_collapsed_viewport_is_guarded() {
        let mut animator = full_hd(Variant::Sections);
        animator.on_resize(1920.0, 0.0, 1.0);
        assert_eq!(animator.on_scroll(4000.0), None);
        animator.step(0.1);
        assert_eq!(animator.rig().camera.position.y, 0.0);
        assert!(animator.rig().camera.position.y.is_finite());
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut animator = full_hd(Variant::Classic);
        assert!(animator.on_resize(1000.0, 500.0, 3.0));
        assert!((animator.rig().camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(animator.viewport().surface_size(), (2000, 1000));
        assert!(!animator.on_resize(1000.0, 500.0, 3.0));
    }

    #[test]
    fn test_inspector_parameters() {
        let mut animator = full_hd(Variant::Sections);
        animator.set_parameter_str("particlesColor", "#112233").unwrap();
        assert_eq!(
            animator.parameter(Parameter::ParticlesColor).map(Color::to_hex),
            Some("#112233".to_string())
        );
    }
}
