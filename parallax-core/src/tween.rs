/// Eased rotation tweens driven by frame delta time
use serde::{Deserialize, Serialize};

use crate::transform::Rotation;

/// Easing curves over normalized time in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    /// Quadratic ease-in-out
    #[default]
    Power2InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Adds `delta` to one mesh's rotation over `duration` seconds.
///
/// Each step applies only the eased increment since the previous step, so the
/// tween composes with the per-frame spin instead of overwriting it.
#[derive(Debug, Clone)]
pub struct RotationTween {
    pub mesh: usize,
    pub delta: Rotation,
    pub duration: f32,
    pub ease: Ease,
    elapsed: f32,
    applied: f32,
}

impl RotationTween {
    pub fn new(mesh: usize, delta: Rotation, duration: f32, ease: Ease) -> Self {
        Self {
            mesh,
            delta,
            duration,
            ease,
            elapsed: 0.0,
            applied: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.applied >= 1.0
    }

    /// Advance by `dt`, returning the rotation increment for this step
    pub fn step(&mut self, dt: f32) -> Rotation {
        if self.is_finished() {
            return Rotation::zero();
        }
        self.elapsed += dt.max(0.0);
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        let eased = if t >= 1.0 { 1.0 } else { self.ease.apply(t) };
        let fraction = eased - self.applied;
        self.applied = eased;
        Rotation::new(
            self.delta.x * fraction,
            self.delta.y * fraction,
            self.delta.z * fraction,
        )
    }
}

/// Running tweens, advanced once per frame
#[derive(Debug, Clone, Default)]
pub struct TweenSet {
    active: Vec<RotationTween>,
}

impl TweenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, tween: RotationTween) {
        self.active.push(tween);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Step every tween, hand each increment to `apply` with its mesh index,
    /// then drop finished tweens
    pub fn advance(&mut self, dt: f32, mut apply: impl FnMut(usize, Rotation)) {
        for tween in &mut self.active {
            let step = tween.step(dt);
            apply(tween.mesh, step);
        }
        self.active.retain(|tween| !tween.is_finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power2_in_out_shape() {
        let ease = Ease::Power2InOut;
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((ease.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((ease.apply(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_tween_reaches_full_delta() {
        let mut tween = RotationTween::new(0, Rotation::new(2.0, 3.0, 1.5), 1.5, Ease::Power2InOut);
        let mut total = Rotation::zero();
        for _ in 0..100 {
            let step = tween.step(1.0 / 60.0);
            total.rotate(step.x, step.y, step.z);
        }
        assert!(tween.is_finished());
        assert!((total.x - 2.0).abs() < 1e-5);
        assert!((total.y - 3.0).abs() < 1e-5);
        assert!((total.z - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_halfway_is_half_delta() {
        let mut tween = RotationTween::new(0, Rotation::new(2.0, 0.0, 0.0), 1.5, Ease::Power2InOut);
        let step = tween.step(0.75);
        assert!((step.x - 1.0).abs() < 1e-6);
        assert!(!tween.is_finished());
    }

    #[test]
    fn test_set_drops_finished_tweens() {
        let mut set = TweenSet::new();
        set.start(RotationTween::new(1, Rotation::new(1.0, 0.0, 0.0), 0.5, Ease::Linear));
        set.start(RotationTween::new(2, Rotation::new(0.0, 1.0, 0.0), 1.0, Ease::Linear));

        let mut totals = [Rotation::zero(); 3];
        let mut apply = |mesh: usize, step: Rotation| totals[mesh].rotate(step.x, step.y, step.z);
        set.advance(0.5, &mut apply);
        assert_eq!(set.len(), 1);
        set.advance(0.5, &mut apply);
        assert!(set.is_empty());

        assert_eq!(totals[0], Rotation::zero());
        assert!((totals[1].x - 1.0).abs() < 1e-6);
        assert!((totals[2].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut tween = RotationTween::new(0, Rotation::new(1.0, 0.0, 0.0), 0.0, Ease::Linear);
        assert_eq!(tween.step(0.0).x, 1.0);
        assert!(tween.is_finished());
        assert_eq!(tween.step(1.0).x, 0.0);
    }
}
