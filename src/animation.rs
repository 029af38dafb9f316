//! Per-tick animation math for the bubble scene.
//!
//! The render loop calls [`AnimationState::tick`] once per frame with the
//! monotonic timestamp in milliseconds; the returned [`FramePose`] is written
//! into the scene transforms and the glow material before drawing. The loop
//! reschedules itself unconditionally until its [`LoopToken`] is cancelled —
//! it never terminates on its own.

use std::cell::Cell;
use std::rc::Rc;

use crate::params::ParameterState;

/// Milliseconds-to-phase conversion factor.
pub const TIME_SCALE: f64 = 0.0005;

/// Glow mesh scale relative to the bubble. Invariant: every pose keeps the
/// glow at exactly this multiple of the bubble scale.
pub const GLOW_SCALE_RATIO: f32 = 1.3;

/// Frequency multiplier for the glow opacity oscillation.
const GLOW_OPACITY_RATE: f64 = 7.0;

/// Floor applied to the oscillating glow opacity.
const GLOW_OPACITY_FLOOR: f32 = 0.3;

/// Everything one tick needs to pose the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePose {
    /// Animation phase, `now_ms * 0.0005 * speed`.
    pub phase: f32,
    /// Uniform scale applied to the bubble mesh.
    pub bubble_scale: f32,
    /// Uniform scale applied to the glow mesh, `bubble_scale * 1.3`.
    pub glow_scale: f32,
    /// Glow material opacity, always in [0.3, 1.2].
    pub glow_opacity: f32,
}

/// Animation state read by the scheduler each tick.
///
/// Holds the slider parameters; sliders overwrite them at any point between
/// ticks and the next tick picks up the latest values (single-threaded
/// last-write-wins, see [`crate::params`]).
#[derive(Clone, Debug, Default)]
pub struct AnimationState {
    pub params: ParameterState,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the pose for the tick scheduled at `now_ms`.
    ///
    /// Phase is accumulated in f64 before narrowing: timestamps grow without
    /// bound while the loop runs, and an f32 product would quantize the
    /// oscillation after a few hours.
    pub fn tick(&self, now_ms: f64) -> FramePose {
        let p = &self.params;
        let phase = now_ms * TIME_SCALE * p.speed() as f64;
        let bubble_scale =
            (1.0 + (phase * p.spikes() as f64).sin() as f32 * 0.1) * p.processing();
        let glow_scale = bubble_scale * GLOW_SCALE_RATIO;
        let glow_opacity =
            ((phase * GLOW_OPACITY_RATE).sin() as f32 * 0.5 + 0.7).max(GLOW_OPACITY_FLOOR);

        FramePose {
            phase: phase as f32,
            bubble_scale,
            glow_scale,
            glow_opacity,
        }
    }
}

/// Cancellation token for the self-rescheduling render loop.
///
/// The loop checks the token before requesting the next frame; teardown flips
/// it. All readers and the writer share the UI/render thread, so a `Cell`
/// suffices — cloning hands out another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct LoopToken {
    cancelled: Rc<Cell<bool>>,
}

impl LoopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the loop: no tick observing this token reschedules afterwards.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_at_time_zero() {
        // speed = spikes = processing = 1, t = 0: scale 1, opacity 0.7.
        let state = AnimationState::new();
        let pose = state.tick(0.0);
        assert_eq!(pose.phase, 0.0);
        assert_eq!(pose.bubble_scale, 1.0);
        assert_eq!(pose.glow_scale, 1.3);
        assert!((pose.glow_opacity - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_pose_with_doubled_speed() {
        // phase = 2000 * 0.0005 * 2 = 2.0, scale = 1 + sin(2.0) * 0.1.
        let mut state = AnimationState::new();
        state.params.set_speed(2.0);
        let pose = state.tick(2000.0);
        assert!((pose.phase - 2.0).abs() < 1e-6);
        assert!((pose.bubble_scale - 1.0909297).abs() < 1e-4);
    }

    #[test]
    fn test_scale_bounds_across_parameter_grid() {
        // scale(t) must stay within [0.9 * processing, 1.1 * processing].
        let mut state = AnimationState::new();
        for speed in [1.0, 5.5, 10.0] {
            for spikes in [1.0, 5.5, 10.0] {
                for processing in [1.0, 5.5, 10.0] {
                    state.params.set_speed(speed);
                    state.params.set_spikes(spikes);
                    state.params.set_processing(processing);
                    for step in 0..500 {
                        let pose = state.tick(step as f64 * 16.7);
                        assert!(
                            pose.bubble_scale >= 0.9 * processing - 1e-4
                                && pose.bubble_scale <= 1.1 * processing + 1e-4,
                            "scale {} out of range for processing {}",
                            pose.bubble_scale,
                            processing
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_glow_tracks_bubble_exactly() {
        let mut state = AnimationState::new();
        state.params.set_speed(3.0);
        state.params.set_spikes(7.0);
        state.params.set_processing(2.0);
        for step in 0..200 {
            let pose = state.tick(step as f64 * 33.3);
            assert_eq!(pose.glow_scale, pose.bubble_scale * GLOW_SCALE_RATIO);
        }
    }

    #[test]
    fn test_glow_opacity_bounds() {
        let mut state = AnimationState::new();
        state.params.set_speed(10.0);
        for step in 0..2000 {
            let pose = state.tick(step as f64 * 7.0);
            assert!(
                pose.glow_opacity >= 0.3 && pose.glow_opacity <= 1.2,
                "opacity {} out of range",
                pose.glow_opacity
            );
        }
    }

    #[test]
    fn test_parameter_write_visible_next_tick() {
        let mut state = AnimationState::new();
        let before = state.tick(1000.0);
        state.params.set_speed(4.0);
        let after = state.tick(1000.0);
        assert!((after.phase - before.phase * 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_loop_token_cancellation() {
        let token = LoopToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        assert!(token.is_cancelled());
    }
}
