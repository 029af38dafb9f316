//! Slider-backed animation parameters.
//!
//! The host exposes three range controls (speed, spikes, processing), each
//! emitting values in [1, 10]. Writes are last-write-wins with no queuing or
//! debouncing; the render loop reads whatever was most recently written when
//! its tick runs. All access happens on the one UI/render thread, so plain
//! fields are sufficient — no atomics, no locks.

use serde::Deserialize;

/// Lower bound of every slider parameter.
pub const PARAM_MIN: f32 = 1.0;
/// Upper bound of every slider parameter.
pub const PARAM_MAX: f32 = 10.0;

fn default_param() -> f32 {
    PARAM_MIN
}

/// The three user-adjustable scalars driving the animation.
///
/// Setters clamp to [`PARAM_MIN`, `PARAM_MAX`] so the scale and opacity
/// invariants hold no matter what a misbehaving control emits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterState {
    speed: f32,
    spikes: f32,
    processing: f32,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            speed: PARAM_MIN,
            spikes: PARAM_MIN,
            processing: PARAM_MIN,
        }
    }
}

impl ParameterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn spikes(&self) -> f32 {
        self.spikes
    }

    pub fn processing(&self) -> f32 {
        self.processing
    }

    pub fn set_speed(&mut self, value: f32) {
        self.speed = value.clamp(PARAM_MIN, PARAM_MAX);
    }

    pub fn set_spikes(&mut self, value: f32) {
        self.spikes = value.clamp(PARAM_MIN, PARAM_MAX);
    }

    pub fn set_processing(&mut self, value: f32) {
        self.processing = value.clamp(PARAM_MIN, PARAM_MAX);
    }
}

/// Parameter values loaded from a JSON preset file.
///
/// Used by the offline renderer (`bubble render --params file.json`); fields
/// not present in the file fall back to the slider default.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ParameterPreset {
    #[serde(default = "default_param")]
    pub speed: f32,
    #[serde(default = "default_param")]
    pub spikes: f32,
    #[serde(default = "default_param")]
    pub processing: f32,
}

impl ParameterPreset {
    /// Apply the preset through the clamping setters.
    pub fn apply(&self, params: &mut ParameterState) {
        params.set_speed(self.speed);
        params.set_spikes(self.spikes);
        params.set_processing(self.processing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ParameterState::new();
        assert_eq!(params.speed(), 1.0);
        assert_eq!(params.spikes(), 1.0);
        assert_eq!(params.processing(), 1.0);
    }

    #[test]
    fn test_set_in_range() {
        let mut params = ParameterState::new();
        params.set_speed(4.5);
        params.set_spikes(10.0);
        params.set_processing(1.0);
        assert_eq!(params.speed(), 4.5);
        assert_eq!(params.spikes(), 10.0);
        assert_eq!(params.processing(), 1.0);
    }

    #[test]
    fn test_clamp_below_lower_bound() {
        let mut params = ParameterState::new();
        params.set_speed(0.0);
        params.set_spikes(-3.0);
        assert_eq!(params.speed(), PARAM_MIN);
        assert_eq!(params.spikes(), PARAM_MIN);
    }

    #[test]
    fn test_clamp_above_upper_bound() {
        let mut params = ParameterState::new();
        params.set_processing(11.0);
        assert_eq!(params.processing(), PARAM_MAX);
        params.set_processing(1e9);
        assert_eq!(params.processing(), PARAM_MAX);
    }

    #[test]
    fn test_last_write_wins() {
        let mut params = ParameterState::new();
        params.set_speed(3.0);
        params.set_speed(7.0);
        assert_eq!(params.speed(), 7.0);
    }

    #[test]
    fn test_preset_apply_clamps() {
        let preset: ParameterPreset = serde_json::from_str(r#"{"speed": 20.0}"#).unwrap();
        let mut params = ParameterState::new();
        preset.apply(&mut params);
        assert_eq!(params.speed(), PARAM_MAX);
        assert_eq!(params.spikes(), PARAM_MIN);
        assert_eq!(params.processing(), PARAM_MIN);
    }
}
