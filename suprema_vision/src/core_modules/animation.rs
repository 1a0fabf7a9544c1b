// THEORY:
// Every element of the composition drifts on its own continuous clock. There is no
// simulation state: the transform of an element at time `t` is a closed-form
// function of the animation parameters, the element's resting pose and its index in
// the draw list. Rendering a frame is therefore just evaluating that function.
//
// Motion families (each can be toggled per axis):
// - Float:   y follows sin, x follows a slower cos at 30% of the amplitude
// - Rotate:  x and z wobble around zero, y spins continuously
// - Breathe: the uniform scale pulses around 1
//
// Each element is phase-shifted by 0.7 rad per index so the shapes never move in
// lockstep. `AnimationParams` is a plain value record; whoever owns the scene owns
// the record and threads it through explicitly.

use crate::core_modules::placement::SceneElement;
use crate::error::PipelineError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Phase shift between consecutive elements, in radians.
pub const PHASE_STEP: f32 = 0.7;

/// Tuning knobs of the floating motion. Missing fields deserialize to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub float_x_enabled: bool,
    pub float_y_enabled: bool,
    pub rotation_speed: f32,
    pub rotation_amplitude: f32,
    pub rotation_x_enabled: bool,
    pub rotation_y_enabled: bool,
    pub rotation_z_enabled: bool,
    pub breathe_speed: f32,
    pub breathe_amplitude: f32,
    pub breathe_enabled: bool,
    /// Multiplier on the wall clock.
    pub time_scale: f32,
    /// Consumed by the camera rig, not by element motion.
    pub auto_rotate_camera: bool,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            float_speed: 0.4,
            float_amplitude: 0.3,
            float_x_enabled: true,
            float_y_enabled: true,
            rotation_speed: 0.15,
            rotation_amplitude: 0.15,
            rotation_x_enabled: true,
            rotation_y_enabled: true,
            rotation_z_enabled: true,
            breathe_speed: 0.6,
            breathe_amplitude: 0.08,
            breathe_enabled: true,
            time_scale: 1.0,
            auto_rotate_camera: false,
        }
    }
}

impl AnimationParams {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks every continuous knob against its accepted range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let checks: [(&str, f32, RangeInclusive<f32>); 7] = [
            ("float_speed", self.float_speed, 0.0..=2.0),
            ("float_amplitude", self.float_amplitude, 0.0..=1.0),
            ("rotation_speed", self.rotation_speed, 0.0..=0.5),
            ("rotation_amplitude", self.rotation_amplitude, 0.0..=0.5),
            ("breathe_speed", self.breathe_speed, 0.0..=2.0),
            ("breathe_amplitude", self.breathe_amplitude, 0.0..=0.3),
            ("time_scale", self.time_scale, 0.0..=3.0),
        ];
        for (name, value, range) in checks {
            if !range.contains(&value) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} = {} is outside {:?}",
                    name, value, range
                )));
            }
        }
        Ok(())
    }
}

/// The pose of one element at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementMotion {
    pub position: Vec3,
    /// Euler angles in radians, applied in x, y, z order.
    pub rotation: Vec3,
    pub scale: f32,
}

impl ElementMotion {
    /// Evaluates the transform of `element`, drawn at `index`, `time` seconds after
    /// the clock started.
    pub fn evaluate(params: &AnimationParams, element: &SceneElement, index: usize, time: f32) -> Self {
        let t = time * params.time_scale;
        let offset = index as f32 * PHASE_STEP;

        let float_y = if params.float_y_enabled {
            (t * params.float_speed + offset).sin() * params.float_amplitude
        } else {
            0.0
        };
        let float_x = if params.float_x_enabled {
            (t * params.float_speed * 0.75 + offset).cos() * params.float_amplitude * 0.3
        } else {
            0.0
        };

        let rotation_x = if params.rotation_x_enabled {
            (t * params.rotation_speed * 1.3 + offset).sin() * params.rotation_amplitude
        } else {
            0.0
        };
        let rotation_y = if params.rotation_y_enabled {
            t * params.rotation_speed + offset
        } else {
            0.0
        };
        let rotation_z = if params.rotation_z_enabled {
            (t * params.rotation_speed * 1.7 + offset).cos() * params.rotation_amplitude * 0.7
        } else {
            0.0
        };

        let breathe = if params.breathe_enabled {
            1.0 + (t * params.breathe_speed + offset).sin() * params.breathe_amplitude
        } else {
            1.0
        };

        Self {
            position: element.position + Vec3::new(float_x, float_y, 0.0),
            rotation: Vec3::new(rotation_x, rotation_y, rotation_z),
            scale: element.scale * breathe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::boundary_path::BoundaryPath;
    use crate::core_modules::style_mapper::HexColor;

    fn element() -> SceneElement {
        SceneElement {
            name: "probe".to_string(),
            path: BoundaryPath::default(),
            color: HexColor::rgb(0, 0, 0),
            position: Vec3::new(1.0, 2.0, 3.0),
            scale: 0.01,
            is_generated: false,
        }
    }

    #[test]
    fn frame_zero_of_first_element() {
        let motion = ElementMotion::evaluate(&AnimationParams::default(), &element(), 0, 0.0);
        // sin(0) = 0 and cos(0) = 1.
        assert!((motion.position - Vec3::new(1.09, 2.0, 3.0)).length() < 1e-6);
        assert!((motion.rotation - Vec3::new(0.0, 0.0, 0.105)).length() < 1e-6);
        assert!((motion.scale - 0.01).abs() < 1e-9);
    }

    #[test]
    fn index_shifts_the_phase() {
        let params = AnimationParams::default();
        let motion = ElementMotion::evaluate(&params, &element(), 2, 0.0);
        assert!((motion.rotation.y - 1.4).abs() < 1e-6);
        let expected_y = 2.0 + 1.4f32.sin() * 0.3;
        assert!((motion.position.y - expected_y).abs() < 1e-6);
    }

    #[test]
    fn disabled_axes_rest() {
        let params = AnimationParams {
            float_x_enabled: false,
            float_y_enabled: false,
            rotation_x_enabled: false,
            rotation_y_enabled: false,
            rotation_z_enabled: false,
            breathe_enabled: false,
            ..AnimationParams::default()
        };
        let motion = ElementMotion::evaluate(&params, &element(), 5, 12.5);
        assert_eq!(motion.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(motion.rotation, Vec3::ZERO);
        assert_eq!(motion.scale, 0.01);
    }

    #[test]
    fn zero_time_scale_freezes_the_clock() {
        let params = AnimationParams {
            time_scale: 0.0,
            ..AnimationParams::default()
        };
        let early = ElementMotion::evaluate(&params, &element(), 3, 1.0);
        let late = ElementMotion::evaluate(&params, &element(), 3, 90.0);
        assert_eq!(early, late);
    }

    #[test]
    fn validation_and_reset() {
        let mut params = AnimationParams {
            breathe_amplitude: 0.5,
            ..AnimationParams::default()
        };
        assert!(matches!(params.validate(), Err(PipelineError::InvalidConfig(_))));
        params.reset();
        assert_eq!(params, AnimationParams::default());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: AnimationParams = serde_json::from_str(r#"{"time_scale": 2.5}"#).unwrap();
        assert_eq!(params.time_scale, 2.5);
        assert_eq!(params.float_speed, 0.4);
        assert!(!params.auto_rotate_camera);
    }
}
